use std::collections::VecDeque;

use edith_core::config::{self, Preferences};
use edith_core::language;

use crate::gate::ReadyGate;
use crate::options::EditorSettings;
use crate::protocol::{BridgeCall, BridgeEvent, InitArgs, LineEnding};

/// Runs a script inside the web view (`evaluate_javascript`).
pub trait ScriptRunner {
    fn evaluate(&self, script: &str);
}

impl<F> ScriptRunner for F
where
    F: Fn(&str),
{
    fn evaluate(&self, script: &str) {
        self(script)
    }
}

/// What the host UI needs to react to, decoded from bridge messages.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Ready,
    LineEndingDetected(LineEnding),
    CursorChanged { line: u32, column: u32 },
    WrapChanged(bool),
    ModifiedChanged(bool),
    SaveRequested,
    CloseRequested,
    Saved,
    SaveFailed(String),
}

type SaveCallback = Box<dyn FnOnce(&str) -> Result<(), String>>;

/// Host side of one editor tab.
///
/// Scripts issued before the bridge reports `ready` are queued and flushed in
/// order when it does. Cached state (line ending, wrap, cursor, modified) is
/// updated from incoming messages.
pub struct HostController<R> {
    runner: R,
    scripts: ReadyGate<String>,
    language_id: String,
    line_ending: LineEnding,
    word_wrap: bool,
    /// Wrap state each sent `init` leaves behind, oldest first.
    init_wraps: VecDeque<bool>,
    cursor: (u32, u32),
    modified: bool,
    pending_save: Option<SaveCallback>,
}

impl<R: ScriptRunner> HostController<R> {
    pub fn new(runner: R) -> Self {
        HostController {
            runner,
            scripts: ReadyGate::new(),
            language_id: language::PLAINTEXT.to_string(),
            line_ending: LineEnding::Lf,
            word_wrap: true,
            init_wraps: VecDeque::new(),
            cursor: (1, 1),
            modified: false,
            pending_save: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.scripts.is_open()
    }

    pub fn call(&mut self, call: &BridgeCall) {
        if let BridgeCall::Init(args) = call {
            // an init without wordWrap leaves the editor's default, which wraps
            self.init_wraps.push_back(args.word_wrap.unwrap_or(true));
        }
        let script = call.to_script();
        match self.scripts.admit(script) {
            Some(script) => self.runner.evaluate(&script),
            None => log::debug!("Editor not ready, queued {}", call.function_name()),
        }
    }

    /// Start a document: detect its language, resolve the theme and queue
    /// `init` with the stored preferences.
    pub fn open_document(
        &mut self,
        filename: &str,
        content: &str,
        prefs: &Preferences,
        prefers_dark: bool,
    ) {
        let language_id = language::detect_language(filename, &prefs.syntax_associations);
        let theme = config::resolve_theme(&prefs.syntax_scheme, prefers_dark);
        let call = init_call(prefs, content, &language_id, &theme);
        self.language_id = language_id;
        self.call(&call);
    }

    /// Decode one message from the bridge and update cached state.
    /// Malformed messages are logged and ignored.
    pub fn handle_message(&mut self, raw: &str) -> Option<HostEvent> {
        let event = match BridgeEvent::from_message(raw) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("{}", e);
                return None;
            }
        };

        let host_event = match event {
            BridgeEvent::Ready {} => {
                let queued = self.scripts.open();
                log::debug!("Editor ready, flushing {} queued script(s)", queued.len());
                for script in queued {
                    self.runner.evaluate(&script);
                }
                HostEvent::Ready
            }
            BridgeEvent::InitComplete { line_ending } => {
                self.line_ending = line_ending;
                if let Some(word_wrap) = self.init_wraps.pop_front() {
                    self.word_wrap = word_wrap;
                }
                HostEvent::LineEndingDetected(line_ending)
            }
            BridgeEvent::CursorChanged { line, column } => {
                self.cursor = (line, column);
                HostEvent::CursorChanged { line, column }
            }
            BridgeEvent::WrapChanged { word_wrap } => {
                self.word_wrap = word_wrap;
                HostEvent::WrapChanged(word_wrap)
            }
            BridgeEvent::ModifiedChanged { modified } => {
                self.modified = modified;
                HostEvent::ModifiedChanged(modified)
            }
            BridgeEvent::SaveRequested {} => HostEvent::SaveRequested,
            BridgeEvent::CloseRequested {} => HostEvent::CloseRequested,
            BridgeEvent::SaveContent { content } => return self.finish_save(&content),
        };
        Some(host_event)
    }

    fn finish_save(&mut self, content: &str) -> Option<HostEvent> {
        let Some(on_content) = self.pending_save.take() else {
            log::debug!("Ignoring save-content with no save in progress");
            return None;
        };
        match on_content(content) {
            Ok(()) => {
                self.call(&BridgeCall::MarkClean);
                Some(HostEvent::Saved)
            }
            Err(e) => {
                log::warn!("Save failed: {}", e);
                Some(HostEvent::SaveFailed(e))
            }
        }
    }

    /// Ask the bridge for the content (formatted first if requested) and hand
    /// it to `on_content` when it arrives. On success the document is marked
    /// clean. A newer request replaces an unanswered one.
    pub fn request_save<F>(&mut self, format_on_save: bool, on_content: F)
    where
        F: FnOnce(&str) -> Result<(), String> + 'static,
    {
        if self.pending_save.is_some() {
            log::debug!("Replacing unanswered save request");
        }
        self.pending_save = Some(Box::new(on_content));
        self.call(&BridgeCall::SavePrepare {
            do_format: format_on_save,
        });
    }

    /// The web view's renderer died. The next page load gets a fresh bridge,
    /// so readiness starts over and anything queued for the old one is
    /// dropped, including an unanswered save. View state goes back to what a
    /// freshly constructed editor shows.
    pub fn web_process_terminated(&mut self) {
        log::warn!(
            "Web process terminated, dropping {} queued script(s)",
            self.scripts.pending_len()
        );
        self.scripts = ReadyGate::new();
        self.pending_save = None;
        self.init_wraps.clear();
        self.word_wrap = true;
        self.cursor = (1, 1);
    }

    pub fn set_language(&mut self, language_id: &str) {
        let language_id = if language_id.is_empty() {
            language::PLAINTEXT
        } else {
            language_id
        };
        self.language_id = language_id.to_string();
        self.call(&BridgeCall::SetLanguage {
            language: language_id.to_string(),
        });
    }

    pub fn set_line_ending(&mut self, eol: LineEnding) {
        self.line_ending = eol;
        self.call(&BridgeCall::SetLineEnding { eol });
    }

    pub fn goto_line(&mut self, line: i64) {
        self.call(&BridgeCall::GotoLine { line });
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    pub fn cursor_position(&self) -> (u32, u32) {
        self.cursor
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

/// Build the `init` call for a document from stored preferences.
pub fn init_call(prefs: &Preferences, content: &str, language_id: &str, theme: &str) -> BridgeCall {
    let language_id = if language_id.is_empty() {
        language::PLAINTEXT
    } else {
        language_id
    };
    BridgeCall::Init(InitArgs {
        content: Some(content.to_string()),
        language: Some(language_id.to_string()),
        theme: Some(theme.to_string()),
        font_family: Some(prefs.editor_font.clone()),
        font_size: Some(prefs.effective_font_size()),
        word_wrap: Some(true),
        settings: Some(EditorSettings {
            insert_spaces: Some(prefs.editor_insert_spaces),
            tab_size: Some(prefs.editor_tab_size),
            minimap: Some(prefs.editor_minimap),
            render_whitespace: Some(prefs.editor_render_whitespace.clone()),
            sticky_scroll: Some(prefs.editor_sticky_scroll),
            font_ligatures: Some(prefs.editor_font_ligatures),
            line_numbers: Some(prefs.editor_line_numbers.clone()),
        }),
        custom_options: Some(prefs.editor_overrides.clone()),
    })
}
