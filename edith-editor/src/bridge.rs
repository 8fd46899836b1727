use edith_core::language::PLAINTEXT;
use serde_json::{Map, Value};

use crate::abbreviation::{self, AbbreviationExpander};
use crate::gate::ReadyGate;
use crate::instance::{EditorAction, EditorInstance};
use crate::keys::{self, ChordCommand, KeyPress};
use crate::options::{EditorOptions, OptionsUpdate};
use crate::protocol::{BridgeCall, BridgeEvent, InitArgs, LineEnding};
use crate::session::Session;
use crate::sink::MessageSink;

/// Editor side of the host/editor channel.
///
/// Owns the widget handle once it exists, the dirty-tracking session, the
/// queue of `init` calls made before the widget was ready, and the sink
/// notifications are posted to. Every operation except `init` is a silent
/// no-op (or returns a default) until [`Bridge::attach`] runs.
pub struct Bridge<E, S> {
    editor: Option<E>,
    session: Session,
    pending: ReadyGate<InitArgs>,
    sink: S,
    expander: Option<Box<dyn AbbreviationExpander>>,
    /// Notifications raised while draining the queue, posted after `ready`.
    held: Option<Vec<BridgeEvent>>,
}

impl<E: EditorInstance, S: MessageSink> Bridge<E, S> {
    pub fn new(sink: S) -> Self {
        Bridge {
            editor: None,
            session: Session::new(0),
            pending: ReadyGate::new(),
            sink,
            expander: None,
            held: None,
        }
    }

    pub fn with_expander(mut self, expander: Box<dyn AbbreviationExpander>) -> Self {
        self.expander = Some(expander);
        self
    }

    pub fn is_ready(&self) -> bool {
        self.pending.is_open()
    }

    pub fn editor(&self) -> Option<&E> {
        self.editor.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The widget finished constructing: run the queued `init` calls in the
    /// order they were made, then announce `ready`.
    pub fn attach(&mut self, editor: E) {
        if self.pending.is_open() {
            log::warn!("Editor already attached; ignoring second instance");
            return;
        }
        self.session = Session::new(editor.version_id());
        self.editor = Some(editor);

        self.held = Some(Vec::new());
        let queued = self.pending.open();
        log::info!("Editor ready, running {} queued init call(s)", queued.len());
        for args in queued {
            self.run_init(args);
        }
        let held = self.held.take().unwrap_or_default();

        self.post(BridgeEvent::Ready {});
        for event in held {
            self.post(event);
        }
    }

    fn post(&mut self, event: BridgeEvent) {
        if let Some(held) = self.held.as_mut() {
            held.push(event);
            return;
        }
        let message = match event.to_message() {
            Ok(m) => m,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };
        if let Err(e) = self.sink.post(&message) {
            log::debug!("Dropped '{}' notification: {}", event.name(), e);
        }
    }

    // ── Content & dirty state ────────────────────────────────────────────

    /// Replace the content without counting it as an edit.
    fn load_content(&mut self, content: &str) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        editor.set_value(content);
        let version = editor.version_id();
        if let Some(modified) = self.session.loaded(version) {
            self.post(BridgeEvent::ModifiedChanged { modified });
        }
    }

    pub fn init(&mut self, args: InitArgs) {
        match self.pending.admit(args) {
            Some(args) => self.run_init(args),
            None => log::debug!(
                "Editor not ready, queued init ({} pending)",
                self.pending.pending_len()
            ),
        }
    }

    fn run_init(&mut self, args: InitArgs) {
        if self.editor.is_none() {
            return;
        }
        if let Some(content) = &args.content {
            self.load_content(content);
        }
        let Some(editor) = self.editor.as_mut() else {
            return;
        };

        if let Some(language) = args.language.as_deref().filter(|l| !l.is_empty()) {
            editor.set_language(language);
        }
        if let Some(theme) = args.theme.as_deref().filter(|t| !t.is_empty()) {
            editor.set_theme(theme);
        }

        let mut options = EditorOptions::default();
        options.set_font(args.font_family.as_deref(), args.font_size);
        options.set_word_wrap(args.word_wrap);
        if let Some(settings) = &args.settings {
            options.apply_settings(settings);
            if let Some((insert_spaces, tab_size)) = options.model_indent() {
                editor.set_model_indent(insert_spaces, tab_size);
            }
        }
        if let Some(custom) = &args.custom_options {
            options.apply_overrides(custom);
        }
        editor.update_options(&options.to_update());

        let line_ending = editor.eol();
        self.post(BridgeEvent::InitComplete { line_ending });
    }

    pub fn set_content(&mut self, content: &str) {
        self.load_content(content);
    }

    pub fn get_content(&self) -> String {
        self.editor.as_ref().map(|e| e.value()).unwrap_or_default()
    }

    /// Send the content back for saving, formatting it first when asked and
    /// a formatter exists. A failed format still sends whatever the buffer
    /// holds afterwards.
    pub async fn save_prepare(&mut self, do_format: bool) {
        if self.editor.is_none() {
            self.post(BridgeEvent::SaveContent {
                content: String::new(),
            });
            return;
        }
        if do_format {
            if let Some(format) = self.editor.as_mut().and_then(|e| e.format_document()) {
                if let Err(e) = format.await {
                    log::debug!("Format before save failed: {}", e);
                }
            }
        }
        let content = self.get_content();
        self.post(BridgeEvent::SaveContent { content });
    }

    pub fn mark_clean(&mut self) {
        let Some(editor) = self.editor.as_ref() else {
            return;
        };
        let version = editor.version_id();
        if let Some(modified) = self.session.mark_clean(version) {
            self.post(BridgeEvent::ModifiedChanged { modified });
        }
    }

    pub fn is_modified(&self) -> bool {
        self.editor
            .as_ref()
            .is_some_and(|e| self.session.is_modified_at(e.version_id()))
    }

    /// The widget reported a content change.
    pub fn content_changed(&mut self) {
        let Some(editor) = self.editor.as_ref() else {
            return;
        };
        let version = editor.version_id();
        if let Some(modified) = self.session.observe(version) {
            self.post(BridgeEvent::ModifiedChanged { modified });
        }
    }

    pub fn cursor_moved(&mut self, line: u32, column: u32) {
        if self.editor.is_some() {
            self.post(BridgeEvent::CursorChanged { line, column });
        }
    }

    // ── Language, theme & options ────────────────────────────────────────

    pub fn set_language(&mut self, language: &str) {
        if let Some(editor) = self.editor.as_mut() {
            let language = if language.is_empty() { PLAINTEXT } else { language };
            editor.set_language(language);
        }
    }

    pub fn set_theme(&mut self, theme: &str) {
        if let Some(editor) = self.editor.as_mut() {
            editor.set_theme(theme);
        }
    }

    fn update_options(&mut self, options: EditorOptions) {
        if let Some(editor) = self.editor.as_mut() {
            editor.update_options(&options.to_update());
        }
    }

    pub fn set_font(&mut self, family: Option<&str>, size: Option<u32>) {
        let mut options = EditorOptions::default();
        options.set_font(family, size);
        self.update_options(options);
    }

    pub fn set_indent(&mut self, use_spaces: bool, width: u32) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let options = EditorOptions {
            insert_spaces: Some(use_spaces),
            tab_size: Some(width),
            ..Default::default()
        };
        editor.update_options(&options.to_update());
        editor.set_model_indent(use_spaces, width);
    }

    pub fn set_line_ending(&mut self, eol: LineEnding) {
        if let Some(editor) = self.editor.as_mut() {
            editor.push_eol(eol);
        }
    }

    pub fn set_minimap(&mut self, enabled: bool) {
        self.update_options(EditorOptions {
            minimap: Some(enabled),
            ..Default::default()
        });
    }

    pub fn set_render_whitespace(&mut self, mode: &str) {
        self.update_options(EditorOptions {
            render_whitespace: Some(mode.to_string()),
            ..Default::default()
        });
    }

    pub fn set_sticky_scroll(&mut self, enabled: bool) {
        self.update_options(EditorOptions {
            sticky_scroll: Some(enabled),
            ..Default::default()
        });
    }

    pub fn set_font_ligatures(&mut self, enabled: bool) {
        self.update_options(EditorOptions {
            font_ligatures: Some(enabled),
            ..Default::default()
        });
    }

    pub fn set_line_numbers(&mut self, mode: &str) {
        self.update_options(EditorOptions {
            line_numbers: Some(mode.to_string()),
            ..Default::default()
        });
    }

    pub fn set_custom_options(&mut self, options: &Map<String, Value>) {
        if let Some(editor) = self.editor.as_mut() {
            editor.update_options(&OptionsUpdate::from(options.clone()));
        }
    }

    pub fn toggle_wrap(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let wrap = editor.word_wrap().toggled();
        editor.update_options(
            &EditorOptions {
                word_wrap: Some(wrap),
                ..Default::default()
            }
            .to_update(),
        );
        self.post(BridgeEvent::WrapChanged {
            word_wrap: wrap.is_on(),
        });
    }

    // ── Editing & navigation ─────────────────────────────────────────────

    pub fn type_text(&mut self, text: &str) {
        if let Some(editor) = self.editor.as_mut() {
            editor.type_text(text);
        }
    }

    fn run_action(&mut self, action: EditorAction) {
        if let Some(editor) = self.editor.as_mut() {
            if !editor.run_action(action) {
                log::debug!("Editor action '{}' is not available", action.id());
            }
        }
    }

    pub fn show_find(&mut self) {
        self.run_action(EditorAction::Find);
    }

    pub fn show_replace(&mut self) {
        self.run_action(EditorAction::FindReplace);
    }

    pub fn hide_find(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.close_find_widget();
        }
    }

    /// Jump to a zero-based line. Anything below zero lands on the first line.
    pub fn goto_line(&mut self, line: i64) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let target = u32::try_from(line.saturating_add(1).max(1)).unwrap_or(u32::MAX);
        editor.reveal_line_in_center(target);
        editor.set_position(target, 1);
        editor.focus();
    }

    /// Tab with a plain cursor: expand the abbreviation before the cursor,
    /// or insert one indent unit when there is nothing to expand.
    pub fn tab_pressed(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        if let Some(expander) = self.expander.as_deref() {
            let before = editor.text_before_cursor();
            if let Some(abbr) = abbreviation::extract_abbreviation(&before) {
                let language = editor.language_id();
                if let Some(expanded) = abbreviation::expansion_for(expander, abbr, &language) {
                    // Monaco counts columns in UTF-16 code units
                    if editor.insert_snippet(&expanded, abbr.encode_utf16().count()) {
                        return;
                    }
                }
            }
        }
        let (insert_spaces, tab_size) = editor.model_indent();
        editor.type_text(&abbreviation::indent_unit(insert_spaces, tab_size));
    }

    /// Handle a key press from the widget. Returns `true` when a built-in
    /// chord consumed it.
    pub fn key_pressed(&mut self, press: &KeyPress) -> bool {
        if self.editor.is_none() {
            return false;
        }
        match keys::command_for(press) {
            Some(ChordCommand::RequestSave) => self.post(BridgeEvent::SaveRequested {}),
            Some(ChordCommand::RequestClose) => self.post(BridgeEvent::CloseRequested {}),
            Some(ChordCommand::ExpandOrIndent) => self.tab_pressed(),
            None => return false,
        }
        true
    }

    // ── Named-function table ─────────────────────────────────────────────

    /// Run one inbound call. Queries return their value, everything else
    /// returns `null`.
    pub async fn dispatch(&mut self, call: BridgeCall) -> Value {
        match call {
            BridgeCall::Init(args) => self.init(args),
            BridgeCall::SetContent { content } => self.set_content(&content),
            BridgeCall::GetContent => return Value::from(self.get_content()),
            BridgeCall::SavePrepare { do_format } => self.save_prepare(do_format).await,
            BridgeCall::SetLanguage { language } => self.set_language(&language),
            BridgeCall::SetTheme { theme } => self.set_theme(&theme),
            BridgeCall::SetFont { family, size } => self.set_font(family.as_deref(), size),
            BridgeCall::SetIndent { use_spaces, width } => self.set_indent(use_spaces, width),
            BridgeCall::SetLineEnding { eol } => self.set_line_ending(eol),
            BridgeCall::SetMinimap { enabled } => self.set_minimap(enabled),
            BridgeCall::SetRenderWhitespace { mode } => self.set_render_whitespace(&mode),
            BridgeCall::SetStickyScroll { enabled } => self.set_sticky_scroll(enabled),
            BridgeCall::SetFontLigatures { enabled } => self.set_font_ligatures(enabled),
            BridgeCall::SetLineNumbers { mode } => self.set_line_numbers(&mode),
            BridgeCall::SetCustomOptions { options } => self.set_custom_options(&options),
            BridgeCall::TypeText { text } => self.type_text(&text),
            BridgeCall::ToggleWrap => self.toggle_wrap(),
            BridgeCall::ShowFind => self.show_find(),
            BridgeCall::ShowReplace => self.show_replace(),
            BridgeCall::HideFind => self.hide_find(),
            BridgeCall::GotoLine { line } => self.goto_line(line),
            BridgeCall::MarkClean => self.mark_clean(),
            BridgeCall::IsModified => return Value::from(self.is_modified()),
        }
        Value::Null
    }
}
