//! In-memory stand-ins for the widget and the host message handler.

use std::cell::RefCell;
use std::rc::Rc;

use crate::instance::{EditorAction, EditorInstance, FormatFuture};
use crate::options::{OptionsUpdate, WordWrap};
use crate::protocol::{BridgeEvent, LineEnding};
use crate::session::VersionId;
use crate::sink::MessageSink;

/// Records every call the bridge makes. Versions behave like Monaco's
/// alternative version id: each edit gets a fresh id and undo restores the
/// previous one.
pub(crate) struct FakeEditor {
    pub value: String,
    pub version: VersionId,
    next_version: VersionId,
    history: Vec<(String, VersionId)>,
    pub loads: Vec<String>,
    pub eol: LineEnding,
    pub language: String,
    pub theme: String,
    pub option_updates: Vec<OptionsUpdate>,
    pub indent: (bool, u32),
    pub word_wrap: WordWrap,
    pub typed: Vec<String>,
    pub snippets: Vec<(String, usize)>,
    pub snippet_support: bool,
    pub before_cursor: String,
    pub actions: Vec<EditorAction>,
    pub find_closed: usize,
    pub revealed: Vec<u32>,
    pub position: (u32, u32),
    pub focus_count: usize,
    /// `None`: no formatter registered. `Some(Ok)` trims trailing spaces.
    pub formatter: Option<Result<(), String>>,
}

impl FakeEditor {
    pub fn new() -> Self {
        FakeEditor {
            value: String::new(),
            version: 1,
            next_version: 2,
            history: Vec::new(),
            loads: Vec::new(),
            eol: LineEnding::Lf,
            language: "plaintext".to_string(),
            theme: String::new(),
            option_updates: Vec::new(),
            indent: (true, 4),
            word_wrap: WordWrap::On,
            typed: Vec::new(),
            snippets: Vec::new(),
            snippet_support: true,
            before_cursor: String::new(),
            actions: Vec::new(),
            find_closed: 0,
            revealed: Vec::new(),
            position: (1, 1),
            focus_count: 0,
            formatter: None,
        }
    }

    fn replace(&mut self, value: String) {
        self.history
            .push((std::mem::replace(&mut self.value, value), self.version));
        self.version = self.next_version;
        self.next_version += 1;
    }

    /// Append text as a user edit.
    pub fn edit(&mut self, text: &str) {
        let value = format!("{}{}", self.value, text);
        self.replace(value);
    }

    pub fn undo(&mut self) {
        if let Some((value, version)) = self.history.pop() {
            self.value = value;
            self.version = version;
        }
    }
}

impl EditorInstance for FakeEditor {
    fn version_id(&self) -> VersionId {
        self.version
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, content: &str) {
        self.loads.push(content.to_string());
        self.eol = if content.contains("\r\n") {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        };
        self.replace(content.to_string());
    }

    fn eol(&self) -> LineEnding {
        self.eol
    }

    fn push_eol(&mut self, eol: LineEnding) {
        self.eol = eol;
        let normalized = self.value.replace("\r\n", "\n");
        self.replace(normalized.replace('\n', eol.sequence()));
    }

    fn language_id(&self) -> String {
        self.language.clone()
    }

    fn set_language(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn set_theme(&mut self, theme: &str) {
        self.theme = theme.to_string();
    }

    fn update_options(&mut self, update: &OptionsUpdate) {
        if let Some(wrap) = update.get("wordWrap").and_then(|v| v.as_str()) {
            self.word_wrap = WordWrap::from_enabled(wrap == "on");
        }
        self.option_updates.push(update.clone());
    }

    fn model_indent(&self) -> (bool, u32) {
        self.indent
    }

    fn set_model_indent(&mut self, insert_spaces: bool, tab_size: u32) {
        self.indent = (insert_spaces, tab_size);
    }

    fn word_wrap(&self) -> WordWrap {
        self.word_wrap
    }

    fn type_text(&mut self, text: &str) {
        self.typed.push(text.to_string());
    }

    fn insert_snippet(&mut self, snippet: &str, overwrite_before: usize) -> bool {
        if !self.snippet_support {
            return false;
        }
        self.snippets.push((snippet.to_string(), overwrite_before));
        true
    }

    fn text_before_cursor(&self) -> String {
        self.before_cursor.clone()
    }

    fn run_action(&mut self, action: EditorAction) -> bool {
        self.actions.push(action);
        true
    }

    fn close_find_widget(&mut self) {
        self.find_closed += 1;
    }

    fn reveal_line_in_center(&mut self, line: u32) {
        self.revealed.push(line);
    }

    fn set_position(&mut self, line: u32, column: u32) {
        self.position = (line, column);
    }

    fn focus(&mut self) {
        self.focus_count += 1;
    }

    fn format_document(&mut self) -> Option<FormatFuture> {
        let result = self.formatter.clone()?;
        if result.is_ok() {
            let trimmed = self.value.trim_end().to_string();
            self.replace(trimmed);
        }
        Some(Box::pin(std::future::ready(result)))
    }
}

/// Collects posted messages; clones share the same buffer.
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn events(&self) -> Vec<BridgeEvent> {
        self.messages
            .borrow()
            .iter()
            .map(|m| BridgeEvent::from_message(m).unwrap())
            .collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(BridgeEvent::name).collect()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl MessageSink for RecordingSink {
    fn post(&self, message: &str) -> Result<(), String> {
        self.messages.borrow_mut().push(message.to_string());
        Ok(())
    }
}
