use std::future::Future;
use std::pin::Pin;

use crate::options::{OptionsUpdate, WordWrap};
use crate::protocol::LineEnding;
use crate::session::VersionId;

/// Completion of the widget's format-document action.
pub type FormatFuture = Pin<Box<dyn Future<Output = Result<(), String>>>>;

/// Named widget actions the bridge triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Find,
    FindReplace,
}

impl EditorAction {
    pub fn id(self) -> &'static str {
        match self {
            EditorAction::Find => "actions.find",
            EditorAction::FindReplace => "editor.action.startFindReplaceAction",
        }
    }
}

/// The embedded editor widget, as seen by the bridge.
///
/// Implementations wrap the real widget; the bridge never looks past this
/// trait. Lines and columns are one-based.
pub trait EditorInstance {
    /// Current undo/redo position of the model.
    fn version_id(&self) -> VersionId;

    fn value(&self) -> String;
    fn set_value(&mut self, content: &str);

    fn eol(&self) -> LineEnding;
    /// Convert the model's line endings (an undoable edit).
    fn push_eol(&mut self, eol: LineEnding);

    fn language_id(&self) -> String;
    fn set_language(&mut self, language: &str);
    fn set_theme(&mut self, theme: &str);

    fn update_options(&mut self, update: &OptionsUpdate);
    /// Indentation of the text model, separate from the editor options.
    fn model_indent(&self) -> (bool, u32);
    fn set_model_indent(&mut self, insert_spaces: bool, tab_size: u32);
    fn word_wrap(&self) -> WordWrap;

    /// Insert text as if typed at the cursor.
    fn type_text(&mut self, text: &str);
    /// Insert a snippet replacing the `overwrite_before` characters before
    /// the cursor. Returns `false` when no snippet support is available.
    fn insert_snippet(&mut self, snippet: &str, overwrite_before: usize) -> bool;
    /// Text of the cursor line up to the cursor.
    fn text_before_cursor(&self) -> String;

    /// Returns `false` if the action is not registered.
    fn run_action(&mut self, action: EditorAction) -> bool;
    fn close_find_widget(&mut self);

    fn reveal_line_in_center(&mut self, line: u32);
    fn set_position(&mut self, line: u32, column: u32);
    fn focus(&mut self);

    /// Start formatting the document, or `None` when no formatter is
    /// registered for the current language.
    fn format_document(&mut self) -> Option<FormatFuture>;
}
