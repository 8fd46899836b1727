/// What a built-in chord does inside the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordCommand {
    RequestSave,
    RequestClose,
    ExpandOrIndent,
}

/// A key chord the bridge binds on the editor widget.
pub struct BuiltinChord {
    pub id: &'static str,
    pub description: &'static str,
    /// `<Primary>` is Ctrl on Linux/Windows and Cmd on macOS.
    pub accel: &'static str,
    pub command: ChordCommand,
    /// Only fires with no selection and no suggest widget showing, so Tab
    /// still indents selected text and accepts suggestions.
    pub plain_cursor_only: bool,
}

pub const BUILTIN_CHORDS: &[BuiltinChord] = &[
    BuiltinChord {
        id: "save",
        description: "Save File",
        accel: "<Primary>s",
        command: ChordCommand::RequestSave,
        plain_cursor_only: false,
    },
    BuiltinChord {
        id: "close",
        description: "Close Tab",
        accel: "<Primary>w",
        command: ChordCommand::RequestClose,
        plain_cursor_only: false,
    },
    BuiltinChord {
        id: "expand_abbreviation",
        description: "Expand Abbreviation or Indent",
        accel: "Tab",
        command: ChordCommand::ExpandOrIndent,
        plain_cursor_only: true,
    },
];

/// A key press as reported by the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    /// Key name, e.g. `"s"`, `"Tab"`.
    pub key: String,
    pub has_selection: bool,
    pub suggest_widget_visible: bool,
}

impl KeyPress {
    pub fn new(key: &str) -> Self {
        KeyPress {
            key: key.to_string(),
            ..Default::default()
        }
    }

    pub fn with_primary(mut self) -> Self {
        self.ctrl = true;
        self
    }
}

/// Parsed accelerator for matching against [`KeyPress`]es.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAccel {
    pub primary: bool,
    pub shift: bool,
    pub alt: bool,
    /// The lowercase key name (e.g. "s", "tab")
    pub key_lower: String,
}

/// Parse an accel string like `"<Primary><Shift>s"`.
pub fn parse_accel(accel: &str) -> Option<ParsedAccel> {
    let mut primary = false;
    let mut shift = false;
    let mut alt = false;
    let mut remaining = accel;

    while remaining.starts_with('<') {
        let Some(end) = remaining.find('>') else {
            break;
        };
        match remaining[1..end].to_lowercase().as_str() {
            "primary" | "ctrl" | "control" | "cmd" | "meta" => primary = true,
            "shift" => shift = true,
            "alt" => alt = true,
            _ => return None,
        }
        remaining = &remaining[end + 1..];
    }

    if remaining.is_empty() {
        return None;
    }

    Some(ParsedAccel {
        primary,
        shift,
        alt,
        key_lower: remaining.to_lowercase(),
    })
}

impl ParsedAccel {
    pub fn matches(&self, press: &KeyPress) -> bool {
        let primary = press.ctrl || press.meta;
        primary == self.primary
            && press.shift == self.shift
            && press.alt == self.alt
            && press.key.to_lowercase() == self.key_lower
    }
}

/// The built-in command bound to `press`, if any.
pub fn command_for(press: &KeyPress) -> Option<ChordCommand> {
    BUILTIN_CHORDS
        .iter()
        .filter(|chord| {
            !chord.plain_cursor_only || (!press.has_selection && !press.suggest_widget_visible)
        })
        .find(|chord| parse_accel(chord.accel).is_some_and(|accel| accel.matches(press)))
        .map(|chord| chord.command)
}
