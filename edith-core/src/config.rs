use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Font size handed to the editor when the user has not picked one.
pub const DEFAULT_FONT_SIZE: u32 = 14;

const CONFIG_FILE: &str = "servers.json";
const PREFERENCES_KEY: &str = "preferences";

/// Editor preferences, persisted under the `"preferences"` key of
/// `~/.config/edith/servers.json`.
///
/// The file is shared with the server list, so saving only ever replaces the
/// `"preferences"` object and leaves every other top-level key untouched.
/// `#[serde(default)]` keeps older files loadable as fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Preferences {
    // ── Font ─────────────────────────────────────────────────────────────
    pub editor_font: String,
    /// `0` means "use the editor default".
    pub editor_font_size: u32,

    // ── Indentation & display ────────────────────────────────────────────
    pub editor_insert_spaces: bool,
    pub editor_tab_size: u32,
    pub editor_minimap: bool,
    pub editor_render_whitespace: String,
    pub editor_sticky_scroll: bool,
    pub editor_font_ligatures: bool,
    pub editor_line_numbers: String,

    /// Raw Monaco options applied on top of everything above.
    pub editor_overrides: serde_json::Map<String, serde_json::Value>,

    // ── Saving ───────────────────────────────────────────────────────────
    pub editor_format_on_save: bool,

    // ── Syntax ───────────────────────────────────────────────────────────
    pub syntax_scheme: String,
    /// File extension (without dot) to language id.
    pub syntax_associations: HashMap<String, String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            editor_font: String::new(),
            editor_font_size: 0,

            editor_insert_spaces: true,
            editor_tab_size: 4,
            editor_minimap: false,
            editor_render_whitespace: String::from("selection"),
            editor_sticky_scroll: false,
            editor_font_ligatures: false,
            editor_line_numbers: String::from("on"),

            editor_overrides: serde_json::Map::new(),

            editor_format_on_save: false,

            syntax_scheme: String::new(),
            syntax_associations: HashMap::new(),
        }
    }
}

impl Preferences {
    pub fn effective_font_size(&self) -> u32 {
        if self.editor_font_size == 0 {
            DEFAULT_FONT_SIZE
        } else {
            self.editor_font_size
        }
    }
}

/// `~/.config/edith` on Linux, the platform equivalent elsewhere.
pub fn config_dir() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("edith"))
        .ok_or_else(|| "Cannot determine config directory".to_string())
}

pub fn config_path() -> Result<PathBuf, String> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Load preferences from the default location, falling back to defaults.
pub fn load() -> Preferences {
    match config_path() {
        Ok(path) => load_from(&path),
        Err(e) => {
            log::warn!("{}; using default preferences", e);
            Preferences::default()
        }
    }
}

pub fn load_from(path: &Path) -> Preferences {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Preferences::default(),
    };
    let mut root: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Ignoring malformed config {:?}: {}", path, e);
            return Preferences::default();
        }
    };
    match root.get_mut(PREFERENCES_KEY).map(serde_json::Value::take) {
        Some(prefs) => serde_json::from_value(prefs).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed preferences in {:?}: {}", path, e);
            Preferences::default()
        }),
        None => Preferences::default(),
    }
}

pub fn save(prefs: &Preferences) -> Result<(), String> {
    save_to(&config_path()?, prefs)
}

/// Write `prefs` into the `"preferences"` object of the file at `path`,
/// preserving any other top-level keys already stored there.
pub fn save_to(path: &Path, prefs: &Preferences) -> Result<(), String> {
    let mut root = std::fs::read_to_string(path)
        .ok()
        .and_then(|c| serde_json::from_str::<serde_json::Value>(&c).ok())
        .filter(serde_json::Value::is_object)
        .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

    let value = serde_json::to_value(prefs)
        .map_err(|e| format!("Failed to serialize preferences: {}", e))?;
    if let Some(obj) = root.as_object_mut() {
        obj.insert(PREFERENCES_KEY.to_string(), value);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let json = serde_json::to_string_pretty(&root)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {:?}: {}", path, e))
}

/// JSON schema of the preferences object, for settings editors.
pub fn preferences_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(Preferences);
    serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
}

/// Pick the editor theme: the saved scheme if any, otherwise the built-in
/// light or dark theme matching the desktop style.
pub fn resolve_theme(saved: &str, prefers_dark: bool) -> String {
    if !saved.is_empty() {
        return saved.to_string();
    }
    if prefers_dark {
        "vs-dark".to_string()
    } else {
        "vs".to_string()
    }
}
