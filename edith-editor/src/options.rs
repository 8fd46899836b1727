use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tab width used when spaces are requested without an explicit width.
pub const DEFAULT_TAB_SIZE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordWrap {
    On,
    Off,
}

impl WordWrap {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            WordWrap::On
        } else {
            WordWrap::Off
        }
    }

    pub fn is_on(self) -> bool {
        self == WordWrap::On
    }

    pub fn toggled(self) -> Self {
        WordWrap::from_enabled(!self.is_on())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WordWrap::On => "on",
            WordWrap::Off => "off",
        }
    }
}

/// The `settings` argument of `init`: the editor preferences the host knows
/// about by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_spaces: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_whitespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky_scroll: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_ligatures: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_numbers: Option<String>,
}

/// A single `updateOptions` payload, already in Monaco's option shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptionsUpdate(Map<String, Value>);

impl OptionsUpdate {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for OptionsUpdate {
    fn from(map: Map<String, Value>) -> Self {
        OptionsUpdate(map)
    }
}

/// Layered editor options: a closed set of known fields plus an open map of
/// raw Monaco options.
///
/// Layers are applied in order (defaults, then explicit settings, then
/// overrides) and [`EditorOptions::to_update`] writes the known fields first
/// and the open map on top, so a raw override always wins over a named
/// setting with the same key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorOptions {
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub word_wrap: Option<WordWrap>,
    pub insert_spaces: Option<bool>,
    pub tab_size: Option<u32>,
    pub minimap: Option<bool>,
    pub render_whitespace: Option<String>,
    pub sticky_scroll: Option<bool>,
    pub font_ligatures: Option<bool>,
    pub line_numbers: Option<String>,
    pub overrides: Map<String, Value>,
}

impl EditorOptions {
    /// Options the widget is constructed with, before any `init`.
    pub fn creation_defaults() -> Self {
        let mut overrides = Map::new();
        overrides.insert("value".into(), Value::from(""));
        overrides.insert("language".into(), Value::from("plaintext"));
        overrides.insert("theme".into(), Value::from("vs-dark"));
        overrides.insert("automaticLayout".into(), Value::from(true));
        overrides.insert("scrollBeyondLastLine".into(), Value::from(false));
        overrides.insert(
            "bracketPairColorization".into(),
            serde_json::json!({ "enabled": true }),
        );
        overrides.insert("smoothScrolling".into(), Value::from(true));
        overrides.insert("cursorBlinking".into(), Value::from("smooth"));
        overrides.insert("tabCompletion".into(), Value::from("on"));

        EditorOptions {
            font_family: Some("'Monospace', monospace".to_string()),
            font_size: Some(14),
            word_wrap: Some(WordWrap::On),
            insert_spaces: Some(true),
            tab_size: Some(DEFAULT_TAB_SIZE),
            minimap: Some(false),
            render_whitespace: Some("selection".to_string()),
            sticky_scroll: None,
            font_ligatures: None,
            line_numbers: Some("on".to_string()),
            overrides,
        }
    }

    /// Empty family and zero size mean "leave unchanged".
    pub fn set_font(&mut self, family: Option<&str>, size: Option<u32>) {
        if let Some(family) = family.filter(|f| !f.is_empty()) {
            self.font_family = Some(family.to_string());
        }
        if let Some(size) = size.filter(|&s| s > 0) {
            self.font_size = Some(size);
        }
    }

    pub fn set_word_wrap(&mut self, enabled: Option<bool>) {
        if let Some(enabled) = enabled {
            self.word_wrap = Some(WordWrap::from_enabled(enabled));
        }
    }

    pub fn apply_settings(&mut self, settings: &EditorSettings) {
        // tabSize only counts together with insertSpaces
        if let Some(insert_spaces) = settings.insert_spaces {
            self.insert_spaces = Some(insert_spaces);
            self.tab_size = Some(
                settings
                    .tab_size
                    .filter(|&t| t > 0)
                    .unwrap_or(DEFAULT_TAB_SIZE),
            );
        }
        if settings.minimap.is_some() {
            self.minimap = settings.minimap;
        }
        if let Some(mode) = settings.render_whitespace.as_ref().filter(|m| !m.is_empty()) {
            self.render_whitespace = Some(mode.clone());
        }
        if settings.sticky_scroll.is_some() {
            self.sticky_scroll = settings.sticky_scroll;
        }
        if settings.font_ligatures.is_some() {
            self.font_ligatures = settings.font_ligatures;
        }
        if let Some(mode) = settings.line_numbers.as_ref().filter(|m| !m.is_empty()) {
            self.line_numbers = Some(mode.clone());
        }
    }

    pub fn apply_overrides(&mut self, overrides: &Map<String, Value>) {
        for (key, value) in overrides {
            self.overrides.insert(key.clone(), value.clone());
        }
    }

    /// Indentation to push into the text model alongside the editor options.
    pub fn model_indent(&self) -> Option<(bool, u32)> {
        let insert_spaces = self.insert_spaces?;
        Some((insert_spaces, self.tab_size.unwrap_or(DEFAULT_TAB_SIZE)))
    }

    pub fn to_update(&self) -> OptionsUpdate {
        let mut map = Map::new();
        if let Some(family) = &self.font_family {
            map.insert("fontFamily".into(), Value::from(family.as_str()));
        }
        if let Some(size) = self.font_size {
            map.insert("fontSize".into(), Value::from(size));
        }
        if let Some(wrap) = self.word_wrap {
            map.insert("wordWrap".into(), Value::from(wrap.as_str()));
        }
        if let Some(insert_spaces) = self.insert_spaces {
            map.insert("insertSpaces".into(), Value::from(insert_spaces));
        }
        if let Some(tab_size) = self.tab_size {
            map.insert("tabSize".into(), Value::from(tab_size));
        }
        if let Some(enabled) = self.minimap {
            map.insert("minimap".into(), serde_json::json!({ "enabled": enabled }));
        }
        if let Some(mode) = &self.render_whitespace {
            map.insert("renderWhitespace".into(), Value::from(mode.as_str()));
        }
        if let Some(enabled) = self.sticky_scroll {
            map.insert("stickyScroll".into(), serde_json::json!({ "enabled": enabled }));
        }
        if let Some(enabled) = self.font_ligatures {
            map.insert("fontLigatures".into(), Value::from(enabled));
        }
        if let Some(mode) = &self.line_numbers {
            map.insert("lineNumbers".into(), Value::from(mode.as_str()));
        }
        for (key, value) in &self.overrides {
            map.insert(key.clone(), value.clone());
        }
        OptionsUpdate(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overrides_win_over_settings() {
        let mut opts = EditorOptions::default();
        opts.apply_settings(&EditorSettings {
            font_ligatures: Some(true),
            ..Default::default()
        });
        opts.set_font(None, Some(12));
        let custom = json!({"fontSize": 20}).as_object().cloned().unwrap();
        opts.apply_overrides(&custom);

        let update = opts.to_update();
        assert_eq!(update.get("fontSize"), Some(&json!(20)));
        assert_eq!(update.get("fontLigatures"), Some(&json!(true)));
        assert_eq!(update.len(), 2);
    }

    #[test]
    fn insert_spaces_defaults_tab_size() {
        let mut opts = EditorOptions::default();
        opts.apply_settings(&EditorSettings {
            insert_spaces: Some(false),
            tab_size: Some(0),
            ..Default::default()
        });
        assert_eq!(opts.model_indent(), Some((false, 4)));
        let update = opts.to_update();
        assert_eq!(update.get("insertSpaces"), Some(&json!(false)));
        assert_eq!(update.get("tabSize"), Some(&json!(4)));
    }

    #[test]
    fn tab_size_without_insert_spaces_is_ignored() {
        let mut opts = EditorOptions::default();
        opts.apply_settings(&EditorSettings {
            tab_size: Some(8),
            ..Default::default()
        });
        assert!(opts.to_update().is_empty());
        assert_eq!(opts.model_indent(), None);
    }

    #[test]
    fn toggles_use_nested_enabled_shape() {
        let mut opts = EditorOptions::default();
        opts.apply_settings(&EditorSettings {
            minimap: Some(true),
            sticky_scroll: Some(false),
            ..Default::default()
        });
        let update = opts.to_update();
        assert_eq!(update.get("minimap"), Some(&json!({"enabled": true})));
        assert_eq!(update.get("stickyScroll"), Some(&json!({"enabled": false})));
    }

    #[test]
    fn empty_strings_and_zero_are_not_provided() {
        let mut opts = EditorOptions::default();
        opts.set_font(Some(""), Some(0));
        opts.apply_settings(&EditorSettings {
            render_whitespace: Some(String::new()),
            line_numbers: Some(String::new()),
            ..Default::default()
        });
        assert!(opts.to_update().is_empty());
    }

    #[test]
    fn word_wrap_serializes_on_off() {
        let mut opts = EditorOptions::default();
        opts.set_word_wrap(Some(false));
        assert_eq!(opts.to_update().get("wordWrap"), Some(&json!("off")));
        assert_eq!(WordWrap::On.toggled(), WordWrap::Off);
    }

    #[test]
    fn creation_defaults_layer_under_settings() {
        let mut opts = EditorOptions::creation_defaults();
        opts.apply_settings(&EditorSettings {
            line_numbers: Some("relative".to_string()),
            ..Default::default()
        });
        let update = opts.to_update();
        assert_eq!(update.get("lineNumbers"), Some(&json!("relative")));
        assert_eq!(update.get("fontSize"), Some(&json!(14)));
        assert_eq!(update.get("language"), Some(&json!("plaintext")));
        assert_eq!(update.get("minimap"), Some(&json!({"enabled": false})));
    }
}
