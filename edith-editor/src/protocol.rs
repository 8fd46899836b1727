use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::options::EditorSettings;

/// Name of the global object the bridge installs in the web view.
pub const BRIDGE_OBJECT: &str = "EdithBridge";

// ---------------------------------------------------------------------------
// Events: editor → host (posted as `{ "type": ..., "data": {...} }`)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum BridgeEvent {
    Ready {},
    ModifiedChanged {
        #[serde(default)]
        modified: bool,
    },
    SaveRequested {},
    CloseRequested {},
    SaveContent {
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    InitComplete {
        #[serde(default)]
        line_ending: LineEnding,
    },
    #[serde(rename_all = "camelCase")]
    WrapChanged {
        #[serde(default = "default_true")]
        word_wrap: bool,
    },
    CursorChanged {
        #[serde(default = "default_one")]
        line: u32,
        #[serde(default = "default_one")]
        column: u32,
    },
}

fn default_true() -> bool {
    true
}

fn default_one() -> u32 {
    1
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl BridgeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BridgeEvent::Ready {} => "ready",
            BridgeEvent::ModifiedChanged { .. } => "modified-changed",
            BridgeEvent::SaveRequested {} => "save-requested",
            BridgeEvent::CloseRequested {} => "close-requested",
            BridgeEvent::SaveContent { .. } => "save-content",
            BridgeEvent::InitComplete { .. } => "init-complete",
            BridgeEvent::WrapChanged { .. } => "wrap-changed",
            BridgeEvent::CursorChanged { .. } => "cursor-changed",
        }
    }

    /// Serialize into the wire envelope.
    pub fn to_message(&self) -> Result<String, String> {
        serde_json::to_string(self)
            .map_err(|e| format!("Failed to serialize {}: {}", self.name(), e))
    }

    /// Parse a wire envelope. A missing or `null` `data` is read as `{}` and
    /// missing payload fields take their defaults.
    pub fn from_message(raw: &str) -> Result<Self, String> {
        let envelope: Envelope =
            serde_json::from_str(raw).map_err(|e| format!("Invalid bridge message: {}", e))?;
        let data = match envelope.data {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        let kind = envelope.kind;
        serde_json::from_value(serde_json::json!({ "type": &kind, "data": data }))
            .map_err(|e| format!("Invalid '{}' message: {}", kind, e))
    }
}

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    /// Classify the model's EOL sequence.
    pub fn from_sequence(eol: &str) -> Self {
        if eol == "\r\n" {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }

    /// Anything other than `"crlf"` is LF.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("crlf") {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "lf",
            LineEnding::Crlf => "crlf",
        }
    }

    pub fn sequence(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Arguments of `init`, in their positional order on the wire:
/// `content, language, theme, fontFamily, fontSize, wordWrap, settings,
/// customOptions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitArgs {
    pub content: Option<String>,
    pub language: Option<String>,
    pub theme: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub word_wrap: Option<bool>,
    pub settings: Option<EditorSettings>,
    pub custom_options: Option<Map<String, Value>>,
}

/// A non-negative whole number that fits in `u32`. JS hosts may serialize
/// integers as `14.0`, so whole floats count too.
fn whole_u32(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) {
        Some(f as u32)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Calls: host → editor (the `EdithBridge.*` function table)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCall {
    Init(InitArgs),
    SetContent { content: String },
    GetContent,
    SavePrepare { do_format: bool },
    SetLanguage { language: String },
    SetTheme { theme: String },
    SetFont { family: Option<String>, size: Option<u32> },
    SetIndent { use_spaces: bool, width: u32 },
    SetLineEnding { eol: LineEnding },
    SetMinimap { enabled: bool },
    SetRenderWhitespace { mode: String },
    SetStickyScroll { enabled: bool },
    SetFontLigatures { enabled: bool },
    SetLineNumbers { mode: String },
    SetCustomOptions { options: Map<String, Value> },
    TypeText { text: String },
    ToggleWrap,
    ShowFind,
    ShowReplace,
    HideFind,
    /// Zero-based line.
    GotoLine { line: i64 },
    MarkClean,
    IsModified,
}

impl BridgeCall {
    pub fn function_name(&self) -> &'static str {
        match self {
            BridgeCall::Init(_) => "init",
            BridgeCall::SetContent { .. } => "setContent",
            BridgeCall::GetContent => "getContent",
            BridgeCall::SavePrepare { .. } => "savePrepare",
            BridgeCall::SetLanguage { .. } => "setLanguage",
            BridgeCall::SetTheme { .. } => "setTheme",
            BridgeCall::SetFont { .. } => "setFont",
            BridgeCall::SetIndent { .. } => "setIndent",
            BridgeCall::SetLineEnding { .. } => "setLineEnding",
            BridgeCall::SetMinimap { .. } => "setMinimap",
            BridgeCall::SetRenderWhitespace { .. } => "setRenderWhitespace",
            BridgeCall::SetStickyScroll { .. } => "setStickyScroll",
            BridgeCall::SetFontLigatures { .. } => "setFontLigatures",
            BridgeCall::SetLineNumbers { .. } => "setLineNumbers",
            BridgeCall::SetCustomOptions { .. } => "setCustomOptions",
            BridgeCall::TypeText { .. } => "typeText",
            BridgeCall::ToggleWrap => "toggleWrap",
            BridgeCall::ShowFind => "showFind",
            BridgeCall::ShowReplace => "showReplace",
            BridgeCall::HideFind => "hideFind",
            BridgeCall::GotoLine { .. } => "gotoLine",
            BridgeCall::MarkClean => "markClean",
            BridgeCall::IsModified => "isModified",
        }
    }

    /// Positional JSON arguments, as the web view receives them.
    pub fn arguments(&self) -> Vec<Value> {
        fn opt<T: Serialize>(value: &Option<T>) -> Value {
            value
                .as_ref()
                .and_then(|v| serde_json::to_value(v).ok())
                .unwrap_or(Value::Null)
        }

        match self {
            BridgeCall::Init(args) => vec![
                opt(&args.content),
                opt(&args.language),
                opt(&args.theme),
                opt(&args.font_family),
                opt(&args.font_size),
                opt(&args.word_wrap),
                opt(&args.settings),
                opt(&args.custom_options),
            ],
            BridgeCall::SetContent { content } => vec![Value::from(content.as_str())],
            BridgeCall::SavePrepare { do_format } => vec![Value::from(*do_format)],
            BridgeCall::SetLanguage { language } => vec![Value::from(language.as_str())],
            BridgeCall::SetTheme { theme } => vec![Value::from(theme.as_str())],
            BridgeCall::SetFont { family, size } => vec![opt(family), opt(size)],
            BridgeCall::SetIndent { use_spaces, width } => {
                vec![Value::from(*use_spaces), Value::from(*width)]
            }
            BridgeCall::SetLineEnding { eol } => vec![Value::from(eol.as_str())],
            BridgeCall::SetMinimap { enabled }
            | BridgeCall::SetStickyScroll { enabled }
            | BridgeCall::SetFontLigatures { enabled } => vec![Value::from(*enabled)],
            BridgeCall::SetRenderWhitespace { mode } | BridgeCall::SetLineNumbers { mode } => {
                vec![Value::from(mode.as_str())]
            }
            BridgeCall::SetCustomOptions { options } => vec![Value::Object(options.clone())],
            BridgeCall::TypeText { text } => vec![Value::from(text.as_str())],
            BridgeCall::GotoLine { line } => vec![Value::from(*line)],
            BridgeCall::GetContent
            | BridgeCall::ToggleWrap
            | BridgeCall::ShowFind
            | BridgeCall::ShowReplace
            | BridgeCall::HideFind
            | BridgeCall::MarkClean
            | BridgeCall::IsModified => Vec::new(),
        }
    }

    /// Render as a script invocation for `evaluate_javascript`.
    ///
    /// Arguments go through `serde_json`, which yields valid JS literals, so
    /// content with quotes, backslashes or newlines needs no extra escaping.
    pub fn to_script(&self) -> String {
        let args: Vec<String> = self.arguments().iter().map(Value::to_string).collect();
        format!(
            "{}.{}({})",
            BRIDGE_OBJECT,
            self.function_name(),
            args.join(", ")
        )
    }

    /// Decode a named invocation with positional JSON arguments. Missing
    /// trailing arguments read as `null`.
    pub fn from_invocation(name: &str, args: &[Value]) -> Result<Self, String> {
        let arg = |i: usize| args.get(i).unwrap_or(&Value::Null);
        let string = |i: usize| -> Result<String, String> {
            arg(i)
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("{}: argument {} must be a string", name, i))
        };
        let boolean = |i: usize| -> Result<bool, String> {
            arg(i)
                .as_bool()
                .ok_or_else(|| format!("{}: argument {} must be a boolean", name, i))
        };
        let opt_string = |i: usize| arg(i).as_str().map(str::to_string);
        let opt_u32 = |i: usize| whole_u32(arg(i));

        let call = match name {
            "init" => {
                let settings = match arg(6) {
                    Value::Null => None,
                    v => Some(
                        serde_json::from_value(v.clone())
                            .map_err(|e| format!("init: invalid settings: {}", e))?,
                    ),
                };
                BridgeCall::Init(InitArgs {
                    content: opt_string(0),
                    language: opt_string(1),
                    theme: opt_string(2),
                    font_family: opt_string(3),
                    font_size: opt_u32(4),
                    word_wrap: arg(5).as_bool(),
                    settings,
                    custom_options: arg(7).as_object().cloned(),
                })
            }
            "setContent" => BridgeCall::SetContent { content: string(0)? },
            "getContent" => BridgeCall::GetContent,
            "savePrepare" => BridgeCall::SavePrepare {
                do_format: arg(0).as_bool().unwrap_or(false),
            },
            "setLanguage" => BridgeCall::SetLanguage {
                language: opt_string(0).unwrap_or_default(),
            },
            "setTheme" => BridgeCall::SetTheme { theme: string(0)? },
            "setFont" => BridgeCall::SetFont {
                family: opt_string(0),
                size: opt_u32(1),
            },
            "setIndent" => BridgeCall::SetIndent {
                use_spaces: boolean(0)?,
                width: opt_u32(1).ok_or_else(|| format!("{}: invalid tab width", name))?,
            },
            "setLineEnding" => BridgeCall::SetLineEnding {
                eol: LineEnding::from_name(&string(0)?),
            },
            "setMinimap" => BridgeCall::SetMinimap { enabled: boolean(0)? },
            "setRenderWhitespace" => BridgeCall::SetRenderWhitespace { mode: string(0)? },
            "setStickyScroll" => BridgeCall::SetStickyScroll { enabled: boolean(0)? },
            "setFontLigatures" => BridgeCall::SetFontLigatures { enabled: boolean(0)? },
            "setLineNumbers" => BridgeCall::SetLineNumbers { mode: string(0)? },
            "setCustomOptions" => BridgeCall::SetCustomOptions {
                options: arg(0)
                    .as_object()
                    .cloned()
                    .ok_or_else(|| format!("{}: options must be an object", name))?,
            },
            "typeText" => BridgeCall::TypeText { text: string(0)? },
            "toggleWrap" => BridgeCall::ToggleWrap,
            "showFind" => BridgeCall::ShowFind,
            "showReplace" => BridgeCall::ShowReplace,
            "hideFind" => BridgeCall::HideFind,
            "gotoLine" => BridgeCall::GotoLine {
                line: arg(0).as_i64().unwrap_or(0),
            },
            "markClean" => BridgeCall::MarkClean,
            "isModified" => BridgeCall::IsModified,
            other => return Err(format!("Unknown bridge function '{}'", other)),
        };
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_use_type_data_envelope() {
        let msg = BridgeEvent::ModifiedChanged { modified: true }
            .to_message()
            .unwrap();
        let v: Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(v, json!({"type": "modified-changed", "data": {"modified": true}}));

        let msg = BridgeEvent::Ready {}.to_message().unwrap();
        let v: Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(v, json!({"type": "ready", "data": {}}));
    }

    #[test]
    fn init_complete_reports_camel_case_line_ending() {
        let msg = BridgeEvent::InitComplete {
            line_ending: LineEnding::Crlf,
        }
        .to_message()
        .unwrap();
        let v: Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(v, json!({"type": "init-complete", "data": {"lineEnding": "crlf"}}));
    }

    #[test]
    fn from_message_tolerates_missing_data() {
        assert_eq!(
            BridgeEvent::from_message(r#"{"type": "save-requested"}"#).unwrap(),
            BridgeEvent::SaveRequested {}
        );
        assert_eq!(
            BridgeEvent::from_message(r#"{"type": "init-complete", "data": null}"#).unwrap(),
            BridgeEvent::InitComplete {
                line_ending: LineEnding::Lf
            }
        );
        assert_eq!(
            BridgeEvent::from_message(r#"{"type": "wrap-changed", "data": {}}"#).unwrap(),
            BridgeEvent::WrapChanged { word_wrap: true }
        );
    }

    #[test]
    fn from_message_rejects_unknown_and_garbage() {
        assert!(BridgeEvent::from_message(r#"{"type": "explode", "data": {}}"#).is_err());
        assert!(BridgeEvent::from_message("not json").is_err());
        assert!(BridgeEvent::from_message(r#"{"data": {}}"#).is_err());
    }

    #[test]
    fn line_ending_classification() {
        assert_eq!(LineEnding::from_sequence("\r\n"), LineEnding::Crlf);
        assert_eq!(LineEnding::from_sequence("\n"), LineEnding::Lf);
        assert_eq!(LineEnding::from_name("crlf"), LineEnding::Crlf);
        assert_eq!(LineEnding::from_name("cr"), LineEnding::Lf);
    }

    #[test]
    fn init_script_passes_all_positional_arguments() {
        let call = BridgeCall::Init(InitArgs {
            content: Some("a \"quoted\"\nline".to_string()),
            language: Some("python".to_string()),
            font_size: Some(14),
            word_wrap: Some(true),
            ..Default::default()
        });
        assert_eq!(
            call.to_script(),
            r#"EdithBridge.init("a \"quoted\"\nline", "python", null, null, 14, true, null, null)"#
        );
    }

    #[test]
    fn simple_scripts() {
        assert_eq!(BridgeCall::MarkClean.to_script(), "EdithBridge.markClean()");
        assert_eq!(
            BridgeCall::GotoLine { line: 41 }.to_script(),
            "EdithBridge.gotoLine(41)"
        );
        assert_eq!(
            BridgeCall::SetIndent {
                use_spaces: false,
                width: 8
            }
            .to_script(),
            "EdithBridge.setIndent(false, 8)"
        );
        assert_eq!(
            BridgeCall::SavePrepare { do_format: true }.to_script(),
            "EdithBridge.savePrepare(true)"
        );
    }

    #[test]
    fn from_invocation_decodes_init() {
        let args = vec![
            json!("hello"),
            json!("rust"),
            json!("monokai"),
            json!(""),
            json!(16),
            json!(false),
            json!({"insertSpaces": true, "tabSize": 2}),
            json!({"cursorStyle": "block"}),
        ];
        let call = BridgeCall::from_invocation("init", &args).unwrap();
        let BridgeCall::Init(init) = call else {
            panic!("expected init");
        };
        assert_eq!(init.content.as_deref(), Some("hello"));
        assert_eq!(init.font_size, Some(16));
        assert_eq!(init.word_wrap, Some(false));
        let settings = init.settings.unwrap();
        assert_eq!(settings.insert_spaces, Some(true));
        assert_eq!(settings.tab_size, Some(2));
        assert_eq!(init.custom_options.unwrap()["cursorStyle"], "block");
    }

    #[test]
    fn from_invocation_defaults_and_errors() {
        assert_eq!(
            BridgeCall::from_invocation("gotoLine", &[]).unwrap(),
            BridgeCall::GotoLine { line: 0 }
        );
        assert_eq!(
            BridgeCall::from_invocation("setLineEnding", &[json!("crlf")]).unwrap(),
            BridgeCall::SetLineEnding {
                eol: LineEnding::Crlf
            }
        );
        assert!(BridgeCall::from_invocation("setMinimap", &[json!("yes")]).is_err());
    }

    #[test]
    fn from_invocation_accepts_whole_floats() {
        assert_eq!(
            BridgeCall::from_invocation("setFont", &[json!("Iosevka"), json!(14.0)]).unwrap(),
            BridgeCall::SetFont {
                family: Some("Iosevka".to_string()),
                size: Some(14)
            }
        );
        assert_eq!(
            BridgeCall::from_invocation("setIndent", &[json!(true), json!(2.0)]).unwrap(),
            BridgeCall::SetIndent {
                use_spaces: true,
                width: 2
            }
        );
        let args = [json!("x"), Value::Null, Value::Null, Value::Null, json!(16.0)];
        let BridgeCall::Init(init) = BridgeCall::from_invocation("init", &args).unwrap() else {
            panic!("expected init");
        };
        assert_eq!(init.font_size, Some(16));

        // fractional or negative sizes are not sizes
        assert_eq!(
            BridgeCall::from_invocation("setFont", &[Value::Null, json!(13.5)]).unwrap(),
            BridgeCall::SetFont {
                family: None,
                size: None
            }
        );
        assert!(BridgeCall::from_invocation("setIndent", &[json!(true), json!(-4.0)]).is_err());
        assert!(BridgeCall::from_invocation("toggleLineComment", &[]).is_err());
    }
}
