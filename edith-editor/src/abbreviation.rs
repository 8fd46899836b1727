use regex::Regex;
use std::sync::OnceLock;

/// Languages expanded with stylesheet rather than markup rules.
const STYLESHEET_SYNTAXES: &[&str] = &["css", "less", "scss", "sass", "stylus"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Markup,
    Stylesheet,
}

impl SyntaxKind {
    pub fn for_language(language: &str) -> Self {
        if STYLESHEET_SYNTAXES.contains(&language) {
            SyntaxKind::Stylesheet
        } else {
            SyntaxKind::Markup
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SyntaxKind::Markup => "markup",
            SyntaxKind::Stylesheet => "stylesheet",
        }
    }
}

/// Abbreviation expansion engine (Emmet or similar).
///
/// `syntax` is the editor language id (`html` when unknown). The result must
/// use snippet tab stops as produced by [`snippet_field`].
pub trait AbbreviationExpander {
    fn expand(&self, abbreviation: &str, kind: SyntaxKind, syntax: &str)
        -> Result<String, String>;
}

fn abbreviation_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[^\s<>"'=]+$"#).ok()).as_ref()
}

/// The abbreviation ending at the cursor: everything after the last
/// whitespace, angle bracket, quote or `=`.
pub fn extract_abbreviation(text_before_cursor: &str) -> Option<&str> {
    abbreviation_regex()?
        .find(text_before_cursor)
        .map(|m| m.as_str())
}

/// Snippet tab stop: `${1}` or `${1:placeholder}`.
pub fn snippet_field(index: usize, placeholder: &str) -> String {
    if placeholder.is_empty() {
        format!("${{{}}}", index)
    } else {
        format!("${{{}:{}}}", index, placeholder)
    }
}

/// What Tab inserts when nothing is expanded.
pub fn indent_unit(insert_spaces: bool, tab_size: u32) -> String {
    if insert_spaces {
        " ".repeat(tab_size as usize)
    } else {
        "\t".to_string()
    }
}

/// An expansion worth applying for `abbreviation`, if any.
pub fn expansion_for(
    expander: &dyn AbbreviationExpander,
    abbreviation: &str,
    language: &str,
) -> Option<String> {
    let syntax = if language.is_empty() { "html" } else { language };
    let kind = SyntaxKind::for_language(language);
    match expander.expand(abbreviation, kind, syntax) {
        Ok(expanded) if !expanded.is_empty() && expanded != abbreviation => Some(expanded),
        Ok(_) => None,
        Err(e) => {
            log::debug!("Abbreviation '{}' not expanded: {}", abbreviation, e);
            None
        }
    }
}
