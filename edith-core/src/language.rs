use std::collections::HashMap;
use std::path::Path;

/// Language used when nothing else matches.
pub const PLAINTEXT: &str = "plaintext";

/// Map a file extension (lowercase, no dot) to a Monaco language id.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    let id = match ext {
        "rs" => "rust",
        "py" | "pyi" | "pyw" => "python",
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "mts" | "cts" | "tsx" => "typescript",
        "c" | "h" => "c",
        "cpp" | "cxx" | "cc" | "hpp" | "hxx" | "hh" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "swift" => "swift",
        "rb" => "ruby",
        "php" | "phtml" => "php",
        "pl" | "pm" => "perl",
        "lua" => "lua",
        "r" => "r",
        "html" | "htm" | "xhtml" => "html",
        "twig" => "twig",
        "hbs" | "handlebars" => "handlebars",
        "liquid" => "liquid",
        "css" => "css",
        "scss" => "scss",
        "less" => "less",
        "json" | "jsonc" => "json",
        "yaml" | "yml" => "yaml",
        "toml" | "ini" | "conf" | "cfg" => "ini",
        "xml" | "xsd" | "xsl" | "svg" => "xml",
        "md" | "markdown" => "markdown",
        "sql" => "sql",
        "sh" | "bash" | "zsh" => "shell",
        "ps1" | "psm1" => "powershell",
        "bat" | "cmd" => "bat",
        "dockerfile" => "dockerfile",
        "graphql" | "gql" => "graphql",
        _ => return None,
    };
    Some(id)
}

/// Determine the Monaco language id for a file name.
///
/// User associations (keyed by extension) win over the built-in table, then
/// a few well-known extensionless names are recognised.
pub fn detect_language(filename: &str, associations: &HashMap<String, String>) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty());
    if let Some(ext) = ext {
        if let Some(lang) = associations.get(ext) {
            return lang.clone();
        }
        if let Some(lang) = language_for_extension(&ext.to_lowercase()) {
            return lang.to_string();
        }
    }

    match name.to_lowercase().as_str() {
        "dockerfile" => "dockerfile".to_string(),
        "makefile" | "gnumakefile" => "shell".to_string(),
        ".bashrc" | ".bash_profile" | ".zshrc" | ".profile" => "shell".to_string(),
        _ => PLAINTEXT.to_string(),
    }
}
