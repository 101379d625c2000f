//! Identifier helpers shared across the normalization passes.

use std::collections::HashSet;
use std::sync::LazyLock;

use modelir_common::NamingConvention;

/// Reserved words of the supported target languages that cannot be used as identifiers.
pub static RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
        "object",
        "string",
        "base",
        "namespace",
    ]
    .into_iter()
    .collect()
});

const SEPARATORS: [char; 4] = ['_', '-', '.', ' '];

/// Escape a string for use in a double-quoted string literal.
pub fn escape_string_literal(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lower-camel-case a name: separators are dropped and the following letter capitalized.
pub fn camelize(name: &str) -> String {
    let mut result = String::new();
    for part in name.split(SEPARATORS).filter(|p| !p.is_empty()) {
        if result.is_empty() {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                result.extend(first.to_lowercase());
                result.extend(chars);
            }
        } else {
            result.push_str(&capitalize_first(part));
        }
    }
    result
}

/// Turn a source name into a safe target identifier.
/// - ALL_CAPS names are kept as they are
/// - everything else is camelized
/// - a leading digit or a reserved word gets a `_` prefix
pub fn sanitize_identifier(name: &str) -> String {
    let is_constant = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_');
    let mut result = if is_constant {
        name.to_string()
    } else {
        camelize(name)
    };

    if result.is_empty() {
        return "_empty".to_string();
    }

    if result.starts_with(|c: char| c.is_ascii_digit())
        || RESERVED_WORDS.contains(result.as_str())
    {
        result = format!("_{result}");
    }

    result
}

/// Convert a string to snake_case (for comparison purposes).
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert a type name to kebab-case ("PetOwner" -> "pet-owner", "HTTPServer" -> "http-server").
pub fn to_kebab_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if SEPARATORS.contains(&c) {
            if !result.is_empty() && !result.ends_with('-') {
                result.push('-');
            }
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary && !result.ends_with('-') {
                result.push('-');
            }
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Relative file name of a model under the given naming convention.
pub fn model_filename(name: &str, naming: NamingConvention) -> String {
    let stem = match naming {
        NamingConvention::CamelCase => camelize(name),
        NamingConvention::KebabCase => to_kebab_case(name),
    };
    format!("./{stem}")
}
