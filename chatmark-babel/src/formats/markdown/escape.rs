//! Escaping of literal content for chat markdown

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that carry markdown meaning in chat messages
pub const ESCAPED_CHARS: [char; 5] = ['*', '~', '_', '`', '|'];

static LEGACY_FORMATTING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)§[0-9A-FK-OR]").unwrap());

/// Backslash-escapes every markdown character that is not already escaped.
///
/// An occurrence counts as escaped when it is preceded by an odd number of backslashes, so
/// running this over its own output changes nothing.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut backslashes = 0usize;
    for c in text.chars() {
        if ESCAPED_CHARS.contains(&c) && backslashes % 2 == 0 {
            out.push('\\');
        }
        out.push(c);
        backslashes = if c == '\\' { backslashes + 1 } else { 0 };
    }
    out
}

/// Removes legacy `§x` color and format codes
pub fn strip_legacy_formatting(text: &str) -> String {
    LEGACY_FORMATTING.replace_all(text, "").into_owned()
}
