//! Utility functions and constants for HTML processing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas",
    "center", "dd", "dir", "div", "dl", "dt", "fieldset", "figcaption",
    "figure", "footer", "form", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "html", "isindex", "li", "main", "menu",
    "nav", "noframes", "noscript", "ol", "output", "p", "pre", "section",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text keeps its whitespace when rendered
pub const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea", "listing", "plaintext"];

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag preserves whitespace in its text
pub fn is_preformatted(tag: &str) -> bool {
    PREFORMATTED_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Repeat a string n times
pub fn repeat(s: &str, n: usize) -> String {
    s.repeat(n)
}

/// Collapse every whitespace run (newlines included) to a single space
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").into_owned()
}

/// Clean an attribute value for embedding in generated markup.
///
/// Whitespace runs collapse to one space and the ends are trimmed; a missing
/// attribute cleans to the empty string.
pub fn clean_attribute(value: Option<&str>) -> String {
    value
        .map(|v| collapse_whitespace(v).trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat() {
        assert_eq!(repeat("=", 5), "=====");
        assert_eq!(repeat("-", 0), "");
    }

    #[test]
    fn test_is_block() {
        assert!(is_block("div"));
        assert!(is_block("PRE"));
        assert!(!is_block("span"));
        assert!(!is_block("code"));
    }

    #[test]
    fn test_is_void() {
        assert!(is_void("br"));
        assert!(is_void("HR"));
        assert!(!is_void("br-keep"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("\n\n"), " ");
    }

    #[test]
    fn test_clean_attribute() {
        assert_eq!(clean_attribute(Some("  A\n   title\n\n here ")), "A title here");
        assert_eq!(clean_attribute(Some("   ")), "");
        assert_eq!(clean_attribute(None), "");
    }
}
