//! Markdown stripping for continuity matching
//!
//! Produces the plain-text rendering the reconciliation algorithm compares
//! against. This is deliberately the *matching* variant: links and images are
//! removed entirely (text and target), because a link inside the synced
//! region means the region's rendered text can no longer be patched by a
//! blind substring replacement — dropping the link text makes such regions
//! fail the containment check instead of being corrupted.

use regex::Regex;
use std::sync::LazyLock;

/// Compiled strip patterns, applied in order:
///
/// 1. Images before links (shared bracket syntax)
/// 2. Links removed entirely
/// 3. Inline code delimiters removed, content kept
/// 4. Paired emphasis delimiters before single ones (`**` conflicts with `*`)
/// 5. HTML tags
static STRIP_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        // Images: ![alt](url) -> removed
        (Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap(), ""),
        // Links: [text](url) -> removed
        (Regex::new(r"\[[^\]]*\]\([^)]*\)").unwrap(), ""),
        // Inline code: `code` -> code
        (Regex::new(r"`([^`]+)`").unwrap(), "$1"),
        // Bold / strikethrough / highlight delimiters
        (Regex::new(r"(\*\*|__|~~|==)").unwrap(), ""),
        // Italic delimiters
        (Regex::new(r"[*_]").unwrap(), ""),
        // HTML tags
        (Regex::new(r"<[^>]+>").unwrap(), ""),
    ]
});

/// Strip markdown syntax from a synced region, returning its plain text.
///
/// # Examples
///
/// ```
/// use blocklink_core::text::strip_markdown_syntax;
///
/// assert_eq!(strip_markdown_syntax("**bold** text"), "bold text");
/// assert_eq!(strip_markdown_syntax("`code` kept"), "code kept");
/// // Links are removed entirely, not reduced to their text
/// assert_eq!(strip_markdown_syntax("see [here](https://x) now"), "see  now");
/// ```
pub fn strip_markdown_syntax(md: &str) -> String {
    if md.is_empty() {
        return String::new();
    }

    let mut plain = md.to_string();
    for (pattern, replacement) in STRIP_PATTERNS.iter() {
        plain = pattern.replace_all(&plain, *replacement).to_string();
    }

    plain = plain
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    plain.trim().to_string()
}
