//! Icon token codec
//!
//! The host stores document icons as hyphen-delimited hex code point
//! sequences (e.g. `"1f4c4"`, `"1f469-200d-1f692"`), as literal glyphs, or
//! as file paths for image icons. This module converts between the stored
//! token and the displayed character.

use regex::Regex;
use std::sync::LazyLock;

/// Default icon for a document without sub-documents
pub const DEFAULT_LEAF_ICON: &str = "📄";

/// Default icon for a document that has sub-documents
pub const DEFAULT_CONTAINER_ICON: &str = "📑";

/// Hyphen-delimited hex code point groups, e.g. "1f600" or "1f468-200d-1f466"
static HEX_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]+(-[0-9a-fA-F]+)*$").unwrap());

fn default_icon(has_children: bool) -> &'static str {
    if has_children {
        DEFAULT_CONTAINER_ICON
    } else {
        DEFAULT_LEAF_ICON
    }
}

/// Resolve a stored icon token to its display character.
///
/// - Empty token: default glyph (leaf or container depending on `has_children`)
/// - Token containing a path separator or extension dot: file-based icon,
///   falls back to the default glyph
/// - Hex code point sequence: decoded and concatenated; any invalid code
///   point falls back to the default glyph
/// - Anything else is already a literal glyph and is returned unchanged
///
/// # Examples
///
/// ```
/// use blocklink_core::text::icon;
///
/// assert_eq!(icon::decode("1f4c4", false), "📄");
/// assert_eq!(icon::decode("", true), "📑");
/// assert_eq!(icon::decode("custom.png", false), "📄");
/// ```
pub fn decode(token: &str, has_children: bool) -> String {
    if token.is_empty() {
        return default_icon(has_children).to_string();
    }

    if token.contains('/') || token.contains('.') {
        return default_icon(has_children).to_string();
    }

    if HEX_SEQUENCE.is_match(token) {
        let mut result = String::new();
        for group in token.split('-') {
            let decoded = u32::from_str_radix(group, 16)
                .ok()
                .and_then(char::from_u32);
            match decoded {
                Some(c) => result.push(c),
                None => return default_icon(has_children).to_string(),
            }
        }
        return result;
    }

    token.to_string()
}

/// Convert a display character back to the host's stored representation.
///
/// Strings containing any character outside the printable ASCII range are
/// converted to lowercase hex code points joined with hyphens; pure-ASCII
/// tokens (shortcodes, file names) pass through unchanged.
///
/// Round-trips with [`decode`] for every value `encode` produces.
pub fn encode(display: &str) -> String {
    let is_printable_ascii = |c: char| (' '..='~').contains(&c);
    if display.chars().all(is_printable_ascii) {
        return display.to_string();
    }

    display
        .chars()
        .map(|c| format!("{:x}", c as u32))
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_single() {
        assert_eq!(decode("1f4c4", false), "📄");
        assert_eq!(decode("1F600", false), "😀");
    }

    #[test]
    fn test_decode_hex_sequence() {
        // Woman firefighter: ZWJ sequence
        assert_eq!(decode("1f469-200d-1f692", false), "👩\u{200d}🚒");
    }

    #[test]
    fn test_decode_empty_uses_default() {
        assert_eq!(decode("", false), DEFAULT_LEAF_ICON);
        assert_eq!(decode("", true), DEFAULT_CONTAINER_ICON);
    }

    #[test]
    fn test_decode_file_icon_uses_default() {
        assert_eq!(decode("icon.png", false), DEFAULT_LEAF_ICON);
        assert_eq!(decode("api/icon/custom", true), DEFAULT_CONTAINER_ICON);
    }

    #[test]
    fn test_decode_invalid_code_point_uses_default() {
        // 110000 is beyond the Unicode range
        assert_eq!(decode("110000", false), DEFAULT_LEAF_ICON);
        // Surrogate half is not a valid char
        assert_eq!(decode("d800", true), DEFAULT_CONTAINER_ICON);
    }

    #[test]
    fn test_decode_literal_glyph_passthrough() {
        assert_eq!(decode("📌", false), "📌");
    }

    #[test]
    fn test_encode_ascii_passthrough() {
        assert_eq!(encode("smile"), "smile");
        assert_eq!(encode(""), "");
    }

    #[test]
    fn test_encode_emoji() {
        assert_eq!(encode("📄"), "1f4c4");
        assert_eq!(encode("👩\u{200d}🚒"), "1f469-200d-1f692");
    }

    #[test]
    fn test_round_trip() {
        for glyph in ["📄", "📑", "😀", "👩\u{200d}🚒", "➖", "文"] {
            assert_eq!(decode(&encode(glyph), false), glyph);
        }
    }
}
