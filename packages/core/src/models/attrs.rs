//! Block attribute partitioning
//!
//! Some host block-update operations reset non-text attributes as a side
//! effect of a text write, so every destructive rewrite first snapshots the
//! block's user style attributes and reapplies them afterwards. This module
//! decides which keys count as user style and which are system-reserved and
//! must never be copied between blocks.

use std::collections::HashMap;

/// Attribute holding the id of the sub-document a list item is linked to.
pub const ATTR_LINKED_DOC: &str = "custom-linked-doc-id";

/// Attribute holding the id of the heading block a list item is linked to.
pub const ATTR_LINKED_HEADING: &str = "custom-linked-heading-id";

/// System-reserved attribute keys, plus the two core-owned link attributes.
/// None of these may survive a style copy.
const RESERVED_KEYS: &[&str] = &[
    "id",
    "created",
    "updated",
    "hash",
    "box",
    "path",
    "hpath",
    "parent_id",
    "root_id",
    "type",
    "subtype",
    "sort",
    "markdown",
    "content",
    "name",
    "alias",
    "memo",
    ATTR_LINKED_DOC,
    ATTR_LINKED_HEADING,
];

/// Whether an attribute key is system-reserved (or core-owned).
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Partition a block's attributes, keeping only the user style attributes
/// that must be preserved across rewrites.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use blocklink_core::models::filter_preservable;
///
/// let mut attrs = HashMap::new();
/// attrs.insert("id".to_string(), "b1".to_string());
/// attrs.insert("style".to_string(), "color:red".to_string());
///
/// let kept = filter_preservable(&attrs);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept.get("style").map(String::as_str), Some("color:red"));
/// ```
pub fn filter_preservable(attrs: &HashMap<String, String>) -> HashMap<String, String> {
    attrs
        .iter()
        .filter(|(key, _)| !is_reserved(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_reserved_keys_dropped() {
        let input = attrs(&[
            ("id", "b1"),
            ("created", "20250101000000"),
            ("updated", "20250101000001"),
            ("type", "p"),
            ("style", "color:red"),
        ]);
        let kept = filter_preservable(&input);
        assert_eq!(kept, attrs(&[("style", "color:red")]));
    }

    #[test]
    fn test_link_attributes_never_copied() {
        let input = attrs(&[
            (ATTR_LINKED_DOC, "doc-1"),
            (ATTR_LINKED_HEADING, "h-1"),
            ("custom-tag", "important"),
        ]);
        let kept = filter_preservable(&input);
        assert_eq!(kept, attrs(&[("custom-tag", "important")]));
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_preservable(&HashMap::new()).is_empty());
    }

    #[test]
    fn test_is_reserved() {
        assert!(is_reserved("hpath"));
        assert!(is_reserved(ATTR_LINKED_DOC));
        assert!(!is_reserved("custom-anything"));
    }
}
