//! Sync configuration
//!
//! An explicit configuration value handed to the tree walk at call time.
//! The two enum flags pin down behaviors that earlier revisions of this
//! engine implemented both ways; the defaults are the variants the engine
//! converged on.

use serde::{Deserialize, Serialize};

/// Default separator glyph marking a content block as sync-managed.
pub const DEFAULT_SEPARATOR: &str = "➖";

/// What push-to-heading writes as the heading payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeadingPayload {
    /// The rich markdown of the synced region, decorations intact
    #[default]
    RichMarkdown,
    /// The plain text of the synced region, leading wrapper artifacts removed
    PlainText,
}

/// What pull-from-heading does when the continuity check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeadingPullFallback {
    /// Rebuild the wrapper from scratch with the heading payload
    #[default]
    Reconstruct,
    /// Leave the text untouched and record the item for manual review
    RecordError,
}

/// Configuration for one sync invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    pub heading_payload: HeadingPayload,
    pub heading_pull_fallback: HeadingPullFallback,
    /// Separator glyph; single short glyphs only
    pub separator: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            heading_payload: HeadingPayload::default(),
            heading_pull_fallback: HeadingPullFallback::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.heading_payload, HeadingPayload::RichMarkdown);
        assert_eq!(config.heading_pull_fallback, HeadingPullFallback::Reconstruct);
        assert_eq!(config.separator, DEFAULT_SEPARATOR);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: SyncConfig = serde_json::from_str(r#"{"headingPayload":"plainText"}"#).unwrap();
        assert_eq!(config.heading_payload, HeadingPayload::PlainText);
        assert_eq!(config.separator, DEFAULT_SEPARATOR);
    }
}
