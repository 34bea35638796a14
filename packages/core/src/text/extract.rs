//! Wrapper extraction for synced content blocks
//!
//! A sync-managed content block encodes, at the start of its markdown, an
//! optional icon segment (`[icon](host://blocks/<docId>)`) followed by a
//! separator segment (a literal glyph, or `[glyph](host://blocks/<headingId>)`
//! once bound to a heading), followed by the free-form rich payload and an
//! optional trailing inline-attribute suffix (`{: key="value"}`).
//!
//! The grammar is ordered: a block whose markdown starts with the separator
//! segment has no icon segment, so the separator is never mistaken for one.
//! All pattern matching for the wrapper lives here so the sync engine never
//! touches raw regexes.

use crate::text::strip_markdown_syntax;
use regex::Regex;
use std::sync::LazyLock;

/// Trailing inline-attribute suffix, captured verbatim for re-appending
static IAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s|^)(\{:[^}]+\})\s*$").unwrap());

/// Leading heading marks, e.g. "## "
static HEADING_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+\s+").unwrap());

/// The pieces of a content block's markdown after wrapper extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    /// Whether the separator segment was present (the block has been synced)
    pub has_wrapper: bool,
    /// The free-form payload with icon and separator segments removed
    pub rich_markdown: String,
    /// `rich_markdown` with markdown syntax stripped, used for matching
    pub plain_text: String,
    /// Icon token found at the start of the block, if any: the bracketed
    /// text of an icon link, a bare emoji, or a `:shortcode:`
    pub icon_token: Option<String>,
    /// Trailing `{: ...}` suffix, verbatim, to re-append after rewrites
    pub trailing_attr_suffix: Option<String>,
}

/// Split a trailing inline-attribute suffix off a block's markdown.
///
/// Returns the body (trailing whitespace trimmed) and the suffix verbatim.
pub fn split_attr_suffix(md: &str) -> (String, Option<String>) {
    match IAL_SUFFIX.captures(md) {
        Some(caps) => {
            let whole = caps.get(0).unwrap();
            let suffix = caps.get(1).unwrap().as_str().to_string();
            (md[..whole.start()].trim_end().to_string(), Some(suffix))
        }
        None => (md.trim_end().to_string(), None),
    }
}

/// Strip leading `#` marks and the trailing attribute suffix from a heading
/// block's markdown, leaving its payload.
pub fn clean_heading_content(md: &str) -> String {
    let content = HEADING_PREFIX.replace(md, "");
    let (body, _) = split_attr_suffix(content.trim());
    body.trim().to_string()
}

/// Compiled wrapper patterns for one separator glyph.
///
/// Built once per sync session from the configured separator; the sync
/// engine and tree walker share a single instance.
pub struct ContentExtractor {
    separator: String,
    /// Separator segment anchored at the start: glyph or glyph-link
    sep_prefix: Regex,
    /// Separator segment anywhere in the block
    sep_anywhere: Regex,
    /// Icon-link segment anchored at the start
    icon_link_prefix: Regex,
    /// Any host block link, anywhere
    link_anywhere: Regex,
    /// Icon token at the start: bare emoji, `:shortcode:`, or link text
    icon_token: Regex,
}

impl ContentExtractor {
    pub fn new(separator: &str) -> Self {
        let sep = regex::escape(separator);
        let sep_segment = format!(r"(?:\[{sep}\]\(host://blocks/[a-zA-Z0-9-]+\)|{sep})");
        Self {
            separator: separator.to_string(),
            sep_prefix: Regex::new(&format!(r"^\s*{sep_segment}\s*")).unwrap(),
            sep_anywhere: Regex::new(&sep_segment).unwrap(),
            icon_link_prefix: Regex::new(r"^\s*\[[^\]]*\]\(host://blocks/[a-zA-Z0-9-]+\)\s*")
                .unwrap(),
            link_anywhere: Regex::new(r"\[[^\]]*\]\(host://blocks/[a-zA-Z0-9-]+\)").unwrap(),
            icon_token: Regex::new(
                r"^(?:(?P<emoji>[\x{10000}-\x{10FFFF}])|(?P<code>:[^:\s]+:)|\[(?P<link>[^\]]*)\]\(host://blocks/[a-zA-Z0-9-]+\))",
            )
            .unwrap(),
        }
    }

    /// The separator glyph this extractor was built for.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Whether a block's markdown carries any wrapper marker (separator or
    /// host link). Used to pick the content child among a list item's
    /// paragraphs.
    pub fn is_sync_candidate(&self, md: &str) -> bool {
        self.sep_anywhere.is_match(md) || self.link_anywhere.is_match(md)
    }

    /// Decompose a content block's raw markdown into its wrapper pieces.
    pub fn extract(&self, raw: &str) -> ExtractedContent {
        let (body, trailing_attr_suffix) = split_attr_suffix(raw);
        let mut work = body;
        let mut has_wrapper = false;
        let mut icon_token = None;

        if let Some(m) = self.sep_prefix.find(&work) {
            // Leading separator: synced block without an icon segment
            has_wrapper = true;
            work = work[m.end()..].to_string();
        } else {
            if let Some(caps) = self.icon_token.captures(work.trim_start()) {
                icon_token = caps
                    .name("emoji")
                    .or_else(|| caps.name("code"))
                    .or_else(|| caps.name("link"))
                    .map(|m| m.as_str().to_string());
            }
            if let Some(m) = self.icon_link_prefix.find(&work) {
                work = work[m.end()..].to_string();
            }
            if let Some(m) = self.sep_prefix.find(&work) {
                has_wrapper = true;
                work = work[m.end()..].to_string();
            }
        }

        let rich_markdown = work.trim().to_string();
        let plain_text = strip_markdown_syntax(&rich_markdown);

        ExtractedContent {
            has_wrapper,
            rich_markdown,
            plain_text,
            icon_token,
            trailing_attr_suffix,
        }
    }

    /// Rebuild a content block's wrapper markdown.
    ///
    /// `icon_link` is a pre-formatted `[glyph](host://blocks/<docId>)`
    /// segment; the separator links to `heading_id` when bound, else stays a
    /// bare glyph. Inverse of [`extract`](Self::extract) for the prefix.
    pub fn construct_wrapper(
        &self,
        icon_link: Option<&str>,
        heading_id: Option<&str>,
        payload: &str,
    ) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(3);
        if let Some(icon) = icon_link {
            parts.push(icon.to_string());
        }
        match heading_id {
            Some(id) => parts.push(format!("[{}](host://blocks/{})", self.separator, id)),
            None => parts.push(self.separator.clone()),
        }
        parts.push(payload.trim().to_string());
        parts.join(" ")
    }

    /// Replace a leading icon-link segment with `icon_link`, or prepend it
    /// when the body has none. Used by pull-from-document, which refreshes
    /// the icon unconditionally.
    pub fn replace_or_prepend_icon(&self, body: &str, icon_link: &str) -> String {
        // A leading separator segment is not an icon segment
        if self.sep_prefix.is_match(body) {
            return format!("{} {}", icon_link, body.trim_start());
        }
        if let Some(m) = self.icon_link_prefix.find(body) {
            let leading = &body[..m.start()];
            format!("{}{} {}", leading, icon_link, body[m.end()..].trim_start())
        } else {
            format!("{} {}", icon_link, body.trim_start())
        }
    }
}
