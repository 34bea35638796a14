//! Index and outline markdown producers
//!
//! Walks a notebook's document tree (index) or a document's heading tree
//! (outline) and emits nested list markdown linking back to the source
//! blocks. Pure text building - the reconciliation machinery in
//! [`crate::sync`] is not involved.

use crate::models::OutlineEntry;
use crate::outline::queue::{IndexQueue, IndexQueueNode};
use crate::store::BlockStore;
use crate::text::{clean_heading_content, icon};
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::LazyLock;

/// `key="value"` pair inside an inline attribute list
static IAL_PAIR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(\S+?)="([^"]*)""#).unwrap());

/// List marker style for generated entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListStyle {
    #[default]
    Unordered,
    Ordered,
}

impl ListStyle {
    pub fn marker(&self) -> &'static str {
        match self {
            ListStyle::Unordered => "* ",
            ListStyle::Ordered => "1. ",
        }
    }
}

/// How generated entries link back to their source block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkStyle {
    /// Plain link: `[name](host://blocks/<id>)`
    #[default]
    Ref,
    /// Static block reference: `((id "anchor")) name`
    Embed,
}

/// Configuration for the index and outline producers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutlineConfig {
    /// Maximum tree depth; 0 means unlimited
    pub depth: usize,
    pub list_style: ListStyle,
    pub link_style: LinkStyle,
    /// Prefix entries with the document icon glyph
    pub icons_enabled: bool,
    /// Fold entries at this depth and deeper; 0 disables folding
    pub fold_depth: usize,
    /// Split top-level entries across this many columns
    pub columns: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            depth: 0,
            list_style: ListStyle::default(),
            link_style: LinkStyle::default(),
            icons_enabled: true,
            fold_depth: 0,
            columns: 1,
        }
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Keep only whitelisted presentation keys of a heading's inline attribute
/// list (`style`, `class`), dropping ids and bookkeeping.
fn filter_style_ial(ial: &str) -> String {
    IAL_PAIR
        .captures_iter(ial)
        .filter(|caps| matches!(caps.get(1).unwrap().as_str(), "style" | "class"))
        .map(|caps| caps.get(0).unwrap().as_str().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate index markdown for the document tree under `path`.
///
/// One list entry per document, nested by file-tree level, linking each
/// entry back to its document block.
pub async fn generate_index(
    store: &dyn BlockStore,
    notebook_id: &str,
    path: &str,
    config: &OutlineConfig,
) -> Result<String> {
    let mut queue = IndexQueue::new();
    collect_documents(store, notebook_id, path, 0, config, &mut queue).await?;
    Ok(queue.flatten(config))
}

type CollectFuture<'f> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'f>>;

fn collect_documents<'f>(
    store: &'f dyn BlockStore,
    notebook_id: &'f str,
    path: &str,
    tab: usize,
    config: &'f OutlineConfig,
    queue: &'f mut IndexQueue,
) -> CollectFuture<'f> {
    let path = path.to_string();
    Box::pin(async move {
        if config.depth != 0 && tab >= config.depth {
            return Ok(());
        }
        let tab = tab + 1;

        for doc in store.list_documents(notebook_id, &path).await? {
            let mut line = "    ".repeat(tab - 1);
            line.push_str(config.list_style.marker());

            let icon_str = if config.icons_enabled {
                icon::decode(&doc.icon, doc.sub_file_count != 0)
            } else {
                String::new()
            };
            let name = escape_html(&doc.name);

            match config.link_style {
                LinkStyle::Ref => {
                    if !icon_str.is_empty() {
                        line.push_str(&icon_str);
                        line.push(' ');
                    }
                    line.push_str(&format!("[{name}](host://blocks/{})\n", doc.id));
                }
                LinkStyle::Embed => {
                    let safe_icon = icon_str.replace('"', "&quot;");
                    line.push_str(&format!("(({} \"{safe_icon}\")) {name}\n", doc.id));
                }
            }

            let mut node = IndexQueueNode::new(tab, line);
            if doc.sub_file_count > 0 {
                collect_documents(store, notebook_id, &doc.path, tab, config, &mut node.children)
                    .await?;
            }
            queue.push(node);
        }
        Ok(())
    })
}

/// Generate outline markdown for a document's heading tree.
///
/// Each heading becomes a quoted list entry linking back to the heading
/// block; whitelisted style attributes of the heading are carried along as
/// an inline attribute list on the entry.
pub fn generate_outline(
    entries: &[OutlineEntry],
    base_indent: usize,
    config: &OutlineConfig,
) -> String {
    let mut out = String::new();
    render_outline(entries, 1, base_indent, config, &mut out);
    out
}

fn render_outline(
    entries: &[OutlineEntry],
    level: usize,
    base_indent: usize,
    config: &OutlineConfig,
    out: &mut String,
) {
    for entry in entries {
        let name = clean_heading_content(&entry.markdown);
        let indent = format!("{}> {}", "    ".repeat(base_indent), "    ".repeat(level - 1));
        let ial_part = entry
            .ial
            .as_deref()
            .map(filter_style_ial)
            .filter(|s| !s.is_empty())
            .map(|s| format!("\n{indent}   {{: {s}}}"))
            .unwrap_or_default();

        out.push_str(&indent);
        out.push_str(config.list_style.marker());
        match config.link_style {
            LinkStyle::Ref => {
                out.push_str(&format!("[{name}](host://blocks/{})", entry.id));
            }
            LinkStyle::Embed => {
                let safe = name.replace('"', "&quot;");
                out.push_str(&format!("(({} \"{safe}\"))", entry.id));
            }
        }
        out.push_str(&ial_part);
        out.push('\n');

        if !entry.children.is_empty() {
            render_outline(&entry.children, level + 1, base_indent, config, out);
        }
    }
}
