//! In-memory reference implementation of [`BlockStore`]
//!
//! Backs the integration tests and doubles as executable documentation of
//! the host behavior the core relies on: merge-semantics attribute writes,
//! rendered `content` derived from markdown, sibling sort keys, and a
//! notebook path tree for documents. Like the host, it renders a block's
//! plain-text `content` from its markdown (here via pulldown-cmark) and
//! stamps `created`/`updated` system attributes.

use crate::models::{Block, BlockQuery, BlockType, DocEntry, DocPath, OutlineEntry};
use crate::store::BlockStore;
use crate::text::split_attr_suffix;
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use pulldown_cmark::{Event, Parser};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    blocks: HashMap<String, Block>,
    attrs: HashMap<String, HashMap<String, String>>,
    doc_paths: HashMap<String, DocPath>,
}

/// HashMap-backed block store for tests and examples.
#[derive(Default)]
pub struct MemoryBlockStore {
    inner: Mutex<Inner>,
}

/// Render markdown to the plain text the host would store in `content`.
fn render_plain(markdown: &str) -> String {
    let mut out = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            _ => {}
        }
    }
    out.trim().to_string()
}

fn timestamp() -> String {
    Utc::now().format("%Y%m%d%H%M%S").to_string()
}

/// Infer the block type the host would assign to freshly inserted markdown.
fn infer_type(markdown: &str) -> BlockType {
    let trimmed = markdown.trim_start();
    let marks = trimmed.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&marks) && trimmed[marks..].starts_with(' ') {
        BlockType::Heading
    } else {
        BlockType::Paragraph
    }
}

/// Parent path of a document path: `"/a/b"` -> `"/a"`, `"/a"` -> `"/"`.
fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "/",
    }
}

fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block directly, rendering its `content` and stamping the
    /// `created`/`updated` system attributes. Returns the block id.
    pub fn insert_block(&self, mut block: Block) -> String {
        if block.content.is_empty() {
            block.content = render_plain(&block.markdown);
        }
        let id = block.id.clone();
        let mut inner = self.inner.lock().unwrap();
        let now = timestamp();
        let entry = inner.attrs.entry(id.clone()).or_default();
        entry.insert("created".to_string(), now.clone());
        entry.insert("updated".to_string(), now);
        inner.blocks.insert(id.clone(), block);
        id
    }

    fn new_block_after(&self, previous_id: &str, markdown: &str) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        let prev = inner
            .blocks
            .get(previous_id)
            .ok_or_else(|| anyhow!("block not found: {previous_id}"))?
            .clone();
        for sibling in inner.blocks.values_mut() {
            if sibling.parent_id == prev.parent_id && sibling.sort_key > prev.sort_key {
                sibling.sort_key += 1;
            }
        }
        let id = Uuid::new_v4().to_string();
        let mut block = Block::new(
            id.clone(),
            infer_type(markdown),
            prev.parent_id.clone(),
            prev.root_id.clone(),
            markdown,
            prev.sort_key + 1,
        );
        block.content = render_plain(markdown);
        let now = timestamp();
        let entry = inner.attrs.entry(id.clone()).or_default();
        entry.insert("created".to_string(), now.clone());
        entry.insert("updated".to_string(), now);
        inner.blocks.insert(id.clone(), block);
        Ok(id)
    }

    fn document_root_of(inner: &Inner, block_id: &str) -> Result<String> {
        let block = inner
            .blocks
            .get(block_id)
            .ok_or_else(|| anyhow!("block not found: {block_id}"))?;
        match block.block_type {
            BlockType::Document => Ok(block.id.clone()),
            _ => block
                .root_id
                .clone()
                .ok_or_else(|| anyhow!("block has no owning document: {block_id}")),
        }
    }

    fn attach_outline(nodes: &mut Vec<OutlineEntry>, entry: OutlineEntry) {
        if let Some(last) = nodes.last_mut() {
            if last.depth < entry.depth {
                Self::attach_outline(&mut last.children, entry);
                return;
            }
        }
        nodes.push(entry);
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn query(&self, query: BlockQuery) -> Result<Vec<Block>> {
        let inner = self.inner.lock().unwrap();
        let mut results: Vec<Block> = inner
            .blocks
            .values()
            .filter(|b| query.id.as_ref().map_or(true, |id| &b.id == id))
            .filter(|b| {
                query
                    .parent_id
                    .as_ref()
                    .map_or(true, |p| b.parent_id.as_ref() == Some(p))
            })
            .filter(|b| query.block_type.map_or(true, |t| b.block_type == t))
            .cloned()
            .collect();
        results.sort_by(|a, b| a.sort_key.cmp(&b.sort_key).then(a.id.cmp(&b.id)));
        Ok(results)
    }

    async fn exists(&self, block_id: &str) -> Result<bool> {
        Ok(self.inner.lock().unwrap().blocks.contains_key(block_id))
    }

    async fn get_attributes(&self, block_id: &str) -> Result<HashMap<String, String>> {
        let inner = self.inner.lock().unwrap();
        let block = inner
            .blocks
            .get(block_id)
            .ok_or_else(|| anyhow!("block not found: {block_id}"))?;
        let mut attrs = inner.attrs.get(block_id).cloned().unwrap_or_default();
        attrs.insert("id".to_string(), block.id.clone());
        attrs.insert("type".to_string(), block.block_type.host_tag().to_string());
        if let Some(doc_path) = inner.doc_paths.get(block_id) {
            attrs.insert("box".to_string(), doc_path.notebook_id.clone());
            attrs.insert("path".to_string(), doc_path.path.clone());
        }
        Ok(attrs)
    }

    async fn set_attributes(&self, block_id: &str, attrs: HashMap<String, String>) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.blocks.contains_key(block_id) {
            bail!("block not found: {block_id}");
        }
        let entry = inner.attrs.entry(block_id.to_string()).or_default();
        for (key, value) in attrs {
            entry.insert(key, value);
        }
        entry.insert("updated".to_string(), timestamp());
        Ok(())
    }

    async fn update_text(&self, block_id: &str, markdown: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let block = inner
            .blocks
            .get_mut(block_id)
            .ok_or_else(|| anyhow!("block not found: {block_id}"))?;
        block.markdown = markdown.to_string();
        block.content = render_plain(markdown);
        inner
            .attrs
            .entry(block_id.to_string())
            .or_default()
            .insert("updated".to_string(), timestamp());
        Ok(())
    }

    async fn insert_after(&self, previous_id: &str, markdown: &str) -> Result<String> {
        self.new_block_after(previous_id, markdown)
    }

    async fn append_child(&self, parent_id: &str, markdown: &str) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        let parent = inner
            .blocks
            .get(parent_id)
            .ok_or_else(|| anyhow!("block not found: {parent_id}"))?
            .clone();
        let root_id = match parent.block_type {
            BlockType::Document => Some(parent.id.clone()),
            _ => parent.root_id.clone(),
        };
        let sort_key = inner
            .blocks
            .values()
            .filter(|b| b.parent_id.as_deref() == Some(parent_id))
            .map(|b| b.sort_key)
            .max()
            .map_or(0, |max| max + 1);
        let id = Uuid::new_v4().to_string();
        let mut block = Block::new(
            id.clone(),
            infer_type(markdown),
            Some(parent_id.to_string()),
            root_id,
            markdown,
            sort_key,
        );
        block.content = render_plain(markdown);
        let now = timestamp();
        let entry = inner.attrs.entry(id.clone()).or_default();
        entry.insert("created".to_string(), now.clone());
        entry.insert("updated".to_string(), now);
        inner.blocks.insert(id.clone(), block);
        Ok(id)
    }

    async fn create_document(
        &self,
        notebook_id: &str,
        path: &str,
        initial_markdown: &str,
    ) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        let id = Uuid::new_v4().to_string();
        let mut block = Block::new(
            id.clone(),
            BlockType::Document,
            None,
            None,
            initial_markdown,
            0,
        );
        block.content = render_plain(initial_markdown);
        let now = timestamp();
        let entry = inner.attrs.entry(id.clone()).or_default();
        entry.insert("created".to_string(), now.clone());
        entry.insert("updated".to_string(), now);
        entry.insert("title".to_string(), leaf_name(path).to_string());
        inner.blocks.insert(id.clone(), block);
        inner.doc_paths.insert(
            id.clone(),
            DocPath {
                notebook_id: notebook_id.to_string(),
                path: path.to_string(),
            },
        );
        Ok(id)
    }

    async fn rename_document(&self, block_id: &str, new_title: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let doc_path = inner
            .doc_paths
            .get_mut(block_id)
            .ok_or_else(|| anyhow!("not a document: {block_id}"))?;
        let parent = parent_path(&doc_path.path).to_string();
        doc_path.path = if parent == "/" {
            format!("/{new_title}")
        } else {
            format!("{parent}/{new_title}")
        };
        let entry = inner.attrs.entry(block_id.to_string()).or_default();
        entry.insert("title".to_string(), new_title.to_string());
        entry.insert("updated".to_string(), timestamp());
        Ok(())
    }

    async fn resolve_path(&self, block_id: &str) -> Result<DocPath> {
        let inner = self.inner.lock().unwrap();
        let doc_id = Self::document_root_of(&inner, block_id)?;
        inner
            .doc_paths
            .get(&doc_id)
            .cloned()
            .ok_or_else(|| anyhow!("no path recorded for document: {doc_id}"))
    }

    async fn resolve_human_path(&self, block_id: &str) -> Result<String> {
        Ok(self.resolve_path(block_id).await?.path)
    }

    async fn list_documents(&self, notebook_id: &str, path: &str) -> Result<Vec<DocEntry>> {
        let inner = self.inner.lock().unwrap();
        let mut entries: Vec<DocEntry> = inner
            .doc_paths
            .iter()
            .filter(|(_, p)| p.notebook_id == notebook_id && parent_path(&p.path) == path)
            .map(|(id, p)| {
                let icon = inner
                    .attrs
                    .get(id)
                    .and_then(|a| a.get("icon"))
                    .cloned()
                    .unwrap_or_default();
                let sub_file_count = inner
                    .doc_paths
                    .values()
                    .filter(|child| {
                        child.notebook_id == notebook_id && parent_path(&child.path) == p.path
                    })
                    .count();
                DocEntry {
                    id: id.clone(),
                    name: leaf_name(&p.path).to_string(),
                    icon,
                    sub_file_count,
                    path: p.path.clone(),
                }
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn document_outline(&self, doc_id: &str) -> Result<Vec<OutlineEntry>> {
        let inner = self.inner.lock().unwrap();
        if !inner.blocks.contains_key(doc_id) {
            bail!("block not found: {doc_id}");
        }
        let mut headings: Vec<&Block> = inner
            .blocks
            .values()
            .filter(|b| b.block_type == BlockType::Heading && b.root_id.as_deref() == Some(doc_id))
            .collect();
        headings.sort_by(|a, b| a.sort_key.cmp(&b.sort_key).then(a.id.cmp(&b.id)));

        let mut roots = Vec::new();
        for heading in headings {
            let depth = heading
                .markdown
                .trim_start()
                .chars()
                .take_while(|c| *c == '#')
                .count()
                .max(1);
            let (_, ial) = split_attr_suffix(&heading.markdown);
            Self::attach_outline(
                &mut roots,
                OutlineEntry {
                    id: heading.id.clone(),
                    markdown: heading.markdown.clone(),
                    depth,
                    ial,
                    children: Vec::new(),
                },
            );
        }
        Ok(roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        assert_eq!(render_plain("**bold** and `code`"), "bold and code");
        assert_eq!(render_plain("[text](https://x)"), "text");
    }

    #[test]
    fn test_infer_type() {
        assert_eq!(infer_type("## heading"), BlockType::Heading);
        assert_eq!(infer_type("plain"), BlockType::Paragraph);
        assert_eq!(infer_type("#nohash"), BlockType::Paragraph);
        assert_eq!(infer_type("####### seven"), BlockType::Paragraph);
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/a/b"), "/a");
        assert_eq!(parent_path("/a"), "/");
        assert_eq!(parent_path("bare"), "/");
    }

    #[tokio::test]
    async fn test_document_lifecycle() -> Result<()> {
        let store = MemoryBlockStore::new();
        let id = store.create_document("nb1", "/Projects", "").await?;
        assert!(store.exists(&id).await?);

        let attrs = store.get_attributes(&id).await?;
        assert_eq!(attrs.get("title").map(String::as_str), Some("Projects"));

        store.rename_document(&id, "Archive").await?;
        let path = store.resolve_path(&id).await?;
        assert_eq!(path.path, "/Archive");
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_after_shifts_siblings() -> Result<()> {
        let store = MemoryBlockStore::new();
        let doc = store.create_document("nb1", "/Doc", "").await?;
        let first = store.append_child(&doc, "# one").await?;
        let last = store.append_child(&doc, "# three").await?;
        let middle = store.insert_after(&first, "# two").await?;

        let children = store.query(BlockQuery::children_of(&doc)).await?;
        let ids: Vec<&str> = children.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec![first.as_str(), middle.as_str(), last.as_str()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_outline_nesting() -> Result<()> {
        let store = MemoryBlockStore::new();
        let doc = store.create_document("nb1", "/Doc", "").await?;
        store.append_child(&doc, "# top").await?;
        store.append_child(&doc, "## nested").await?;
        store.append_child(&doc, "# second").await?;

        let outline = store.document_outline(&doc).await?;
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].children.len(), 1);
        assert_eq!(outline[0].children[0].depth, 2);
        Ok(())
    }
}
