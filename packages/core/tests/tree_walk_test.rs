//! Integration tests for the tree walker
//!
//! Tests cover:
//! - Reverse sibling order for push-to-document
//! - previous-id chaining producing forward heading order
//! - Parent-document threading for nested creation
//! - Deep nesting (no depth cap) and heading level capping
//! - Manual-review aggregation across a subtree

use anyhow::Result;
use async_trait::async_trait;
use blocklink_core::models::{
    Block, BlockQuery, BlockType, DocEntry, DocPath, OutlineEntry, ATTR_LINKED_DOC,
};
use blocklink_core::store::{BlockStore, MemoryBlockStore};
use blocklink_core::sync::{SyncAction, SyncConfig, TreeWalker};
use std::collections::HashMap;
use std::sync::Mutex;

/// Store wrapper that records the order of document creations.
struct RecordingStore {
    inner: MemoryBlockStore,
    created_paths: Mutex<Vec<String>>,
}

impl RecordingStore {
    fn new(inner: MemoryBlockStore) -> Self {
        Self {
            inner,
            created_paths: Mutex::new(Vec::new()),
        }
    }

    fn created_paths(&self) -> Vec<String> {
        self.created_paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlockStore for RecordingStore {
    async fn query(&self, query: BlockQuery) -> Result<Vec<Block>> {
        self.inner.query(query).await
    }

    async fn exists(&self, block_id: &str) -> Result<bool> {
        self.inner.exists(block_id).await
    }

    async fn get_attributes(&self, block_id: &str) -> Result<HashMap<String, String>> {
        self.inner.get_attributes(block_id).await
    }

    async fn set_attributes(&self, block_id: &str, attrs: HashMap<String, String>) -> Result<()> {
        self.inner.set_attributes(block_id, attrs).await
    }

    async fn update_text(&self, block_id: &str, markdown: &str) -> Result<()> {
        self.inner.update_text(block_id, markdown).await
    }

    async fn insert_after(&self, previous_id: &str, markdown: &str) -> Result<String> {
        self.inner.insert_after(previous_id, markdown).await
    }

    async fn append_child(&self, parent_id: &str, markdown: &str) -> Result<String> {
        self.inner.append_child(parent_id, markdown).await
    }

    async fn create_document(
        &self,
        notebook_id: &str,
        path: &str,
        initial_markdown: &str,
    ) -> Result<String> {
        self.created_paths.lock().unwrap().push(path.to_string());
        self.inner
            .create_document(notebook_id, path, initial_markdown)
            .await
    }

    async fn rename_document(&self, block_id: &str, new_title: &str) -> Result<()> {
        self.inner.rename_document(block_id, new_title).await
    }

    async fn resolve_path(&self, block_id: &str) -> Result<DocPath> {
        self.inner.resolve_path(block_id).await
    }

    async fn resolve_human_path(&self, block_id: &str) -> Result<String> {
        self.inner.resolve_human_path(block_id).await
    }

    async fn list_documents(&self, notebook_id: &str, path: &str) -> Result<Vec<DocEntry>> {
        self.inner.list_documents(notebook_id, path).await
    }

    async fn document_outline(&self, doc_id: &str) -> Result<Vec<OutlineEntry>> {
        self.inner.document_outline(doc_id).await
    }
}

/// Seed `/Home` with a root item carrying three child lists of two items
/// each:
///
/// ```text
/// Root
///   A1 A2 | B1 B2 | C1 C2
/// ```
fn seed_fanout(store: &MemoryBlockStore, doc_id: &str) -> String {
    let add = |id: &str, block_type: BlockType, parent: &str, md: &str, sort: i64| {
        store.insert_block(Block::new(
            id,
            block_type,
            Some(parent.to_string()),
            Some(doc_id.to_string()),
            md,
            sort,
        ));
    };

    add("list-root", BlockType::List, doc_id, "", 0);
    add("item-root", BlockType::ListItem, "list-root", "Root", 0);
    add("item-root-p", BlockType::Paragraph, "item-root", "Root", 0);

    for (list_idx, list_name) in ["A", "B", "C"].iter().enumerate() {
        let list_id = format!("list-{list_name}");
        add(&list_id, BlockType::List, "item-root", "", list_idx as i64);
        for item_idx in 1..=2 {
            let title = format!("{list_name}{item_idx}");
            let item_id = format!("item-{title}");
            add(&item_id, BlockType::ListItem, &list_id, &title, item_idx as i64);
            add(
                &format!("{item_id}-p"),
                BlockType::Paragraph,
                &item_id,
                &title,
                0,
            );
        }
    }
    "item-root".to_string()
}

#[tokio::test]
async fn test_push_to_document_visits_in_reverse_order() -> Result<()> {
    let inner = MemoryBlockStore::new();
    let doc_id = inner.create_document("nb1", "/Home", "").await?;
    let root_item = seed_fanout(&inner, &doc_id);
    let store = RecordingStore::new(inner);

    let config = SyncConfig::default();
    let mut walker = TreeWalker::new(&store, &config);
    let report = walker
        .walk(&root_item, BlockType::ListItem, SyncAction::PushToDocument)
        .await?;
    assert!(report.is_clean());

    // The root document first, then nested items in reverse document order,
    // each anchored under the just-created parent document
    assert_eq!(
        store.created_paths(),
        vec![
            "/Home/Root",
            "/Home/Root/C2",
            "/Home/Root/C1",
            "/Home/Root/B2",
            "/Home/Root/B1",
            "/Home/Root/A2",
            "/Home/Root/A1",
        ],
    );
    Ok(())
}

#[tokio::test]
async fn test_push_to_heading_chains_in_document_order() -> Result<()> {
    let store = MemoryBlockStore::new();
    let doc_id = store.create_document("nb1", "/Home", "").await?;
    let root_item = seed_fanout(&store, &doc_id);

    let config = SyncConfig::default();
    let mut walker = TreeWalker::new(&store, &config);
    walker
        .walk(&root_item, BlockType::ListItem, SyncAction::PushToHeading)
        .await?;

    // previous-id chaining makes heading insertion order match the original
    // document order
    let headings = store
        .query(BlockQuery::children_of(&doc_id).with_block_type(BlockType::Heading))
        .await?;
    let texts: Vec<&str> = headings.iter().map(|h| h.markdown.as_str()).collect();
    assert_eq!(
        texts,
        vec!["# Root", "## A1", "## A2", "## B1", "## B2", "## C1", "## C2"],
    );
    Ok(())
}

#[tokio::test]
async fn test_deep_nesting_caps_heading_level() -> Result<()> {
    let store = MemoryBlockStore::new();
    let doc_id = store.create_document("nb1", "/Home", "").await?;

    // A 40-level chain: list -> item -> list -> item -> ...
    let add = |id: &str, block_type: BlockType, parent: &str, md: &str| {
        store.insert_block(Block::new(
            id,
            block_type,
            Some(parent.to_string()),
            Some(doc_id.clone()),
            md,
            0,
        ));
    };
    add("list-1", BlockType::List, &doc_id, "");
    for level in 1..=40 {
        let item_id = format!("item-{level}");
        add(&item_id, BlockType::ListItem, &format!("list-{level}"), "");
        add(
            &format!("{item_id}-p"),
            BlockType::Paragraph,
            &item_id,
            &format!("L{level}"),
        );
        if level < 40 {
            add(&format!("list-{}", level + 1), BlockType::List, &item_id, "");
        }
    }

    let config = SyncConfig::default();
    let mut walker = TreeWalker::new(&store, &config);
    walker
        .walk("item-1", BlockType::ListItem, SyncAction::PushToHeading)
        .await?;

    let headings = store
        .query(BlockQuery::children_of(&doc_id).with_block_type(BlockType::Heading))
        .await?;
    assert_eq!(headings.len(), 40);
    assert_eq!(headings[0].markdown, "# L1");
    assert_eq!(headings[5].markdown, "###### L6");
    // Heading level never exceeds six
    assert_eq!(headings[6].markdown, "###### L7");
    assert_eq!(headings[39].markdown, "###### L40");
    Ok(())
}

#[tokio::test]
async fn test_walk_aggregates_manual_review_items() -> Result<()> {
    let store = MemoryBlockStore::new();
    let doc_id = store.create_document("nb1", "/Home", "").await?;

    let add = |id: &str, block_type: BlockType, parent: &str, md: &str, sort: i64| {
        store.insert_block(Block::new(
            id,
            block_type,
            Some(parent.to_string()),
            Some(doc_id.clone()),
            md,
            sort,
        ));
    };
    add("list-1", BlockType::List, &doc_id, "", 0);
    for (idx, region) in ["f**o**o", "b**a**r"].iter().enumerate() {
        let item_id = format!("item-{idx}");
        add(&item_id, BlockType::ListItem, "list-1", region, idx as i64);
        let linked = store
            .create_document("nb1", &format!("/Home/linked-{idx}"), "")
            .await?;
        store.rename_document(&linked, &format!("renamed-{idx}")).await?;
        store
            .set_attributes(
                &item_id,
                HashMap::from([(ATTR_LINKED_DOC.to_string(), linked.clone())]),
            )
            .await?;
        add(
            &format!("{item_id}-p"),
            BlockType::Paragraph,
            &item_id,
            &format!("[📄](host://blocks/{linked}) ➖ {region}"),
            0,
        );
    }

    let config = SyncConfig::default();
    let mut walker = TreeWalker::new(&store, &config);
    let report = walker
        .walk("list-1", BlockType::List, SyncAction::PullFromDocument)
        .await?;

    assert_eq!(report.needs_review, vec!["item-0", "item-1"]);
    Ok(())
}
