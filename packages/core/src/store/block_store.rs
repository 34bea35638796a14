//! BlockStore Trait - Host Storage Abstraction Layer
//!
//! This module defines the `BlockStore` trait that abstracts the host
//! application's block storage, attribute storage and document tree. The sync
//! engine and the outline producers issue every read and write through this
//! trait, so the same core runs against the real host's REST surface or the
//! in-memory reference store used by tests.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: every call is a suspend point - the real host is
//!    reached over asynchronous I/O
//! 2. **No Retries**: any call may fail with a generic I/O error; the core
//!    does not retry - a failure aborts the current sync walk
//! 3. **Error Handling**: `anyhow::Result` for flexible error context;
//!    the sync layer wraps failures in its own typed error
//! 4. **Merge Semantics**: `set_attributes` merges into the existing map,
//!    it never replaces it wholesale

use crate::models::{Block, BlockQuery, DocEntry, DocPath, OutlineEntry};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Abstraction over the host application's block storage.
///
/// Implementations must be `Send + Sync` so futures can move between
/// threads. Individual writes are atomic on the host side, but multi-call
/// sequences are not transactional - callers own the (documented) absence of
/// rollback.
#[async_trait]
pub trait BlockStore: Send + Sync {
    //
    // QUERYING
    //

    /// Query blocks by id, parent and type (AND semantics, `None` fields
    /// ignored), ordered by the native sort key.
    async fn query(&self, query: BlockQuery) -> Result<Vec<Block>>;

    /// Probe whether a block id still exists.
    ///
    /// Used to invalidate stale link attributes before they are trusted.
    async fn exists(&self, block_id: &str) -> Result<bool>;

    //
    // ATTRIBUTES
    //

    /// Fetch a block's full attribute map, system keys included.
    async fn get_attributes(&self, block_id: &str) -> Result<HashMap<String, String>>;

    /// Merge the given attributes into the block's attribute map.
    async fn set_attributes(&self, block_id: &str, attrs: HashMap<String, String>) -> Result<()>;

    //
    // CONTENT
    //

    /// Replace a block's markdown source.
    ///
    /// On some hosts this resets non-text attributes as a side effect;
    /// callers re-apply preserved style attributes afterwards.
    async fn update_text(&self, block_id: &str, markdown: &str) -> Result<()>;

    /// Insert a new block immediately after an existing sibling.
    ///
    /// Returns the new block's id.
    async fn insert_after(&self, previous_id: &str, markdown: &str) -> Result<String>;

    /// Append a new block as the last child of a parent block.
    ///
    /// Returns the new block's id.
    async fn append_child(&self, parent_id: &str, markdown: &str) -> Result<String>;

    //
    // DOCUMENT TREE
    //

    /// Create a document at `path` inside a notebook, returning its id.
    async fn create_document(
        &self,
        notebook_id: &str,
        path: &str,
        initial_markdown: &str,
    ) -> Result<String>;

    /// Rename an existing document.
    async fn rename_document(&self, block_id: &str, new_title: &str) -> Result<()>;

    /// Resolve the notebook and storage path owning a block.
    async fn resolve_path(&self, block_id: &str) -> Result<DocPath>;

    /// Resolve the human-readable path of a block's document.
    async fn resolve_human_path(&self, block_id: &str) -> Result<String>;

    /// List the direct sub-documents at a path, in display order.
    async fn list_documents(&self, notebook_id: &str, path: &str) -> Result<Vec<DocEntry>>;

    /// Fetch a document's heading outline as a nested tree.
    async fn document_outline(&self, doc_id: &str) -> Result<Vec<OutlineEntry>>;
}
