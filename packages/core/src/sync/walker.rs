//! Recursive list-tree traversal
//!
//! Applies the sync engine to a list item and every nested list item,
//! strictly sequential depth-first: later siblings depend on the
//! `previous_id` cursor left behind by earlier siblings, because newly
//! created heading blocks are inserted "after previous". For
//! push-to-document the children are visited in reverse document order so
//! that sequential creation ends up in forward reading order.
//!
//! No depth limit is enforced; recursion bottoms out when a list item has no
//! child lists.

use crate::models::{BlockQuery, BlockType};
use crate::store::BlockStore;
use crate::sync::config::SyncConfig;
use crate::sync::engine::{ListItemSyncEngine, SyncAction};
use crate::sync::error::SyncError;
use std::future::Future;
use std::pin::Pin;

/// Traversal context threaded through the walk.
///
/// Siblings at the same list level share and mutate one cursor so that
/// `previous_id` chains across them.
#[derive(Debug, Clone)]
pub struct WalkCursor {
    /// The block created/updated by the previous sibling, used as the
    /// insertion anchor for new heading blocks
    pub previous_id: Option<String>,
    /// The document created by an enclosing push, used as the path anchor
    /// for nested document creation
    pub parent_doc_id: Option<String>,
    /// Nesting depth, 1-based; caps the heading level at 6
    pub level: usize,
}

impl Default for WalkCursor {
    fn default() -> Self {
        Self {
            previous_id: None,
            parent_doc_id: None,
            level: 1,
        }
    }
}

/// Outcome of a finished subtree walk.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Containers whose text was too complex to patch; the caller reports
    /// "N items need manual review"
    pub needs_review: Vec<String>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.needs_review.is_empty()
    }
}

/// Depth-first sync driver over a list/list-item tree.
pub struct TreeWalker<'a> {
    store: &'a dyn BlockStore,
    engine: ListItemSyncEngine<'a>,
}

type WalkFuture<'f> = Pin<Box<dyn Future<Output = Result<Option<String>, SyncError>> + Send + 'f>>;

impl<'a> TreeWalker<'a> {
    pub fn new(store: &'a dyn BlockStore, config: &'a SyncConfig) -> Self {
        Self {
            store,
            engine: ListItemSyncEngine::new(store, config),
        }
    }

    /// Sync an entire subtree rooted at a list or list-item block.
    pub async fn walk(
        &mut self,
        root_id: &str,
        root_type: BlockType,
        action: SyncAction,
    ) -> Result<SyncReport, SyncError> {
        let mut cursor = WalkCursor::default();
        self.walk_block(root_id.to_string(), root_type, action, &mut cursor)
            .await?;
        let report = SyncReport {
            needs_review: self.engine.take_errors(),
        };
        if !report.is_clean() {
            tracing::warn!(
                count = report.needs_review.len(),
                "sync finished with items needing manual review"
            );
        }
        Ok(report)
    }

    fn walk_block<'f>(
        &'f mut self,
        block_id: String,
        block_type: BlockType,
        action: SyncAction,
        cursor: &'f mut WalkCursor,
    ) -> WalkFuture<'f> {
        Box::pin(async move {
            match block_type {
                BlockType::ListItem => {
                    let result = self.engine.sync_item(&block_id, action, cursor).await?;
                    if let Some(result_id) = &result {
                        cursor.previous_id = Some(result_id.clone());
                    }

                    let mut child_cursor = WalkCursor {
                        previous_id: cursor.previous_id.clone(),
                        parent_doc_id: if action.links_document() {
                            result.clone()
                        } else {
                            cursor.parent_doc_id.clone()
                        },
                        level: cursor.level + 1,
                    };

                    let mut lists = self
                        .store
                        .query(BlockQuery::children_of(&block_id).with_block_type(BlockType::List))
                        .await?;
                    if action.reverses_traversal() {
                        lists.reverse();
                    }
                    for list in lists {
                        self.walk_block(list.id, BlockType::List, action, &mut child_cursor)
                            .await?;
                        cursor.previous_id = child_cursor.previous_id.clone();
                    }
                    Ok(result)
                }
                BlockType::List => {
                    let mut items = self
                        .store
                        .query(
                            BlockQuery::children_of(&block_id)
                                .with_block_type(BlockType::ListItem),
                        )
                        .await?;
                    if action.reverses_traversal() {
                        items.reverse();
                    }
                    // Siblings share the cursor: previous_id must chain
                    for item in items {
                        self.walk_block(item.id, BlockType::ListItem, action, cursor)
                            .await?;
                    }
                    Ok(None)
                }
                _ => Ok(None),
            }
        })
    }
}
