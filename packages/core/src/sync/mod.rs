//! Synchronization Layer
//!
//! Orchestrates the bidirectional reconciliation between a list item's text
//! and its linked sub-document title or heading block:
//!
//! - `SyncConfig` - explicit per-invocation configuration
//! - `ListItemSyncEngine` - the four sync directions for a single item
//! - `TreeWalker` - depth-first traversal threading the insertion cursor
//! - `SyncError` - walk-aborting failures (continuity mismatches are not
//!   errors; they are collected into the `SyncReport`)

pub mod config;
mod engine;
mod error;
mod walker;

pub use config::{HeadingPayload, HeadingPullFallback, SyncConfig, DEFAULT_SEPARATOR};
pub use engine::{ListItemCore, ListItemSyncEngine, SyncAction};
pub use error::SyncError;
pub use walker::{SyncReport, TreeWalker, WalkCursor};
