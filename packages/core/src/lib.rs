//! BlockLink Core Business Logic Layer
//!
//! This crate keeps a list item's text bidirectionally synchronized with
//! either a linked sub-document's title or a linked heading block elsewhere
//! in the same document, and generates index/outline blocks for a document
//! tree. It runs inside a host application's plugin runtime and issues all
//! data access through the host.
//!
//! # Architecture
//!
//! - **Continuity patching**: a block's rendered plain text normally occurs
//!   verbatim inside its own markdown; while it does, text can be swapped by
//!   a first-occurrence substring replacement without touching surrounding
//!   decoration. Blocks where that property is broken are reported for
//!   manual review instead of being guessed at.
//! - **Host as collaborator**: block storage, attributes and the document
//!   tree live behind the [`store::BlockStore`] trait; the core holds no
//!   state between calls.
//! - **Explicit context**: configuration and traversal cursors are passed
//!   into each walk - there is no global settings object.
//!
//! # Modules
//!
//! - [`models`] - Block, queries, attribute partitioning
//! - [`store`] - the `BlockStore` trait and the in-memory reference store
//! - [`text`] - wrapper grammar, markdown stripping, continuity matching
//! - [`sync`] - the four sync directions and the tree walker
//! - [`outline`] - index/outline markdown producers
//! - [`events`] - the host UI event surface

pub mod events;
pub mod models;
pub mod outline;
pub mod store;
pub mod sync;
pub mod text;

// Re-export commonly used types
pub use models::{Block, BlockQuery, BlockType, ATTR_LINKED_DOC, ATTR_LINKED_HEADING};
pub use store::{BlockStore, MemoryBlockStore};
pub use sync::{SyncAction, SyncConfig, SyncReport, TreeWalker};
