//! Data Models
//!
//! Core data structures shared across the crate:
//!
//! - `Block` and `BlockQuery` - the host storage row and its query shape
//! - `DocPath`, `DocEntry`, `OutlineEntry` - file-tree and outline views
//! - Attribute constants and the preservable-attribute filter

mod attrs;
mod block;

pub use attrs::{filter_preservable, is_reserved, ATTR_LINKED_DOC, ATTR_LINKED_HEADING};
pub use block::{Block, BlockQuery, BlockType, DocEntry, DocPath, OutlineEntry};
