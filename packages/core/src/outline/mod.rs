//! Index & Outline Producers
//!
//! Markdown generators for a notebook's document tree and a document's
//! heading tree. These are plain producers over [`BlockStore`] data - the
//! continuity machinery in [`crate::sync`] is not involved.
//!
//! [`BlockStore`]: crate::store::BlockStore

pub mod generator;
mod queue;

pub use generator::{generate_index, generate_outline, LinkStyle, ListStyle, OutlineConfig};
pub use queue::{IndexQueue, IndexQueueNode};
