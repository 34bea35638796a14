//! Block data structures
//!
//! The host application owns blocks; this core only reads and writes the
//! fields it needs for synchronization. `Block` mirrors the host's storage
//! row, `BlockQuery` is the structured stand-in for the host's query
//! language, and `DocPath`/`DocEntry`/`OutlineEntry` carry the file-tree and
//! outline shapes used by document creation and the index producers.

use serde::{Deserialize, Serialize};

/// Host block type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    ListItem,
    List,
    Paragraph,
    Heading,
    Document,
    Other,
}

impl BlockType {
    /// The host's single-letter storage tag for this type.
    pub fn host_tag(&self) -> &'static str {
        match self {
            BlockType::ListItem => "i",
            BlockType::List => "l",
            BlockType::Paragraph => "p",
            BlockType::Heading => "h",
            BlockType::Document => "d",
            BlockType::Other => "x",
        }
    }

    /// Parse a host storage tag; anything unrecognized maps to `Other`.
    pub fn from_host_tag(tag: &str) -> Self {
        match tag {
            "i" => BlockType::ListItem,
            "l" => BlockType::List,
            "p" => BlockType::Paragraph,
            "h" => BlockType::Heading,
            "d" => BlockType::Document,
            _ => BlockType::Other,
        }
    }
}

/// A host storage block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Opaque block id
    pub id: String,

    /// Block type tag
    pub block_type: BlockType,

    /// Parent block id (None for documents)
    pub parent_id: Option<String>,

    /// Owning document id (None when this block IS the document)
    pub root_id: Option<String>,

    /// Raw markdown source, possibly carrying an inline attribute suffix
    pub markdown: String,

    /// Host-rendered plain text
    pub content: String,

    /// Native sibling sort key
    pub sort_key: i64,
}

impl Block {
    /// Create a block with empty rendered content; stores that render
    /// content themselves (see `MemoryBlockStore`) fill it on insert.
    pub fn new(
        id: impl Into<String>,
        block_type: BlockType,
        parent_id: Option<String>,
        root_id: Option<String>,
        markdown: impl Into<String>,
        sort_key: i64,
    ) -> Self {
        Self {
            id: id.into(),
            block_type,
            parent_id,
            root_id,
            markdown: markdown.into(),
            content: String::new(),
            sort_key,
        }
    }
}

/// Structured block query: filter fields combine with AND, `None` fields are
/// ignored, results come back in native sort order.
///
/// # Examples
///
/// ```
/// use blocklink_core::models::{BlockQuery, BlockType};
///
/// // All child paragraphs of a list item
/// let query = BlockQuery::children_of("item-1").with_block_type(BlockType::Paragraph);
/// assert_eq!(query.parent_id.as_deref(), Some("item-1"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockQuery {
    /// Query by specific block id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Query by parent block id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Query by block type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_type: Option<BlockType>,
}

impl BlockQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query by id
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Query direct children of a block
    pub fn children_of(parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Default::default()
        }
    }

    /// Restrict to one block type
    pub fn with_block_type(mut self, block_type: BlockType) -> Self {
        self.block_type = Some(block_type);
        self
    }
}

/// Storage location of a document: notebook plus in-notebook path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocPath {
    pub notebook_id: String,
    pub path: String,
}

/// One document in a file-tree listing, consumed by the index producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocEntry {
    pub id: String,
    /// Display name (file extension already removed by the host)
    pub name: String,
    /// Stored icon token, empty when unset
    pub icon: String,
    /// Number of direct sub-documents
    pub sub_file_count: usize,
    /// Path for listing this document's own children
    pub path: String,
}

/// One heading in a document outline, consumed by the outline producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineEntry {
    pub id: String,
    /// Raw heading markdown (leading marks and suffix still present)
    pub markdown: String,
    /// Heading level, 1-based
    pub depth: usize,
    /// Inline attribute list of the heading block, verbatim, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ial: Option<String>,
    pub children: Vec<OutlineEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_tag_round_trip() {
        for t in [
            BlockType::ListItem,
            BlockType::List,
            BlockType::Paragraph,
            BlockType::Heading,
            BlockType::Document,
        ] {
            assert_eq!(BlockType::from_host_tag(t.host_tag()), t);
        }
        assert_eq!(BlockType::from_host_tag("q"), BlockType::Other);
    }

    #[test]
    fn test_query_builder() {
        let query = BlockQuery::children_of("parent-1").with_block_type(BlockType::List);
        assert_eq!(query.parent_id.as_deref(), Some("parent-1"));
        assert_eq!(query.block_type, Some(BlockType::List));
        assert!(query.id.is_none());
    }
}
