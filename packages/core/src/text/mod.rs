//! Text layer: wrapper grammar, markdown stripping and continuity patching
//!
//! All regex-based markdown handling is isolated here so the sync engine
//! works purely in terms of extracted values; an AST-based implementation
//! could be substituted behind these interfaces without touching the engine.

pub mod continuity;
pub mod extract;
pub mod icon;
mod strip;

pub use continuity::{merge, ContinuityOutcome};
pub use extract::{clean_heading_content, split_attr_suffix, ContentExtractor, ExtractedContent};
pub use strip::strip_markdown_syntax;
