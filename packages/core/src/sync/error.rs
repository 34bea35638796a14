//! Sync Layer Error Types

use thiserror::Error;

/// Errors that abort a sync walk.
///
/// Continuity mismatches are NOT errors - they accumulate in the walk's
/// [`SyncReport`](crate::sync::SyncReport) and never interrupt traversal.
/// Anything here stops the remaining subtree and surfaces as one
/// user-facing failure; mutations already written stay written (re-running
/// the same action is the documented recovery, every create path
/// re-validates links first).
#[derive(Error, Debug)]
pub enum SyncError {
    /// A block the walk depends on has no owning document
    #[error("block has no owning document: {id}")]
    MissingDocumentRoot { id: String },

    /// A host storage call failed
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
