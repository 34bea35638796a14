//! Host UI event surface
//!
//! The host raises a context-menu event when the user opens a block's menu;
//! the shell wires the returned actions into menu items and calls back into
//! [`TreeWalker::walk`](crate::sync::TreeWalker::walk). Current document and
//! block ids arrive as explicit event fields - the core never inspects the
//! host UI.

use crate::models::BlockType;
use crate::sync::SyncAction;
use serde::{Deserialize, Serialize};

/// A "context menu requested on block" event from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuRequest {
    pub block_id: String,
    pub block_type: BlockType,
}

/// The sync actions offered for a block's context menu, in display order.
/// Only lists and list items are sync targets.
pub fn menu_actions_for(block_type: BlockType) -> &'static [SyncAction] {
    match block_type {
        BlockType::List | BlockType::ListItem => &[
            SyncAction::PushToDocument,
            SyncAction::PushToHeading,
            SyncAction::PullFromDocument,
            SyncAction::PullFromHeading,
        ],
        _ => &[],
    }
}
