//! Nesting queue for index assembly
//!
//! The index producer collects one text line per document while walking the
//! file tree, keeping children under their parent entry. Flattening walks
//! the queue in order, injecting fold markers and column breaks per the
//! outline configuration.

use crate::outline::generator::{ListStyle, OutlineConfig};
use std::collections::VecDeque;

/// One produced line plus the queue of its children.
#[derive(Debug, Default)]
pub struct IndexQueueNode {
    pub depth: usize,
    pub text: String,
    pub children: IndexQueue,
}

impl IndexQueueNode {
    pub fn new(depth: usize, text: String) -> Self {
        Self {
            depth,
            text,
            children: IndexQueue::new(),
        }
    }
}

/// FIFO queue of index entries at one nesting level.
#[derive(Debug, Default)]
pub struct IndexQueue {
    items: VecDeque<IndexQueueNode>,
}

impl IndexQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: IndexQueueNode) {
        self.items.push_back(node);
    }

    pub fn pop(&mut self) -> Option<IndexQueueNode> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn front_depth(&self) -> Option<usize> {
        self.items.front().map(|n| n.depth)
    }

    /// Drain the queue into the final markdown.
    pub fn flatten(self, config: &OutlineConfig) -> String {
        let mut out = String::new();
        pop_all(self, &mut out, config);
        out
    }
}

fn insert_fold_marker(text: &str, list_style: ListStyle) -> String {
    let marker = list_style.marker();
    match text.find(marker) {
        Some(pos) => {
            let split = pos + marker.len();
            format!("{}{}{}", &text[..split], "{: fold=\"1\"}", &text[split..])
        }
        None => text.to_string(),
    }
}

fn pop_all(mut queue: IndexQueue, out: &mut String, config: &OutlineConfig) {
    let Some(front_depth) = queue.front_depth() else {
        return;
    };

    let columns = config.columns.max(1);
    let use_columns = front_depth == 1 && columns > 1;
    let chunk = if use_columns { queue.len() / columns } else { 0 };
    let mut remaining_breaks = if use_columns { columns - 1 } else { 0 };
    if use_columns {
        out.push_str("{{{col\n");
    }

    let mut count = 0;
    while let Some(mut node) = queue.pop() {
        count += 1;
        if !node.children.is_empty() && config.fold_depth != 0 && config.fold_depth <= node.depth {
            node.text = insert_fold_marker(&node.text, config.list_style);
        }
        out.push_str(&node.text);

        if !node.children.is_empty() {
            pop_all(std::mem::take(&mut node.children), out, config);
        }
        if node.depth == 1 && count == chunk && remaining_breaks > 0 {
            out.push_str("\n{: id}\n");
            count = 0;
            remaining_breaks -= 1;
        }
    }

    if use_columns {
        out.push_str("}}}");
    }
}
