//! Style snapshots for restoring a visual after a drag.
//!
//! Before the engine mutates a node's style for dragging it records the
//! property's original value. Recording the same property twice keeps the
//! first value, so hover restyles never overwrite the pre-drag state.

use crate::scene::{NodeId, VisualTree};

#[derive(Debug, Clone, PartialEq)]
struct CachedProperty {
    node: NodeId,
    property: String,
    original: Option<String>,
}

/// Stack of "cached property -> original value" pairs.
#[derive(Debug, Default)]
pub struct StyleSnapshot {
    entries: Vec<CachedProperty>,
}

impl StyleSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current value of `property` (once) and optionally set a new one.
    pub fn cache<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        node: NodeId,
        property: &str,
        value: Option<&str>,
    ) {
        let known = self
            .entries
            .iter()
            .any(|e| e.node == node && e.property == property);
        if !known {
            self.entries.push(CachedProperty {
                node,
                property: property.to_string(),
                original: tree.style(node, property),
            });
        }
        if let Some(value) = value {
            tree.set_style(node, property, Some(value));
        }
    }

    pub fn cache_many<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        node: NodeId,
        styles: &[(&str, &str)],
    ) {
        for (property, value) in styles {
            self.cache(tree, node, property, Some(value));
        }
    }

    /// Restore a single property, if it was cached.
    pub fn restore<T: VisualTree + ?Sized>(&mut self, tree: &mut T, node: NodeId, property: &str) {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.node == node && e.property == property)
        {
            let entry = self.entries.remove(pos);
            tree.set_style(entry.node, &entry.property, entry.original.as_deref());
        }
    }

    /// Restore every cached property of `node`, newest first.
    pub fn restore_node<T: VisualTree + ?Sized>(&mut self, tree: &mut T, node: NodeId) {
        let mut i = self.entries.len();
        while i > 0 {
            i -= 1;
            if self.entries[i].node == node {
                let entry = self.entries.remove(i);
                tree.set_style(entry.node, &entry.property, entry.original.as_deref());
            }
        }
    }

    /// Restore everything and clear the stack.
    pub fn restore_all<T: VisualTree + ?Sized>(&mut self, tree: &mut T) {
        while let Some(entry) = self.entries.pop() {
            if tree.contains(entry.node) {
                tree.set_style(entry.node, &entry.property, entry.original.as_deref());
            }
        }
    }

    /// Move cached entries from `from` to `to` (used when a node is re-attached).
    pub fn rebind(&mut self, from: NodeId, to: NodeId) {
        for entry in self.entries.iter_mut().filter(|e| e.node == from) {
            entry.node = to;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
