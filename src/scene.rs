//! Host visual tree abstraction.
//!
//! The engine never talks to a rendering technology directly. Everything it
//! needs from the host's tree (reparenting, sibling order, bounds, inline
//! style properties) goes through [`VisualTree`]. [`Scene`] is an in-memory
//! tree implementing it, used by tests and by hosts that mirror their own
//! tree into the engine.

use crate::error::{DragError, DragResult};
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Handle to a node in the host's visual tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Operations the engine performs on the host's visual tree.
pub trait VisualTree {
    /// The surface root; receives the selection guard while dragging.
    fn root(&self) -> NodeId;

    /// Top-level layer floating previews are reparented into.
    fn floating_layer(&self) -> NodeId;

    /// Whether the node exists (attached or not).
    fn contains(&self, node: NodeId) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Current layout bounds, `None` for unknown nodes.
    fn bounds(&self, node: NodeId) -> Option<Rect>;

    /// Remove the node from its parent, keeping it alive.
    fn detach(&mut self, node: NodeId);

    /// Insert `node` into `parent` before `before`, or at the end.
    fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        before: Option<NodeId>,
    ) -> DragResult<()>;

    /// Shallow copy of `node` (style and bounds), not attached anywhere.
    fn duplicate(&mut self, node: NodeId) -> DragResult<NodeId>;

    /// Detach and drop the node.
    fn destroy(&mut self, node: NodeId);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Set (`Some`) or remove (`None`) an inline style property.
    fn set_style(&mut self, node: NodeId, property: &str, value: Option<&str>);

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&n| n == node)?;
        siblings.get(pos + 1).copied()
    }

    fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&n| n == node)
    }

    /// Parent chain, nearest first.
    fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.parent(node);
        while let Some(n) = current {
            chain.push(n);
            current = self.parent(n);
        }
        chain
    }
}

#[derive(Debug, Clone)]
struct SceneNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    bounds: Rect,
    styles: BTreeMap<String, String>,
}

impl SceneNode {
    fn new(parent: Option<NodeId>, bounds: Rect) -> Self {
        Self {
            parent,
            children: Vec::new(),
            bounds,
            styles: BTreeMap::new(),
        }
    }
}

/// In-memory visual tree with a root and a floating layer.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: HashMap<NodeId, SceneNode>,
    root: NodeId,
    floating: NodeId,
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let root = NodeId(0);
        let floating = NodeId(1);
        let mut nodes = HashMap::new();
        let mut root_node = SceneNode::new(None, Rect::default());
        root_node.children.push(floating);
        nodes.insert(root, root_node);
        nodes.insert(floating, SceneNode::new(Some(root), Rect::default()));
        Self {
            nodes,
            root,
            floating,
            next_id: 2,
        }
    }

    fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a node appended to `parent`.
    pub fn create_node(&mut self, parent: NodeId, bounds: Rect) -> NodeId {
        let id = self.alloc();
        self.nodes.insert(id, SceneNode::new(Some(parent), bounds));
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    pub fn set_bounds(&mut self, node: NodeId, bounds: Rect) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.bounds = bounds;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl VisualTree for Scene {
    fn root(&self) -> NodeId {
        self.root
    }

    fn floating_layer(&self) -> NodeId {
        self.floating
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.nodes.get(&node).map(|n| n.bounds)
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = None;
        }
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        before: Option<NodeId>,
    ) -> DragResult<()> {
        if !self.nodes.contains_key(&parent) {
            return Err(DragError::NodeNotFound(parent));
        }
        if !self.nodes.contains_key(&node) {
            return Err(DragError::NodeNotFound(node));
        }
        self.detach(node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            let pos = before
                .and_then(|b| p.children.iter().position(|&c| c == b))
                .unwrap_or(p.children.len());
            p.children.insert(pos, node);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = Some(parent);
        }
        Ok(())
    }

    fn duplicate(&mut self, node: NodeId) -> DragResult<NodeId> {
        let source = self
            .nodes
            .get(&node)
            .ok_or(DragError::NodeNotFound(node))?;
        let mut copy = SceneNode::new(None, source.bounds);
        copy.styles = source.styles.clone();
        let id = self.alloc();
        self.nodes.insert(id, copy);
        Ok(id)
    }

    fn destroy(&mut self, node: NodeId) {
        self.detach(node);
        if let Some(removed) = self.nodes.remove(&node) {
            for child in removed.children {
                self.destroy(child);
            }
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes
            .get(&node)
            .and_then(|n| n.styles.get(property).cloned())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: Option<&str>) {
        if let Some(n) = self.nodes.get_mut(&node) {
            match value {
                Some(v) => {
                    n.styles.insert(property.to_string(), v.to_string());
                }
                None => {
                    n.styles.remove(property);
                }
            }
        }
    }
}
