//! Drop zones.
//!
//! A zone owns a visual node, an optional acceptance predicate and the
//! collection of payloads dropped into it. The engine drives the
//! enter/over/leave/drop handlers; [`DragZone::on_drop`] and
//! [`DragZone::lift`] are the only places the collection changes.

use crate::geometry::{Axis, Point, Size};
use crate::scene::{NodeId, VisualTree};
use crate::session::DragSession;
use crate::types::{DragPayload, ZoneId};

pub type AcceptsFn = Box<dyn Fn(&DragSession) -> bool>;

/// Registration options for a zone.
#[derive(Default)]
pub struct ZoneOptions {
    pub id: Option<ZoneId>,
    pub accepts: Option<AcceptsFn>,
    /// Overrides the engine's capture margin
    pub capture_margin: Option<f32>,
    /// Ordered zones insert drops at the pointer's position along this axis
    pub axis: Option<Axis>,
    /// Initial collection
    pub contents: Vec<DragPayload>,
}

impl ZoneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<ZoneId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_accepts(mut self, accepts: impl Fn(&DragSession) -> bool + 'static) -> Self {
        self.accepts = Some(Box::new(accepts));
        self
    }

    pub fn with_capture_margin(mut self, margin: f32) -> Self {
        self.capture_margin = Some(margin);
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn with_contents(mut self, contents: Vec<DragPayload>) -> Self {
        self.contents = contents;
        self
    }
}

pub struct DragZone {
    id: ZoneId,
    pub(crate) node: NodeId,
    accepts: Option<AcceptsFn>,
    is_target: bool,
    capture_margin: f32,
    axis: Option<Axis>,
    /// Enclosing zone, recorded at registration
    parent: Option<ZoneId>,
    /// Slot size measured from the zone's first child, cached for the zone's lifetime
    item_size: Option<Size>,
    /// Size of the drop slot shown while targeted
    drop_slot: Option<Size>,
    contents: Vec<DragPayload>,
}

impl std::fmt::Debug for DragZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragZone")
            .field("id", &self.id)
            .field("node", &self.node)
            .field("is_target", &self.is_target)
            .field("axis", &self.axis)
            .field("contents", &self.contents.len())
            .finish_non_exhaustive()
    }
}

impl DragZone {
    pub(crate) fn new(
        id: ZoneId,
        node: NodeId,
        options: ZoneOptions,
        default_margin: f32,
        parent: Option<ZoneId>,
    ) -> Self {
        Self {
            id,
            node,
            accepts: options.accepts,
            is_target: false,
            capture_margin: options.capture_margin.unwrap_or(default_margin).max(0.0),
            axis: options.axis,
            parent,
            item_size: None,
            drop_slot: None,
            contents: options.contents,
        }
    }

    pub fn id(&self) -> &ZoneId {
        &self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_target(&self) -> bool {
        self.is_target
    }

    pub fn capture_margin(&self) -> f32 {
        self.capture_margin
    }

    pub fn axis(&self) -> Option<Axis> {
        self.axis
    }

    pub fn parent(&self) -> Option<&ZoneId> {
        self.parent.as_ref()
    }

    pub fn contents(&self) -> &[DragPayload] {
        &self.contents
    }

    /// Ids of the payloads in the collection, in order.
    pub fn content_ids(&self) -> Vec<&str> {
        self.contents.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn drop_slot(&self) -> Option<Size> {
        self.drop_slot
    }

    pub fn item_size(&self) -> Option<Size> {
        self.item_size
    }

    /// Acceptance predicate; zones without one accept everything.
    pub fn accepts(&self, session: &DragSession) -> bool {
        self.accepts.as_ref().is_none_or(|f| f(session))
    }

    /// Measure the slot size once from the first child.
    pub(crate) fn measure_item_size<T: VisualTree + ?Sized>(
        &mut self,
        tree: &T,
        exclude: &[NodeId],
    ) -> Option<Size> {
        if self.item_size.is_none() {
            self.item_size = tree
                .children(self.node)
                .into_iter()
                .find(|n| !exclude.contains(n))
                .and_then(|n| tree.bounds(n))
                .map(|r| r.size);
        }
        self.item_size
    }

    /// Children that count for ordering, skipping the given nodes.
    pub(crate) fn ordered_children<T: VisualTree + ?Sized>(
        &self,
        tree: &T,
        exclude: &[NodeId],
    ) -> Vec<NodeId> {
        tree.children(self.node)
            .into_iter()
            .filter(|n| !exclude.contains(n))
            .collect()
    }

    /// Insertion index for a pointer position: the number of children whose
    /// center lies before the pointer along the zone's axis. `None` for
    /// unordered zones.
    pub(crate) fn insertion_index<T: VisualTree + ?Sized>(
        &self,
        tree: &T,
        pointer: Point,
        exclude: &[NodeId],
    ) -> Option<usize> {
        let axis = self.axis?;
        let along = axis.of(pointer);
        let index = self
            .ordered_children(tree, exclude)
            .into_iter()
            .filter_map(|n| tree.bounds(n))
            .filter(|b| axis.of(b.center()) < along)
            .count();
        Some(index)
    }

    pub(crate) fn on_drag_enter(&mut self, slot: Option<Size>) {
        self.is_target = true;
        self.drop_slot = slot;
    }

    /// Per-frame notification. Never re-runs enter logic.
    pub(crate) fn on_drag_over(&self, _session: &DragSession) {}

    pub(crate) fn on_drag_leave(&mut self) {
        self.is_target = false;
        self.drop_slot = None;
    }

    /// Insert the session's payload, once. Axis zones insert at the session index.
    pub(crate) fn on_drop(&mut self, session: &DragSession) -> bool {
        self.is_target = false;
        self.drop_slot = None;

        if self
            .contents
            .iter()
            .any(|p| p.same_identity(&session.payload))
        {
            return false;
        }
        let at = match (self.axis, session.index) {
            (Some(_), Some(index)) => index.min(self.contents.len()),
            _ => self.contents.len(),
        };
        self.contents.insert(at, session.payload.clone());
        true
    }

    /// Remove a payload leaving this zone. Returns whether it was present.
    pub(crate) fn lift(&mut self, payload: &DragPayload) -> bool {
        let before = self.contents.len();
        self.contents.retain(|p| !p.same_identity(payload));
        self.contents.len() != before
    }

    pub(crate) fn reparent(&mut self, parent: Option<ZoneId>) {
        self.parent = parent;
    }
}
