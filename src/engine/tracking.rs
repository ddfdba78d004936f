//! Per-frame tracking - preview repositioning, target resolution and hover.
//!
//! ## Performance Notes
//!
//! Tracking runs once per frame for the whole drag. Key properties:
//! - At most one pending frame per item (`raf` guard)
//! - Frames keep running while a zone is targeted, so `dragover` repeats
//! - Target resolution through the R-tree zone index
//! - Optional debounce via `debounceFrameMs`
//!
//! Enable profiling with `cargo build --features profiling` to see timing.

use super::DragEngine;
use crate::constants::TARGET_FRAME_MS;
use crate::events::{DragEventKind, EventTarget};
use crate::geometry::{Point, Rect, Size};
use crate::profile_scope;
use crate::registry::TargetChange;
use crate::scene::{NodeId, VisualTree};
use crate::transition::{Animator, TransitionKind, TransitionRequest};
use crate::types::{ItemId, ZoneId};
use tracing::{trace, warn};

impl<T: VisualTree, A: Animator> DragEngine<T, A> {
    /// Pointer moved during a drag: emit `drag` and request a frame.
    pub(crate) fn track_pointer(&mut self, position: Point) {
        self.pointer = position;
        let Some(session) = self.registry.session() else {
            return;
        };
        if session.is_settling() {
            return;
        }
        let id = session.item.clone();
        self.emit(DragEventKind::Drag, EventTarget::Item(id.clone()), None);
        self.request_frame(&id);
    }

    /// Run pending tracking frames, honoring the debounce interval.
    pub(crate) fn run_frames(&mut self) {
        let pending: Vec<ItemId> = self
            .registry
            .items()
            .filter(|item| item.raf.is_some())
            .map(|item| item.id().clone())
            .collect();
        if pending.is_empty() {
            return;
        }

        if let (Some(spacing), Some(last)) = (self.config.debounce_frame_ms, self.last_frame_at) {
            if self.now - last < spacing {
                trace!(since_last = self.now - last, "Tracking frame debounced");
                return;
            }
        }
        self.last_frame_at = Some(self.now);

        for id in pending {
            self.frame_stats.begin_frame();
            self.track_frame(&id);
            self.frame_stats.end_frame();
        }
    }

    fn track_frame(&mut self, id: &ItemId) {
        profile_scope!("track_frame", TARGET_FRAME_MS);

        let pointer = self.pointer;
        let Some(item) = self.registry.get_item_mut(id) else {
            return;
        };
        item.raf = None;
        if !item.state.is_dragging() {
            return;
        }
        let in_flight = item.pickup_in_flight;

        self.reposition(id, pointer);
        // Target checks wait until the pick-up has settled
        if in_flight || self.native {
            return;
        }
        self.update_target(pointer);

        // dragover keeps firing while targeted, even with a still pointer
        if self.registry.session().is_some_and(|s| s.target.is_some()) {
            self.request_frame(id);
        }
    }

    /// Move the floating preview under the pointer.
    pub(crate) fn reposition(&mut self, id: &ItemId, pointer: Point) {
        let Some(item) = self.registry.get_item_mut(id) else {
            return;
        };
        let rect = item.preview_at(pointer);
        item.preview_rect = rect;
        let node = item.node;
        self.tree
            .set_style(node, "transform", Some(&rect.translate_css()));
        if let Some(session) = self.registry.session_mut() {
            session.pointer = pointer;
        }
    }

    /// Resolve the target under the pointer, apply it and emit `dragover`.
    pub(crate) fn update_target(&mut self, pointer: Point) {
        let target = self.resolve_target(pointer);
        self.apply_target(target);
        self.drag_over(pointer);
    }

    /// The best accepting zone at `pointer` for the active session.
    pub fn resolve_target(&self, pointer: Point) -> Option<ZoneId> {
        profile_scope!("resolve_target");

        let session = self.registry.session()?;
        let dragged = self.registry.get_item(&session.item).map(|i| i.node);
        self.index.resolve(pointer, |zone_id| {
            self.registry.get_zone(zone_id).is_some_and(|zone| {
                !self.is_inside_dragged(zone.node(), dragged) && zone.accepts(session)
            })
        })
    }

    /// Whether `zone` accepts the active session.
    pub(crate) fn zone_accepts(&self, zone: &ZoneId) -> bool {
        match (self.registry.session(), self.registry.get_zone(zone)) {
            (Some(session), Some(z)) => z.accepts(session),
            _ => false,
        }
    }

    /// Zones nested in the dragged visual travel with it and never match.
    fn is_inside_dragged(&self, zone_node: NodeId, dragged: Option<NodeId>) -> bool {
        let Some(dragged) = dragged else {
            return false;
        };
        zone_node == dragged || self.tree.ancestors(zone_node).contains(&dragged)
    }

    /// Set the session target and dispatch the resulting leave/enter steps.
    pub(crate) fn apply_target(&mut self, target: Option<ZoneId>) {
        let changes = match self.registry.set_target(target) {
            Ok(changes) => changes,
            Err(e) => {
                trace!(error = %e, "Target change ignored");
                return;
            }
        };
        for change in changes {
            match change {
                TargetChange::Leave(zone) => self.leave_zone(&zone),
                TargetChange::Enter(zone) => self.enter_zone(&zone),
            }
        }
    }

    /// Emit `dragover` on the current target, updating the insertion index.
    pub(crate) fn drag_over(&mut self, pointer: Point) {
        let Some(session) = self.registry.session() else {
            return;
        };
        let Some(target) = session.target.clone() else {
            return;
        };
        let exclude = self.dragged_nodes();
        let index = self
            .registry
            .get_zone(&target)
            .and_then(|zone| zone.insertion_index(&self.tree, pointer, &exclude));
        if let Some(session) = self.registry.session_mut() {
            session.index = index;
        }
        if let (Some(zone), Some(session)) =
            (self.registry.get_zone(&target), self.registry.session())
        {
            zone.on_drag_over(session);
        }
        self.emit(DragEventKind::DragOver, EventTarget::Zone(target), None);
    }

    fn enter_zone(&mut self, zone_id: &ZoneId) {
        let Some(item_id) = self.registry.session().map(|s| s.item.clone()) else {
            return;
        };
        let exclude = self.dragged_nodes();
        let Some(zone) = self.registry.get_zone_mut(zone_id) else {
            return;
        };
        let slot = zone.measure_item_size(&self.tree, &exclude);
        zone.on_drag_enter(slot);

        if let Some(item) = self.registry.get_item_mut(&item_id) {
            item.is_over_zone = true;
        }
        self.emit(DragEventKind::DragEnter, EventTarget::Zone(zone_id.clone()), None);
        if let Some(size) = slot {
            self.resize_preview(&item_id, size);
        }
    }

    fn leave_zone(&mut self, zone_id: &ZoneId) {
        let Some(item_id) = self.registry.session().map(|s| s.item.clone()) else {
            return;
        };
        if let Some(zone) = self.registry.get_zone_mut(zone_id) {
            zone.on_drag_leave();
        }
        let home_size = match self.registry.get_item_mut(&item_id) {
            Some(item) => {
                item.is_over_zone = false;
                item.home_rect.size
            }
            None => return,
        };
        self.emit(DragEventKind::DragLeave, EventTarget::Zone(zone_id.clone()), None);
        self.resize_preview(&item_id, home_size);
    }

    /// Hover transition: resize the floating preview.
    fn resize_preview(&mut self, id: &ItemId, size: Size) {
        let Some(node) = self
            .registry
            .get_item(id)
            .filter(|item| item.state.is_dragging() && item.preview_rect.size != size)
            .map(|item| item.node)
        else {
            return;
        };

        // The previous hover settles before the next one mutates the preview
        if let Some(settled) = self.transitions.skip(node) {
            self.on_transition_settled(settled);
        }

        let Some(item) = self.registry.get_item_mut(id) else {
            return;
        };
        let from = item.preview_rect;
        let to = Rect {
            origin: from.origin,
            size,
        };
        item.preview_rect = to;
        let width = format!("{}px", size.width);
        let height = format!("{}px", size.height);
        item.styles
            .cache_many(&mut self.tree, node, &[("width", &width), ("height", &height)]);

        let request = TransitionRequest {
            node,
            kind: TransitionKind::Hover(id.clone()),
            from,
            to,
            duration_ms: self.config.hover_duration_ms,
        };
        if let Err(e) = self.transitions.start(request, self.now) {
            warn!(item = %id, error = %e, "Hover transition failed to start");
        }
    }

    /// The dragged visual and its placeholder, which never count as zone children.
    pub(crate) fn dragged_nodes(&self) -> Vec<NodeId> {
        self.registry
            .session()
            .and_then(|s| self.registry.get_item(&s.item))
            .map(|item| std::iter::once(item.node).chain(item.placeholder).collect())
            .unwrap_or_default()
    }
}
