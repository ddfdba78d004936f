//! Pointer-down handling - arming items, starting the drag, picking up.

use super::DragEngine;
use crate::bridge::Modifiers;
use crate::constants::{
    DRAG_OPACITY, DRAG_SHADOW, FLOATING_Z_INDEX, PLACEHOLDER_OPACITY, SELECTION_GUARD_PROPERTY,
};
use crate::error::{DragError, DragResult};
use crate::events::{DragEventKind, EventTarget};
use crate::geometry::{Point, Rect};
use crate::item::{ItemState, OriginPlacement};
use crate::profile_scope;
use crate::scene::{NodeId, VisualTree};
use crate::style::StyleSnapshot;
use crate::transition::{Animator, TransitionKind, TransitionRequest};
use crate::types::{DragEffect, ItemId, PreviewStrategy, SessionId};
use tracing::{debug, warn};

/// Float the visual above everything, sized and placed at `rect`.
pub(crate) fn apply_drag_styles<T: VisualTree + ?Sized>(
    styles: &mut StyleSnapshot,
    tree: &mut T,
    node: NodeId,
    rect: Rect,
) {
    let width = format!("{}px", rect.size.width);
    let height = format!("{}px", rect.size.height);
    let transform = rect.translate_css();
    styles.cache_many(
        tree,
        node,
        &[
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("pointer-events", "none"),
            ("width", &width),
            ("height", &height),
            ("transform", &transform),
            ("z-index", FLOATING_Z_INDEX),
            ("opacity", DRAG_OPACITY),
            ("box-shadow", DRAG_SHADOW),
        ],
    );
}

impl<T: VisualTree, A: Animator> DragEngine<T, A> {
    /// Arm the item under `node` (or its nearest item ancestor).
    pub fn pointer_down(
        &mut self,
        node: NodeId,
        position: Point,
        modifiers: Modifiers,
    ) -> DragResult<ItemId> {
        profile_scope!("pointer_down");

        if self.registry.is_session_active() {
            return Err(DragError::AlreadyDragging);
        }
        let id = self.item_at(node).ok_or(DragError::NodeNotFound(node))?;
        self.disarm();

        let effect = modifiers.effect(self.config.copy_modifier);
        let item = self
            .registry
            .get_item_mut(&id)
            .ok_or_else(|| DragError::ItemNotFound(id.clone()))?;
        if !item.state.is_idle() {
            return Err(DragError::ItemBusy(id));
        }
        item.state = ItemState::Armed {
            origin: position,
            effect,
        };
        self.armed = Some(id.clone());
        self.pointer = position;
        debug!(item = %id, ?effect, "Item armed");
        Ok(id)
    }

    /// Pointer moved: start an armed drag once past the threshold, or track
    /// the active one.
    pub fn pointer_move(&mut self, position: Point) -> DragResult<()> {
        profile_scope!("pointer_move");
        self.pointer = position;

        let Some(id) = self.armed.clone() else {
            self.track_pointer(position);
            return Ok(());
        };
        let Some(ItemState::Armed { origin, effect }) = self.registry.get_item(&id).map(|i| i.state)
        else {
            self.armed = None;
            return Ok(());
        };
        if origin.distance_to(position) < self.config.drag_threshold {
            return Ok(());
        }

        self.armed = None;
        self.start_drag_from(&id, origin, position, effect)
            .map(|_| ())
    }

    /// Start dragging an item right away (native `dragstart`, or host code).
    /// The item is grabbed at `position`.
    pub fn start_drag(
        &mut self,
        id: &ItemId,
        position: Point,
        effect: DragEffect,
    ) -> DragResult<SessionId> {
        self.start_drag_from(id, position, position, effect)
    }

    /// Start a drag grabbed at `grab` with the pointer already at `position`.
    fn start_drag_from(
        &mut self,
        id: &ItemId,
        grab: Point,
        position: Point,
        effect: DragEffect,
    ) -> DragResult<SessionId> {
        profile_scope!("start_drag");

        let result = self.begin_drag(id, grab, position, effect);
        if let Err(e) = &result {
            if let Some(item) = self.registry.get_item_mut(id) {
                if item.state.is_armed() {
                    item.state = ItemState::Idle;
                }
            }
            warn!(item = %id, error = %e, "Drag start rejected");
        }
        result
    }

    fn begin_drag(
        &mut self,
        id: &ItemId,
        grab: Point,
        position: Point,
        effect: DragEffect,
    ) -> DragResult<SessionId> {
        if self.registry.is_session_active() {
            return Err(DragError::AlreadyDragging);
        }
        let item = self
            .registry
            .get_item(id)
            .ok_or_else(|| DragError::ItemNotFound(id.clone()))?;
        if item.state.is_dragging() || item.state.is_settling() {
            return Err(DragError::ItemBusy(id.clone()));
        }
        let node = item.node;
        if self.tree.parent(node).is_none() {
            return Err(DragError::NodeNotFound(node));
        }
        let source = item
            .zone
            .clone()
            .filter(|zone| self.registry.get_zone(zone).is_some());
        let payload = item.payload.clone();

        let session_id = self
            .registry
            .begin_session(id.clone(), source, payload, effect)?
            .id;
        if let Some(session) = self.registry.session_mut() {
            session.pointer = position;
        }
        if self.armed.as_ref() == Some(id) {
            self.armed = None;
        }
        self.pointer = position;

        let root = self.tree.root();
        self.root_styles
            .cache(&mut self.tree, root, SELECTION_GUARD_PROPERTY, Some("none"));

        let home = self.pick_up(id, grab);
        self.emit(DragEventKind::DragStart, EventTarget::Item(id.clone()), None);

        let request = TransitionRequest {
            node,
            kind: TransitionKind::PickUp(id.clone()),
            from: home,
            to: home,
            duration_ms: self.config.pickup_duration_ms,
        };
        if let Err(e) = self.transitions.start(request, self.now) {
            warn!(item = %id, error = %e, "Pick-up transition failed to start");
        }

        self.refresh_layout();
        self.request_frame(id);
        Ok(session_id)
    }

    /// Detach the visual into the floating layer, holding it at the `grab`
    /// point. Returns its bounds before the pick-up.
    fn pick_up(&mut self, id: &ItemId, grab: Point) -> Rect {
        let Some(node) = self.registry.get_item(id).map(|i| i.node) else {
            return Rect::default();
        };

        // A transition still running on the visual settles before we touch it
        if let Some(settled) = self.transitions.skip(node) {
            self.on_transition_settled(settled);
        }

        let home = self.tree.bounds(node).unwrap_or_default();
        let origin = self.tree.parent(node).map(|parent| OriginPlacement {
            parent,
            next_sibling: self.tree.next_sibling(node),
            index: self.tree.index_in_parent(node).unwrap_or(0),
        });
        let floating = self.tree.floating_layer();

        let Some(item) = self.registry.get_item_mut(id) else {
            return home;
        };

        let placeholder = match (item.preview_strategy, origin) {
            (PreviewStrategy::Duplicate, Some(origin)) => match self.tree.duplicate(node) {
                Ok(placeholder) => {
                    match self.tree.insert_before(origin.parent, placeholder, Some(node)) {
                        Ok(()) => {
                            self.tree
                                .set_style(placeholder, "opacity", Some(PLACEHOLDER_OPACITY));
                            Some(placeholder)
                        }
                        Err(e) => {
                            warn!(item = %id, error = %e, "Placeholder insert failed");
                            self.tree.destroy(placeholder);
                            None
                        }
                    }
                }
                Err(e) => {
                    warn!(item = %id, error = %e, "Placeholder duplicate failed; moving instead");
                    None
                }
            },
            _ => None,
        };

        if let Err(e) = self.tree.insert_before(floating, node, None) {
            warn!(item = %id, error = %e, "Failed to float the dragged visual");
        }
        apply_drag_styles(&mut item.styles, &mut self.tree, node, home);

        item.origin = origin;
        item.placeholder = placeholder;
        item.grab_offset = Point::new(grab.x - home.origin.x, grab.y - home.origin.y);
        item.home_rect = home;
        item.preview_rect = home;
        item.state = ItemState::Dragging;
        item.is_dragging = true;
        item.pickup_in_flight = true;

        debug!(item = %id, %node, placeholder = ?placeholder, "Picked up");
        home
    }

    /// The registered item on `node` or its nearest ancestor.
    fn item_at(&self, node: NodeId) -> Option<ItemId> {
        std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .find_map(|n| self.registry.item_for_node(n).cloned())
    }

    /// Return an armed item to idle.
    pub(crate) fn disarm(&mut self) {
        if let Some(id) = self.armed.take() {
            if let Some(item) = self.registry.get_item_mut(&id) {
                if item.state.is_armed() {
                    item.state = ItemState::Idle;
                }
            }
        }
    }
}
