//! Draggable items and their per-item state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Armed        (pointer down, no session active)
//! Armed -> Dragging    (first qualifying move, or native dragstart)
//! Armed -> Idle        (pointer up before moving)
//! Dragging -> Settling (pointer up, native drop/dragend, or abort)
//! Settling -> Idle     (settle transition completed)
//! ```

use crate::geometry::{Point, Rect};
use crate::scene::NodeId;
use crate::style::StyleSnapshot;
use crate::types::{DragEffect, DragOutcome, DragPayload, ItemId, PreviewStrategy, ZoneId};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ItemState {
    #[default]
    Idle,
    /// Pointer is down on the item but it has not moved far enough yet
    Armed {
        /// Pointer position at pointer-down
        origin: Point,
        /// Effect decided from the modifiers at pointer-down
        effect: DragEffect,
    },
    Dragging,
    Settling(DragOutcome),
}

impl ItemState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging)
    }

    pub fn is_settling(&self) -> bool {
        matches!(self, Self::Settling(_))
    }
}

/// Registration options for an item.
#[derive(Debug, Clone, Default)]
pub struct ItemOptions {
    pub id: Option<ItemId>,
    /// Falls back to the engine's configured strategy
    pub preview_strategy: Option<PreviewStrategy>,
    /// Enclosing zone; found from the node's ancestors when absent
    pub zone: Option<ZoneId>,
}

impl ItemOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_preview_strategy(mut self, strategy: PreviewStrategy) -> Self {
        self.preview_strategy = Some(strategy);
        self
    }

    pub fn with_zone(mut self, zone: impl Into<ZoneId>) -> Self {
        self.zone = Some(zone.into());
        self
    }
}

/// Where the visual sat before it was picked up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginPlacement {
    pub parent: NodeId,
    pub next_sibling: Option<NodeId>,
    pub index: usize,
}

/// Pending per-frame tracking request. At most one per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest(pub u64);

#[derive(Debug)]
pub struct DragItem {
    id: ItemId,
    pub(crate) node: NodeId,
    pub(crate) payload: DragPayload,
    pub(crate) preview_strategy: PreviewStrategy,
    /// Enclosing zone back-reference, updated when a move is committed
    pub(crate) zone: Option<ZoneId>,
    pub(crate) state: ItemState,
    pub(crate) is_dragging: bool,
    pub(crate) is_over_zone: bool,
    pub(crate) raf: Option<FrameRequest>,
    pub(crate) origin: Option<OriginPlacement>,
    pub(crate) placeholder: Option<NodeId>,
    pub(crate) styles: StyleSnapshot,
    /// Pointer offset inside the visual at pick-up
    pub(crate) grab_offset: Point,
    /// Bounds of the visual before pick-up
    pub(crate) home_rect: Rect,
    /// Current geometry of the floating preview
    pub(crate) preview_rect: Rect,
    pub(crate) pickup_in_flight: bool,
    pub(crate) unregister_requested: bool,
}

impl DragItem {
    pub(crate) fn new(
        id: ItemId,
        node: NodeId,
        payload: DragPayload,
        preview_strategy: PreviewStrategy,
        zone: Option<ZoneId>,
    ) -> Self {
        Self {
            id,
            node,
            payload,
            preview_strategy,
            zone,
            state: ItemState::Idle,
            is_dragging: false,
            is_over_zone: false,
            raf: None,
            origin: None,
            placeholder: None,
            styles: StyleSnapshot::new(),
            grab_offset: Point::default(),
            home_rect: Rect::default(),
            preview_rect: Rect::default(),
            pickup_in_flight: false,
            unregister_requested: false,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn payload(&self) -> &DragPayload {
        &self.payload
    }

    pub fn preview_strategy(&self) -> PreviewStrategy {
        self.preview_strategy
    }

    pub fn zone(&self) -> Option<&ZoneId> {
        self.zone.as_ref()
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_over_zone(&self) -> bool {
        self.is_over_zone
    }

    pub fn placeholder(&self) -> Option<NodeId> {
        self.placeholder
    }

    pub fn origin(&self) -> Option<OriginPlacement> {
        self.origin
    }

    pub fn preview_rect(&self) -> Rect {
        self.preview_rect
    }

    pub fn has_pending_frame(&self) -> bool {
        self.raf.is_some()
    }

    /// An unregister was refused during the current session. Cleared when
    /// the session ends.
    pub fn unregister_pending(&self) -> bool {
        self.unregister_requested
    }

    /// Preview geometry with its origin placed under `pointer`.
    pub(crate) fn preview_at(&self, pointer: Point) -> Rect {
        Rect {
            origin: Point::new(pointer.x - self.grab_offset.x, pointer.y - self.grab_offset.y),
            size: self.preview_rect.size,
        }
    }

    /// Back to `Idle` with every per-session field cleared.
    pub(crate) fn reset_session_state(&mut self) {
        self.state = ItemState::Idle;
        self.is_dragging = false;
        self.is_over_zone = false;
        self.raf = None;
        self.origin = None;
        self.placeholder = None;
        self.pickup_in_flight = false;
        self.unregister_requested = false;
        self.styles.clear();
    }
}
