//! The active drag session record.

use crate::geometry::Point;
use crate::types::{DragEffect, DragOutcome, DragPayload, ItemId, SessionId, ZoneId};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Pointer is down, the preview follows it
    Dragging,
    /// Released; the settle transition is running
    Settling(DragOutcome),
}

/// The single mutable record describing the active drag.
///
/// Hosts receive clones of it in every event. The payload is copied from the
/// item at pick-up so zones never need to reach into item state.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub id: SessionId,
    pub item: ItemId,
    pub source: ZoneId,
    pub target: Option<ZoneId>,
    pub payload: DragPayload,
    pub effect: DragEffect,
    pub status: SessionStatus,
    /// Last tracked pointer position
    pub pointer: Point,
    /// Insertion index inside the target, for axis zones
    pub index: Option<usize>,
}

impl DragSession {
    pub fn new(
        id: SessionId,
        item: ItemId,
        source: ZoneId,
        payload: DragPayload,
        effect: DragEffect,
    ) -> Self {
        Self {
            id,
            item,
            source,
            target: None,
            payload,
            effect,
            status: SessionStatus::Dragging,
            pointer: Point::default(),
            index: None,
        }
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.status, SessionStatus::Settling(_))
    }

    pub fn outcome(&self) -> Option<DragOutcome> {
        match self.status {
            SessionStatus::Settling(outcome) => Some(outcome),
            SessionStatus::Dragging => None,
        }
    }
}
