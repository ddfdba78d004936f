//! Error types for drag operations
//!
//! Structural violations (a second session, unknown ids) surface as typed
//! failures so host code can treat them as no-ops. Transition failures are
//! logged and swallowed by the engine; the variant exists so the
//! orchestrator can report them.

use crate::scene::NodeId;
use crate::types::{ItemId, ZoneId};
use thiserror::Error;

/// Errors that can occur while coordinating a drag
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DragError {
    /// A session is already active; the new one is rejected, never queued
    #[error("A drag session is already active")]
    AlreadyDragging,

    /// The item is not inside any registered zone
    #[error("Item {0} has no enclosing drop zone")]
    NoSourceZone(ItemId),

    /// The current target zone was destroyed mid-drag
    #[error("Zone {0} vanished during the drag")]
    ZoneVanished(ZoneId),

    /// Unregister was requested for the active session's subject
    #[error("Item {0} is the subject of the active drag; unregister deferred")]
    DanglingItemUnregister(ItemId),

    /// The host animation primitive rejected or failed a transition
    #[error("Transition on node {node} failed: {reason}")]
    TransitionFailure { node: NodeId, reason: String },

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Zone not found: {0}")]
    ZoneNotFound(ZoneId),

    #[error("Zone {0} is already registered")]
    DuplicateZone(ZoneId),

    /// The item is mid pick-up or settle and cannot accept this input
    #[error("Item {0} is busy")]
    ItemBusy(ItemId),

    #[error("No drag session is active")]
    NoActiveSession,

    /// The visual node is not part of the host tree
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
}

/// Result type alias for drag operations
pub type DragResult<T> = Result<T, DragError>;
