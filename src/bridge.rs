//! Event Bridge
//!
//! Translates platform input into engine calls. Two sources are supported:
//!
//! - [`PointerEvent`]: raw pointer input. The engine does its own tracking
//!   and resolves targets through the spatial zone index.
//! - [`NativeDragEvent`]: the platform's drag protocol. The platform decides
//!   which zone is under the pointer; the engine follows its
//!   enter/over/leave/drop/end calls.
//!
//! Either way hosts observe the same `dragstart .. dragend` sequence.

use crate::config::CopyModifier;
use crate::engine::DragEngine;
use crate::error::DragResult;
use crate::geometry::Point;
use crate::scene::{NodeId, VisualTree};
use crate::transition::Animator;
use crate::types::{DragEffect, ItemId, ZoneId};
use tracing::{debug, trace};

/// Modifier keys held during pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::default()
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    /// The drag effect these modifiers select.
    pub fn effect(&self, copy_modifier: CopyModifier) -> DragEffect {
        let copy = match copy_modifier {
            CopyModifier::Alt => self.alt,
            CopyModifier::Ctrl => self.ctrl,
            CopyModifier::None => false,
        };
        if copy {
            DragEffect::Copy
        } else {
            DragEffect::Move
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down {
        node: NodeId,
        position: Point,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
    /// Pointer capture lost (window blur, touch cancel)
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NativeDragEvent {
    DragStart {
        item: ItemId,
        position: Point,
        modifiers: Modifiers,
    },
    Drag {
        position: Point,
    },
    DragEnter {
        zone: ZoneId,
    },
    DragOver {
        zone: ZoneId,
        position: Point,
    },
    DragLeave {
        zone: ZoneId,
    },
    Drop {
        zone: ZoneId,
        position: Point,
    },
    DragEnd,
}

impl<T: VisualTree, A: Animator> DragEngine<T, A> {
    pub fn handle_pointer(&mut self, event: PointerEvent) -> DragResult<()> {
        trace!(?event, "Pointer event");
        match event {
            PointerEvent::Down {
                node,
                position,
                modifiers,
            } => self.pointer_down(node, position, modifiers).map(|_| ()),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position).map(|_| ()),
            PointerEvent::Cancel => {
                self.disarm();
                match self.session() {
                    Some(session) if !session.is_settling() => self.abort().map(|_| ()),
                    _ => Ok(()),
                }
            }
        }
    }

    pub fn handle_native(&mut self, event: NativeDragEvent) -> DragResult<()> {
        trace!(?event, "Native drag event");
        match event {
            NativeDragEvent::DragStart {
                item,
                position,
                modifiers,
            } => {
                let effect = modifiers.effect(self.config.copy_modifier);
                self.disarm();
                self.start_drag(&item, position, effect)?;
                self.native = true;
                debug!(item = %item, "Native drag started");
                Ok(())
            }
            NativeDragEvent::Drag { position } => {
                self.track_pointer(position);
                Ok(())
            }
            NativeDragEvent::DragEnter { zone } => {
                if self.is_dragging_now() && self.zone_accepts(&zone) {
                    self.apply_target(Some(zone));
                }
                Ok(())
            }
            NativeDragEvent::DragOver { zone, position } => {
                if !self.is_dragging_now() {
                    return Ok(());
                }
                self.pointer = position;
                let current = self.session().and_then(|s| s.target.clone());
                if current.as_ref() != Some(&zone) && self.zone_accepts(&zone) {
                    self.apply_target(Some(zone));
                }
                self.drag_over(position);
                Ok(())
            }
            NativeDragEvent::DragLeave { zone } => {
                let current = self.session().and_then(|s| s.target.clone());
                if self.is_dragging_now() && current.as_ref() == Some(&zone) {
                    self.apply_target(None);
                }
                Ok(())
            }
            NativeDragEvent::Drop { zone, position } => {
                if !self.is_dragging_now() {
                    return Ok(());
                }
                if self.zone_accepts(&zone) {
                    self.apply_target(Some(zone));
                }
                self.release(Some(position), false).map(|_| ())
            }
            NativeDragEvent::DragEnd => {
                if self.is_dragging_now() {
                    self.release(None, true)?;
                }
                Ok(())
            }
        }
    }

    fn is_dragging_now(&self) -> bool {
        self.session().is_some_and(|s| !s.is_settling())
    }
}
