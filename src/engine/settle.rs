//! Release handling - commit or abort, settle transition, session teardown.
//!
//! Commit order on the tree and the zones:
//!
//! ```text
//! remove placeholder
//! source zone lifts the payload        (move effect only)
//! visual inserted into the target      (copy effect: back to its origin)
//! target zone receives the payload     -> drop(target)
//!                                      -> dragend(item), dragend(source)
//! settle transition ... completes      -> styles restored, session ended
//! ```

use super::DragEngine;
use crate::error::{DragError, DragResult};
use crate::events::{DragEventKind, EventTarget};
use crate::geometry::Point;
use crate::item::ItemState;
use crate::profile_scope;
use crate::scene::VisualTree;
use crate::transition::{Animator, TransitionKind, TransitionRequest};
use crate::types::{DragEffect, DragOutcome, ItemId, ZoneId};
use tracing::{debug, info, warn};

impl<T: VisualTree, A: Animator> DragEngine<T, A> {
    /// Pointer released. Commits onto the current target or aborts.
    ///
    /// Returns `None` when no drag was in progress (including an armed item
    /// that never moved).
    pub fn pointer_up(&mut self, position: Point) -> DragResult<Option<DragOutcome>> {
        profile_scope!("pointer_up");
        self.pointer = position;

        if self.armed.is_some() {
            self.disarm();
            return Ok(None);
        }
        match self.registry.session() {
            Some(session) if !session.is_settling() => {
                self.release(Some(position), false).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Abort the active drag. The visual snaps back to its origin.
    pub fn abort(&mut self) -> DragResult<DragOutcome> {
        match self.registry.session() {
            None => Err(DragError::NoActiveSession),
            Some(session) if session.is_settling() => Err(DragError::ItemBusy(session.item.clone())),
            Some(_) => self.release(None, true),
        }
    }

    /// Settle the active session. `position` runs a final tracking step at
    /// the release point first.
    pub(crate) fn release(
        &mut self,
        position: Option<Point>,
        force_abort: bool,
    ) -> DragResult<DragOutcome> {
        let session = self.registry.session().ok_or(DragError::NoActiveSession)?;
        let item_id = session.item.clone();
        let node = self
            .registry
            .get_item(&item_id)
            .map(|item| item.node)
            .ok_or_else(|| DragError::ItemNotFound(item_id.clone()))?;

        // The pick-up (or a hover) settles before the release mutates the visual
        if let Some(settled) = self.transitions.skip(node) {
            self.on_transition_settled(settled);
        }

        if let Some(position) = position {
            self.pointer = position;
            self.reposition(&item_id, position);
            if !self.native {
                self.update_target(position);
            }
        }

        let target = self.registry.session().and_then(|s| s.target.clone());
        let outcome = match target {
            Some(_) if !force_abort => DragOutcome::Commit,
            _ => DragOutcome::Abort,
        };
        self.registry.mark_settling(outcome)?;

        let from = match self.registry.get_item_mut(&item_id) {
            Some(item) => {
                item.raf = None;
                item.state = ItemState::Settling(outcome);
                item.preview_rect
            }
            None => return Err(DragError::ItemNotFound(item_id)),
        };

        match (outcome, target) {
            (DragOutcome::Commit, Some(target)) => self.commit(&item_id, &target),
            _ => self.abort_to_origin(&item_id),
        }

        let to = self.tree.bounds(node).unwrap_or(from);
        let request = TransitionRequest {
            node,
            kind: TransitionKind::Settle(item_id.clone(), outcome),
            from,
            to,
            duration_ms: self.config.settle_duration_ms,
        };
        if let Err(e) = self.transitions.start(request, self.now) {
            warn!(item = %item_id, error = %e, "Settle transition failed; settling without animation");
        }

        info!(item = %item_id, ?outcome, "Drag released");
        Ok(outcome)
    }

    fn commit(&mut self, item_id: &ItemId, target: &ZoneId) {
        let Some(session) = self.registry.session().cloned() else {
            return;
        };
        let Some(item) = self.registry.get_item_mut(item_id) else {
            return;
        };
        let node = item.node;
        if let Some(placeholder) = item.placeholder.take() {
            self.tree.destroy(placeholder);
        }

        if session.effect == DragEffect::Move {
            match self.registry.get_zone_mut(&session.source) {
                Some(source) => {
                    if !source.lift(&session.payload) {
                        debug!(zone = %session.source, payload = %session.payload.id, "Payload not in source collection");
                    }
                }
                None => warn!(zone = %session.source, "Source zone gone; nothing to lift"),
            }
        }

        match session.effect {
            DragEffect::Move => {
                let placed = self.registry.get_zone(target).map(|zone| {
                    let before = session
                        .index
                        .and_then(|i| zone.ordered_children(&self.tree, &[node]).get(i).copied());
                    (zone.node(), before)
                });
                let result = match placed {
                    Some((parent, before)) => self.tree.insert_before(parent, node, before),
                    None => Err(DragError::ZoneNotFound(target.clone())),
                };
                if let Err(e) = result {
                    warn!(item = %item_id, error = %e, "Insert into target failed; restoring origin");
                    self.restore_origin(item_id);
                }
            }
            DragEffect::Copy => self.restore_origin(item_id),
        }

        if let Some(zone) = self.registry.get_zone_mut(target) {
            zone.on_drop(&session);
        }
        self.emit(DragEventKind::Drop, EventTarget::Zone(target.clone()), None);

        if session.effect == DragEffect::Move {
            if let Some(item) = self.registry.get_item_mut(item_id) {
                item.zone = Some(target.clone());
            }
        }
        self.emit_dragend(item_id, &session.source, DragOutcome::Commit);
    }

    fn abort_to_origin(&mut self, item_id: &ItemId) {
        let source = self.registry.session().map(|s| s.source.clone());
        self.apply_target(None);

        let Some(item) = self.registry.get_item_mut(item_id) else {
            return;
        };
        let node = item.node;
        match item.placeholder.take() {
            Some(placeholder) => {
                match self.tree.parent(placeholder) {
                    Some(parent) => {
                        if let Err(e) = self.tree.insert_before(parent, node, Some(placeholder)) {
                            warn!(item = %item_id, error = %e, "Reinsert at placeholder failed");
                        }
                    }
                    None => self.restore_origin(item_id),
                }
                self.tree.destroy(placeholder);
            }
            None => self.restore_origin(item_id),
        }

        if let Some(source) = source {
            self.emit_dragend(item_id, &source, DragOutcome::Abort);
        }
    }

    /// Reinsert the visual before its original next sibling, or at the end
    /// of the original parent if that sibling is gone.
    fn restore_origin(&mut self, item_id: &ItemId) {
        let Some(item) = self.registry.get_item(item_id) else {
            return;
        };
        let node = item.node;
        let Some(origin) = item.origin else {
            return;
        };

        let before = origin
            .next_sibling
            .filter(|&sibling| self.tree.parent(sibling) == Some(origin.parent));
        let parent = if self.tree.contains(origin.parent) {
            origin.parent
        } else {
            warn!(item = %item_id, parent = %origin.parent, "Original parent gone; reinserting at root");
            self.tree.root()
        };
        if let Err(e) = self.tree.insert_before(parent, node, before) {
            warn!(item = %item_id, error = %e, "Failed to restore origin");
        }
    }

    fn emit_dragend(&mut self, item_id: &ItemId, source: &ZoneId, outcome: DragOutcome) {
        self.emit(
            DragEventKind::DragEnd,
            EventTarget::Item(item_id.clone()),
            Some(outcome),
        );
        if self.registry.get_zone(source).is_some() {
            self.emit(
                DragEventKind::DragEnd,
                EventTarget::Zone(source.clone()),
                Some(outcome),
            );
        }
    }

    /// Settle continuation: restore the visual and end the session.
    pub(crate) fn finish_settle(&mut self, item_id: &ItemId, outcome: DragOutcome) {
        let mut retry_unregister = false;
        if let Some(item) = self.registry.get_item_mut(item_id) {
            item.styles.restore_all(&mut self.tree);
            retry_unregister = item.unregister_requested;
            item.reset_session_state();
        }
        self.root_styles.restore_all(&mut self.tree);
        self.native = false;
        self.last_frame_at = None;

        match self.registry.end_session(outcome) {
            Ok(session) => debug!(session = %session.id, "Session cleared after settle"),
            Err(e) => warn!(item = %item_id, error = %e, "Settle completed without a session"),
        }
        if retry_unregister {
            info!(item = %item_id, "Drag ended; refused unregister can be retried now");
        }
    }
}
