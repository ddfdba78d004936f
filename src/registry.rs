//! Session Registry
//!
//! Holds the registered items and zones of one drag surface and the single
//! active [`DragSession`]. The registry is pure bookkeeping: it decides
//! *what* happens (which session is active, which zone is left and which is
//! entered) and the engine performs the side effects in the returned order.

use crate::error::{DragError, DragResult};
use crate::item::DragItem;
use crate::scene::NodeId;
use crate::session::{DragSession, SessionStatus};
use crate::types::{DragEffect, DragOutcome, DragPayload, ItemId, SessionId, ZoneId};
use crate::zone::DragZone;
use std::collections::HashMap;
use tracing::{debug, info};

/// One step of a target change, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetChange {
    Leave(ZoneId),
    Enter(ZoneId),
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    items: HashMap<ItemId, DragItem>,
    zones: HashMap<ZoneId, DragZone>,
    /// Zone ids in registration order
    zone_order: Vec<ZoneId>,
    session: Option<DragSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Install a new session as the sole active one.
    pub fn begin_session(
        &mut self,
        item: ItemId,
        source: Option<ZoneId>,
        payload: DragPayload,
        effect: DragEffect,
    ) -> DragResult<&DragSession> {
        if self.session.is_some() {
            return Err(DragError::AlreadyDragging);
        }
        let Some(source) = source else {
            return Err(DragError::NoSourceZone(item));
        };

        let session = DragSession::new(SessionId::new(), item, source, payload, effect);
        info!(
            session = %session.id,
            item = %session.item,
            source = %session.source,
            "Drag session started"
        );
        Ok(self.session.insert(session))
    }

    /// Change the current target.
    ///
    /// Returns the leave/enter steps to dispatch, leave first. Setting the
    /// zone that is already current yields no steps.
    pub fn set_target(&mut self, zone: Option<ZoneId>) -> DragResult<Vec<TargetChange>> {
        let session = self.session.as_mut().ok_or(DragError::NoActiveSession)?;
        if session.target == zone {
            return Ok(Vec::new());
        }

        let mut changes = Vec::with_capacity(2);
        if let Some(old) = session.target.take() {
            changes.push(TargetChange::Leave(old));
        }
        session.index = None;
        if let Some(new) = zone {
            changes.push(TargetChange::Enter(new.clone()));
            session.target = Some(new);
        }
        debug!(session = %session.id, ?changes, "Target changed");
        Ok(changes)
    }

    pub(crate) fn mark_settling(&mut self, outcome: DragOutcome) -> DragResult<()> {
        let session = self.session.as_mut().ok_or(DragError::NoActiveSession)?;
        session.status = SessionStatus::Settling(outcome);
        Ok(())
    }

    /// Clear the active session. Succeeds once per session.
    pub fn end_session(&mut self, outcome: DragOutcome) -> DragResult<DragSession> {
        let session = self.session.take().ok_or(DragError::NoActiveSession)?;
        info!(session = %session.id, item = %session.item, ?outcome, "Drag session ended");
        Ok(session)
    }

    pub fn is_session_active(&self) -> bool {
        self.session.is_some()
    }

    /// Dragging flag observable by the host.
    pub fn is_dragging(&self) -> bool {
        self.is_session_active()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut DragSession> {
        self.session.as_mut()
    }

    /// True if `item` is the subject of the active session.
    pub fn is_subject(&self, item: &ItemId) -> bool {
        self.session.as_ref().is_some_and(|s| &s.item == item)
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub fn get_item(&self, id: &ItemId) -> Option<&DragItem> {
        self.items.get(id)
    }

    pub(crate) fn get_item_mut(&mut self, id: &ItemId) -> Option<&mut DragItem> {
        self.items.get_mut(id)
    }

    pub(crate) fn insert_item(&mut self, item: DragItem) {
        self.items.insert(item.id().clone(), item);
    }

    pub(crate) fn remove_item(&mut self, id: &ItemId) -> Option<DragItem> {
        self.items.remove(id)
    }

    pub fn items(&self) -> impl Iterator<Item = &DragItem> {
        self.items.values()
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut DragItem> {
        self.items.values_mut()
    }

    /// The item whose visual is `node`.
    pub fn item_for_node(&self, node: NodeId) -> Option<&ItemId> {
        self.items
            .values()
            .find(|item| item.node == node)
            .map(|item| item.id())
    }

    // ========================================================================
    // Zones
    // ========================================================================

    pub fn get_zone(&self, id: &ZoneId) -> Option<&DragZone> {
        self.zones.get(id)
    }

    pub(crate) fn get_zone_mut(&mut self, id: &ZoneId) -> Option<&mut DragZone> {
        self.zones.get_mut(id)
    }

    pub(crate) fn insert_zone(&mut self, zone: DragZone) -> DragResult<()> {
        if self.zones.contains_key(zone.id()) {
            return Err(DragError::DuplicateZone(zone.id().clone()));
        }
        self.zone_order.push(zone.id().clone());
        self.zones.insert(zone.id().clone(), zone);
        Ok(())
    }

    pub(crate) fn remove_zone(&mut self, id: &ZoneId) -> Option<DragZone> {
        self.zone_order.retain(|z| z != id);
        self.zones.remove(id)
    }

    /// Zones in registration order.
    pub fn zones(&self) -> impl Iterator<Item = &DragZone> {
        self.zone_order.iter().filter_map(|id| self.zones.get(id))
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub(crate) fn zones_mut(&mut self) -> impl Iterator<Item = &mut DragZone> {
        self.zones.values_mut()
    }

    /// The zone whose visual is `node`.
    pub fn zone_for_node(&self, node: NodeId) -> Option<&ZoneId> {
        self.zones
            .values()
            .find(|zone| zone.node == node)
            .map(|zone| zone.id())
    }
}
