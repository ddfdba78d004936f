//! The drag engine: one instance per drag surface.
//!
//! [`DragEngine`] owns the host's visual tree, the session registry, the
//! spatial zone index, the transition orchestrator and the listener bus.
//! Nothing is global, so several surfaces (windows) each get their own
//! engine without cross-talk.
//!
//! ## Driving the engine
//!
//! The host forwards input through the pointer methods (or the event bridge)
//! and calls [`DragEngine::tick`] once per frame. `tick` reports settled
//! transitions, runs their continuations, then runs pending tracking frames.
//!
//! ## Modules
//!
//! - `pointer_down` - arming, drag start and the pick-up mutation
//! - `tracking` - per-frame repositioning, target resolution, hover
//! - `settle` - release, commit/abort and session teardown

mod pointer_down;
mod settle;
mod tracking;

use crate::config::EngineConfig;
use crate::error::{DragError, DragResult};
use crate::events::{DragEvent, DragEventKind, EventBus, EventTarget, ListenerId, ListenerScope};
use crate::geometry::Point;
use crate::item::{DragItem, FrameRequest, ItemOptions};
use crate::perf::FrameStats;
use crate::registry::SessionRegistry;
use crate::scene::{NodeId, VisualTree};
use crate::session::DragSession;
use crate::spatial_index::ZoneIndex;
use crate::style::StyleSnapshot;
use crate::transition::{Animator, SettleReason, SettledTransition, TransitionKind, TransitionOrchestrator};
use crate::types::{DragOutcome, DragPayload, ItemId, ZoneId};
use crate::zone::{DragZone, ZoneOptions};
use tracing::{debug, info, trace, warn};

pub struct DragEngine<T: VisualTree, A: Animator> {
    pub(crate) config: EngineConfig,
    pub(crate) tree: T,
    pub(crate) registry: SessionRegistry,
    pub(crate) index: ZoneIndex,
    pub(crate) transitions: TransitionOrchestrator<A>,
    pub(crate) events: EventBus,
    pub(crate) frame_stats: FrameStats,
    /// Selection guard on the root while a session is active
    pub(crate) root_styles: StyleSnapshot,
    /// Item under a pointer-down that has not started dragging yet
    pub(crate) armed: Option<ItemId>,
    pub(crate) pointer: Point,
    pub(crate) now: f64,
    pub(crate) last_frame_at: Option<f64>,
    pub(crate) next_frame: u64,
    /// The platform drives targeting (native drag protocol)
    pub(crate) native: bool,
}

impl<T: VisualTree, A: Animator> DragEngine<T, A> {
    pub fn new(tree: T, animator: A, config: EngineConfig) -> Self {
        let mut transitions = TransitionOrchestrator::new(animator);
        transitions.set_enabled(config.animate);
        Self {
            config,
            tree,
            registry: SessionRegistry::new(),
            index: ZoneIndex::new(),
            transitions,
            events: EventBus::new(),
            frame_stats: FrameStats::new(),
            root_styles: StyleSnapshot::new(),
            armed: None,
            pointer: Point::default(),
            now: 0.0,
            last_frame_at: None,
            next_frame: 0,
            native: false,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Mutable tree access for host layout updates. Call
    /// [`DragEngine::refresh_layout`] afterwards if zones moved.
    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn transitions(&self) -> &TransitionOrchestrator<A> {
        &self.transitions
    }

    pub fn animator_mut(&mut self) -> &mut A {
        self.transitions.animator_mut()
    }

    pub fn frame_stats(&self) -> &FrameStats {
        &self.frame_stats
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.registry.session()
    }

    pub fn is_session_active(&self) -> bool {
        self.registry.is_session_active()
    }

    pub fn get_item(&self, id: &ItemId) -> Option<&DragItem> {
        self.registry.get_item(id)
    }

    pub fn get_zone(&self, id: &ZoneId) -> Option<&DragZone> {
        self.registry.get_zone(id)
    }

    pub fn zone_index(&self) -> &ZoneIndex {
        &self.index
    }

    /// Last clock value passed to [`DragEngine::tick`].
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// True while a tracking frame is pending.
    pub fn needs_frame(&self) -> bool {
        self.registry.items().any(|item| item.raf.is_some())
    }

    /// True while anything (a frame or a transition) is waiting on `tick`.
    pub fn is_busy(&self) -> bool {
        self.needs_frame() || self.transitions.has_pending()
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    pub fn on(
        &mut self,
        scope: ListenerScope,
        kind: Option<DragEventKind>,
        callback: impl FnMut(&DragEvent) + 'static,
    ) -> ListenerId {
        self.events.on(scope, kind, callback)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a drop zone on `node`.
    ///
    /// Items and zones already registered inside the node are adopted, so
    /// registration order between a zone and its contents does not matter.
    pub fn register_zone(&mut self, node: NodeId, options: ZoneOptions) -> DragResult<ZoneId> {
        if !self.tree.contains(node) {
            return Err(DragError::NodeNotFound(node));
        }
        let id = options.id.clone().unwrap_or_default();
        let parent = self.enclosing_zone(node);
        let bounds = self.tree.bounds(node).unwrap_or_default();
        let zone = DragZone::new(id.clone(), node, options, self.config.capture_margin, parent.clone());
        let margin = zone.capture_margin();
        self.registry.insert_zone(zone)?;
        self.index.insert(id.clone(), bounds, margin);

        let tree = &self.tree;
        let inside = |n: NodeId| tree.ancestors(n).contains(&node);
        for item in self.registry.items_mut() {
            if item.zone == parent && inside(item.node) {
                item.zone = Some(id.clone());
            }
        }
        for zone in self.registry.zones_mut() {
            if zone.id() != &id && zone.parent() == parent.as_ref() && inside(zone.node()) {
                zone.reparent(Some(id.clone()));
            }
        }
        self.refresh_zone_depths();

        info!(zone = %id, %node, parent = ?parent, "Zone registered");
        Ok(id)
    }

    /// Register a draggable item on `node`.
    ///
    /// Registering the id of the active session's subject re-attaches the
    /// item to the new node instead.
    pub fn register_item(
        &mut self,
        node: NodeId,
        payload: DragPayload,
        options: ItemOptions,
    ) -> DragResult<ItemId> {
        if !self.tree.contains(node) {
            return Err(DragError::NodeNotFound(node));
        }
        if let Some(id) = options.id.as_ref().filter(|id| self.registry.is_subject(id)) {
            return self.reattach(&id.clone(), node);
        }

        let zone = match options.zone {
            Some(zone) if self.registry.get_zone(&zone).is_none() => {
                return Err(DragError::ZoneNotFound(zone));
            }
            Some(zone) => Some(zone),
            None => self.enclosing_zone(node),
        };
        let strategy = options
            .preview_strategy
            .unwrap_or(self.config.preview_strategy);
        let id = options.id.unwrap_or_default();

        if self.registry.get_item(&id).is_some() {
            debug!(item = %id, "Replacing registered item");
            if self.armed.as_ref() == Some(&id) {
                self.armed = None;
            }
        }
        self.registry
            .insert_item(DragItem::new(id.clone(), node, payload, strategy, zone.clone()));
        debug!(item = %id, %node, zone = ?zone, ?strategy, "Item registered");
        Ok(id)
    }

    /// Forget an item.
    ///
    /// Refused with [`DragError::DanglingItemUnregister`] while the item is
    /// the active session's subject; retry after the session ends.
    pub fn unregister_item(&mut self, id: &ItemId) -> DragResult<()> {
        if self.registry.is_subject(id) {
            if let Some(item) = self.registry.get_item_mut(id) {
                item.unregister_requested = true;
            }
            let err = DragError::DanglingItemUnregister(id.clone());
            warn!(item = %id, "{}", err);
            return Err(err);
        }
        self.registry
            .remove_item(id)
            .ok_or_else(|| DragError::ItemNotFound(id.clone()))?;
        if self.armed.as_ref() == Some(id) {
            self.armed = None;
        }
        self.events.remove_scope(&ListenerScope::Item(id.clone()));
        debug!(item = %id, "Item unregistered");
        Ok(())
    }

    /// Forget a zone. If it is the current target, a synthetic `dragleave`
    /// fires first and the session continues without a target.
    pub fn unregister_zone(&mut self, id: &ZoneId) -> DragResult<()> {
        if self.registry.get_zone(id).is_none() {
            return Err(DragError::ZoneNotFound(id.clone()));
        }

        let session = self.registry.session();
        let is_target = session.is_some_and(|s| s.target.as_ref() == Some(id));
        let is_source = session.is_some_and(|s| &s.source == id);
        if is_target {
            warn!(zone = %id, "{}", DragError::ZoneVanished(id.clone()));
            self.apply_target(None);
        }
        if is_source {
            warn!(zone = %id, "Source zone unregistered during drag");
        }

        let Some(removed) = self.registry.remove_zone(id) else {
            return Err(DragError::ZoneNotFound(id.clone()));
        };
        self.index.remove(id);
        let parent = removed.parent().cloned();
        for item in self.registry.items_mut() {
            if item.zone.as_ref() == Some(id) {
                item.zone = parent.clone();
            }
        }
        for zone in self.registry.zones_mut() {
            if zone.parent() == Some(id) {
                zone.reparent(parent.clone());
            }
        }
        self.refresh_zone_depths();
        self.events.remove_scope(&ListenerScope::Zone(id.clone()));
        info!(zone = %id, "Zone unregistered");
        Ok(())
    }

    /// Re-read every zone's bounds into the spatial index.
    pub fn refresh_layout(&mut self) {
        for zone in self.registry.zones() {
            if let Some(bounds) = self.tree.bounds(zone.node()) {
                self.index.update_bounds(zone.id(), bounds);
            }
        }
    }

    /// Push each zone's nesting depth into the index, so the innermost
    /// zone under the pointer wins.
    fn refresh_zone_depths(&mut self) {
        let depths: Vec<(ZoneId, usize)> = self
            .registry
            .zones()
            .map(|zone| {
                let mut depth = 0;
                let mut parent = zone.parent();
                while let Some(id) = parent {
                    depth += 1;
                    if depth > self.registry.zone_count() {
                        warn!(zone = %zone.id(), "Zone parent chain loops");
                        break;
                    }
                    parent = self.registry.get_zone(id).and_then(|z| z.parent());
                }
                (zone.id().clone(), depth)
            })
            .collect();
        for (id, depth) in depths {
            self.index.set_depth(&id, depth);
        }
    }

    /// Bind the active subject to a replacement node.
    fn reattach(&mut self, id: &ItemId, node: NodeId) -> DragResult<ItemId> {
        let item = self
            .registry
            .get_item(id)
            .ok_or_else(|| DragError::ItemNotFound(id.clone()))?;
        let old = item.node;
        if old == node {
            return Ok(id.clone());
        }

        if let Some(settled) = self.transitions.skip(old) {
            self.on_transition_settled(settled);
        }

        let floating = self.tree.floating_layer();
        let was_floating = self.tree.parent(old) == Some(floating);
        if was_floating {
            self.tree.insert_before(floating, node, None)?;
            self.tree.detach(old);
        }

        let Some(item) = self.registry.get_item_mut(id) else {
            return Err(DragError::ItemNotFound(id.clone()));
        };
        item.node = node;
        item.styles.rebind(old, node);
        if was_floating {
            pointer_down::apply_drag_styles(&mut item.styles, &mut self.tree, node, item.preview_rect);
        }

        info!(item = %id, %old, new = %node, "Item re-attached");
        Ok(id.clone())
    }

    fn enclosing_zone(&self, node: NodeId) -> Option<ZoneId> {
        self.tree
            .ancestors(node)
            .into_iter()
            .find_map(|n| self.registry.zone_for_node(n).cloned())
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Advance the engine clock: settle finished transitions, then run the
    /// pending tracking frame.
    pub fn tick(&mut self, now: f64) {
        self.now = now;
        for settled in self.transitions.poll(now) {
            self.on_transition_settled(settled);
        }
        self.run_frames();
    }

    /// Queue a tracking frame for the item unless one is already pending.
    pub(crate) fn request_frame(&mut self, id: &ItemId) {
        let next = self.next_frame;
        if let Some(item) = self.registry.get_item_mut(id) {
            if item.raf.is_none() {
                item.raf = Some(FrameRequest(next));
                self.next_frame += 1;
            }
        }
    }

    /// Continuation of a settled transition.
    fn on_transition_settled(&mut self, settled: SettledTransition) {
        if let SettleReason::Failed(reason) = &settled.reason {
            warn!(
                node = %settled.node,
                kind = settled.kind.label(),
                reason = %reason,
                "Transition failed; continuing without animation"
            );
        }
        trace!(node = %settled.node, kind = settled.kind.label(), reason = ?settled.reason, "Transition settled");

        match settled.kind {
            TransitionKind::PickUp(id) => {
                let dragging = match self.registry.get_item_mut(&id) {
                    Some(item) => {
                        item.pickup_in_flight = false;
                        item.state.is_dragging()
                    }
                    None => false,
                };
                if dragging {
                    self.request_frame(&id);
                }
            }
            TransitionKind::Hover(_) => {}
            TransitionKind::Settle(id, outcome) => self.finish_settle(&id, outcome),
        }
    }

    /// Dispatch an event carrying a snapshot of the active session.
    pub(crate) fn emit(
        &mut self,
        kind: DragEventKind,
        target: EventTarget,
        outcome: Option<DragOutcome>,
    ) {
        let Some(session) = self.registry.session() else {
            return;
        };
        let event = DragEvent {
            kind,
            target,
            session: session.clone(),
            position: self.pointer,
            outcome,
        };
        trace!(event = %event.label(), "Dispatch");
        self.events.dispatch(&event);
    }
}
