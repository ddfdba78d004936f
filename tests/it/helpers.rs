//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `TestSurfaceBuilder` - a scene with zones and items registered on an engine
//! - `TestSurface` - pointer helpers and a recorder of every emitted event
//! - `ManualAnimator` - an animator the test completes, fails or holds

#![allow(dead_code)]

use dragzone::error::DragResult;
use dragzone::events::{DragEvent, ListenerScope};
use dragzone::item::ItemOptions;
use dragzone::transition::{
    AnimationError, AnimationHandle, AnimationStatus, Animator, TransitionRequest,
};
use dragzone::zone::ZoneOptions;
use dragzone::{
    Axis, DragEngine, DragOutcome, DragPayload, EngineConfig, ItemId, Modifiers, NodeId, Point,
    PreviewStrategy, Rect, Scene, VisualTree, ZoneId,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Simulated frame length in milliseconds.
pub const FRAME_MS: f64 = 16.0;

// ============================================================================
// ManualAnimator
// ============================================================================

/// Animator driven by the test.
///
/// By default every animation finishes on its first poll. With `hold` set,
/// animations stay running until [`ManualAnimator::complete_all`].
#[derive(Debug, Default)]
pub struct ManualAnimator {
    pub hold: bool,
    pub reject_begin: bool,
    pub fail_polls: bool,
    next_handle: u64,
    running: HashMap<AnimationHandle, bool>,
    pub requests: Vec<TransitionRequest>,
    pub skipped: usize,
}

impl ManualAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holding() -> Self {
        Self {
            hold: true,
            ..Self::default()
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject_begin: true,
            ..Self::default()
        }
    }

    /// Let every running animation finish on its next poll.
    pub fn complete_all(&mut self) {
        for done in self.running.values_mut() {
            *done = true;
        }
    }

    pub fn running(&self) -> usize {
        self.running.len()
    }

    /// Requests started for a transition kind label (`pickup`, `hover`, `settle`).
    pub fn requests_of(&self, label: &str) -> Vec<&TransitionRequest> {
        self.requests
            .iter()
            .filter(|r| r.kind.label() == label)
            .collect()
    }
}

impl Animator for ManualAnimator {
    fn begin(
        &mut self,
        request: &TransitionRequest,
        _now: f64,
    ) -> Result<AnimationHandle, AnimationError> {
        if self.reject_begin {
            return Err(AnimationError::Rejected("animations disabled".to_string()));
        }
        self.next_handle += 1;
        let handle = AnimationHandle(self.next_handle);
        self.running.insert(handle, false);
        self.requests.push(request.clone());
        Ok(handle)
    }

    fn poll(&mut self, handle: AnimationHandle, _now: f64) -> AnimationStatus {
        let Some(&done) = self.running.get(&handle) else {
            return AnimationStatus::Failed("unknown animation".to_string());
        };
        if self.fail_polls {
            self.running.remove(&handle);
            return AnimationStatus::Failed("compositor lost".to_string());
        }
        if done || !self.hold {
            self.running.remove(&handle);
            AnimationStatus::Finished
        } else {
            AnimationStatus::Running
        }
    }

    fn skip(&mut self, handle: AnimationHandle) {
        if self.running.remove(&handle).is_some() {
            self.skipped += 1;
        }
    }
}

// ============================================================================
// TestSurfaceBuilder
// ============================================================================

struct ZoneSpec {
    name: String,
    rect: Rect,
    axis: Option<Axis>,
    margin: Option<f32>,
    accepts_kind: Option<String>,
    /// Enclosing zone node; declared earlier in the builder
    parent: Option<String>,
}

struct ItemSpec {
    name: String,
    zone: Option<String>,
    rect: Rect,
    kind: String,
    payload_id: String,
    strategy: Option<PreviewStrategy>,
}

/// Builder for a scene with zones and items registered on a fresh engine.
///
/// # Example
/// ```ignore
/// let mut surface = TestSurfaceBuilder::new()
///     .with_zone("Z1", Rect::new(0.0, 0.0, 200.0, 200.0))
///     .with_item("A", "Z1", Rect::new(10.0, 10.0, 50.0, 50.0), "n1")
///     .build();
/// ```
pub struct TestSurfaceBuilder {
    config: EngineConfig,
    animator: ManualAnimator,
    zones: Vec<ZoneSpec>,
    items: Vec<ItemSpec>,
}

impl Default for TestSurfaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSurfaceBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            animator: ManualAnimator::new(),
            zones: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_animator(mut self, animator: ManualAnimator) -> Self {
        self.animator = animator;
        self
    }

    pub fn with_zone(mut self, name: &str, rect: Rect) -> Self {
        self.zones.push(ZoneSpec {
            name: name.to_string(),
            rect,
            axis: None,
            margin: None,
            accepts_kind: None,
            parent: None,
        });
        self
    }

    /// Zone whose node sits inside the node of `parent`.
    pub fn with_nested_zone(mut self, name: &str, parent: &str, rect: Rect) -> Self {
        self = self.with_zone(name, rect);
        if let Some(zone) = self.zones.last_mut() {
            zone.parent = Some(parent.to_string());
        }
        self
    }

    pub fn with_axis_zone(mut self, name: &str, rect: Rect, axis: Axis) -> Self {
        self = self.with_zone(name, rect);
        if let Some(zone) = self.zones.last_mut() {
            zone.axis = Some(axis);
        }
        self
    }

    pub fn with_margin_zone(mut self, name: &str, rect: Rect, margin: f32) -> Self {
        self = self.with_zone(name, rect);
        if let Some(zone) = self.zones.last_mut() {
            zone.margin = Some(margin);
        }
        self
    }

    /// Zone that only accepts payloads of `kind`.
    pub fn with_picky_zone(mut self, name: &str, rect: Rect, kind: &str) -> Self {
        self = self.with_zone(name, rect);
        if let Some(zone) = self.zones.last_mut() {
            zone.accepts_kind = Some(kind.to_string());
        }
        self
    }

    /// Item with a `note` payload, placed inside `zone`.
    pub fn with_item(mut self, name: &str, zone: &str, rect: Rect, payload_id: &str) -> Self {
        self.items.push(ItemSpec {
            name: name.to_string(),
            zone: Some(zone.to_string()),
            rect,
            kind: "note".to_string(),
            payload_id: payload_id.to_string(),
            strategy: None,
        });
        self
    }

    pub fn with_duplicate_item(
        mut self,
        name: &str,
        zone: &str,
        rect: Rect,
        payload_id: &str,
    ) -> Self {
        self = self.with_item(name, zone, rect, payload_id);
        if let Some(item) = self.items.last_mut() {
            item.strategy = Some(PreviewStrategy::Duplicate);
        }
        self
    }

    /// Item placed directly on the surface root, outside every zone.
    pub fn with_loose_item(mut self, name: &str, rect: Rect, payload_id: &str) -> Self {
        self.items.push(ItemSpec {
            name: name.to_string(),
            zone: None,
            rect,
            kind: "note".to_string(),
            payload_id: payload_id.to_string(),
            strategy: None,
        });
        self
    }

    pub fn build(self) -> TestSurface {
        let mut scene = Scene::new();
        let root = scene.root();
        let mut nodes = HashMap::new();

        for zone in &self.zones {
            let parent = zone
                .parent
                .as_ref()
                .and_then(|p| nodes.get(p).copied())
                .unwrap_or(root);
            nodes.insert(zone.name.clone(), scene.create_node(parent, zone.rect));
        }
        for item in &self.items {
            let parent = item
                .zone
                .as_ref()
                .and_then(|z| nodes.get(z).copied())
                .unwrap_or(root);
            nodes.insert(item.name.clone(), scene.create_node(parent, item.rect));
        }

        let mut engine = DragEngine::new(scene, self.animator, self.config);

        for zone in self.zones {
            let contents: Vec<DragPayload> = self
                .items
                .iter()
                .filter(|i| i.zone.as_deref() == Some(zone.name.as_str()))
                .map(|i| DragPayload::new(i.kind.clone(), i.payload_id.clone()))
                .collect();
            let mut options = ZoneOptions::new()
                .with_id(zone.name.as_str())
                .with_contents(contents);
            if let Some(axis) = zone.axis {
                options = options.with_axis(axis);
            }
            if let Some(margin) = zone.margin {
                options = options.with_capture_margin(margin);
            }
            if let Some(kind) = zone.accepts_kind {
                options = options.with_accepts(move |s| s.payload.kind == kind);
            }
            engine
                .register_zone(nodes[&zone.name], options)
                .expect("zone registration");
        }

        for item in &self.items {
            let mut options = ItemOptions::new().with_id(item.name.as_str());
            if let Some(strategy) = item.strategy {
                options = options.with_preview_strategy(strategy);
            }
            engine
                .register_item(
                    nodes[&item.name],
                    DragPayload::new(item.kind.clone(), item.payload_id.clone()),
                    options,
                )
                .expect("item registration");
        }

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        engine.on(ListenerScope::All, None, move |e: &DragEvent| {
            sink.borrow_mut().push(e.clone())
        });

        TestSurface {
            engine,
            nodes,
            events,
            clock: 0.0,
        }
    }
}

// ============================================================================
// TestSurface
// ============================================================================

pub struct TestSurface {
    pub engine: DragEngine<Scene, ManualAnimator>,
    pub nodes: HashMap<String, NodeId>,
    pub events: Rc<RefCell<Vec<DragEvent>>>,
    pub clock: f64,
}

impl TestSurface {
    pub fn node(&self, name: &str) -> NodeId {
        self.nodes[name]
    }

    pub fn item_id(name: &str) -> ItemId {
        ItemId::from(name)
    }

    pub fn zone_id(name: &str) -> ZoneId {
        ZoneId::from(name)
    }

    /// Payload ids in a zone's collection.
    pub fn contents(&self, zone: &str) -> Vec<String> {
        self.engine
            .get_zone(&ZoneId::from(zone))
            .map(|z| z.content_ids().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn down(&mut self, item: &str, at: (f32, f32)) -> DragResult<ItemId> {
        self.down_with(item, at, Modifiers::none())
    }

    pub fn down_with(
        &mut self,
        item: &str,
        at: (f32, f32),
        modifiers: Modifiers,
    ) -> DragResult<ItemId> {
        let node = self.node(item);
        self.engine
            .pointer_down(node, Point::new(at.0, at.1), modifiers)
    }

    pub fn move_to(&mut self, at: (f32, f32)) -> DragResult<()> {
        self.engine.pointer_move(Point::new(at.0, at.1))
    }

    pub fn up(&mut self, at: (f32, f32)) -> DragResult<Option<DragOutcome>> {
        self.engine.pointer_up(Point::new(at.0, at.1))
    }

    pub fn tick(&mut self) {
        self.clock += FRAME_MS;
        self.engine.tick(self.clock);
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Pick up `item` and carry it to `at`, with the pick-up settled.
    pub fn drag_to(&mut self, item: &str, from: (f32, f32), at: (f32, f32)) {
        self.down(item, from).expect("pointer down");
        self.move_to(at).expect("drag start");
        self.tick();
    }

    /// Complete held animations and tick until the session is gone.
    pub fn settle(&mut self) {
        for _ in 0..10 {
            if !self.engine.is_session_active() {
                return;
            }
            self.engine.animator_mut().complete_all();
            self.tick();
        }
    }

    /// Every event as `name(target)`.
    pub fn labels(&self) -> Vec<String> {
        self.events.borrow().iter().map(|e| e.label()).collect()
    }

    /// Event labels without `drag`, with repeated `dragover`s collapsed.
    pub fn protocol(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for label in self.labels() {
            if label.starts_with("drag(") {
                continue;
            }
            if label.starts_with("dragover(") && out.last() == Some(&label) {
                continue;
            }
            out.push(label);
        }
        out
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn parent_of(&self, name: &str) -> Option<NodeId> {
        self.engine.tree().parent(self.node(name))
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.engine.tree().index_in_parent(self.node(name))
    }

    pub fn style(&self, name: &str, property: &str) -> Option<String> {
        self.engine.tree().style(self.node(name), property)
    }
}

/// Z1 at (0,0) and Z2 at (300,0), both 200x200, item A (`n1`) in Z1.
pub fn two_zone_surface() -> TestSurface {
    two_zone_builder().build()
}

pub fn two_zone_builder() -> TestSurfaceBuilder {
    TestSurfaceBuilder::new()
        .with_zone("Z1", Rect::new(0.0, 0.0, 200.0, 200.0))
        .with_zone("Z2", Rect::new(300.0, 0.0, 200.0, 200.0))
        .with_item("A", "Z1", Rect::new(10.0, 10.0, 50.0, 50.0), "n1")
}
