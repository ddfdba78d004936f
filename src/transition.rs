//! Transition Orchestrator
//!
//! Wraps the host's asynchronous visual-transition primitive ([`Animator`])
//! and guarantees at most one active transition per node.
//!
//! The engine applies a transition's tree mutations itself, synchronously,
//! and then asks the animator to animate from the old geometry to the new
//! one. A transition therefore only ever delays the *continuation* (what the
//! engine does once the visual has settled), never the final tree state.
//! That is what makes failures harmless: a failed or rejected animation
//! settles immediately and the continuation still runs.
//!
//! ## Lifecycle
//!
//! ```text
//! start ──> Running ──poll──> Completed
//!              │  └──poll──> Failed      (host primitive errored)
//!              └──skip/start on same node──> Skipped
//! ```
//!
//! Every started transition settles exactly once and is reported exactly
//! once, either from [`TransitionOrchestrator::skip`] or from
//! [`TransitionOrchestrator::poll`].

use crate::error::{DragError, DragResult};
use crate::geometry::Rect;
use crate::scene::NodeId;
use crate::types::{DragOutcome, ItemId};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Identity of one started transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub u64);

/// What a transition is for; decides the engine's continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionKind {
    PickUp(ItemId),
    Hover(ItemId),
    Settle(ItemId, DragOutcome),
}

impl TransitionKind {
    pub fn item(&self) -> &ItemId {
        match self {
            Self::PickUp(id) | Self::Hover(id) | Self::Settle(id, _) => id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PickUp(_) => "pickup",
            Self::Hover(_) => "hover",
            Self::Settle(..) => "settle",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest {
    pub node: NodeId,
    pub kind: TransitionKind,
    pub from: Rect,
    pub to: Rect,
    pub duration_ms: f64,
}

/// Host-side handle of a running animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum AnimationStatus {
    Running,
    Finished,
    Failed(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    #[error("Animation rejected: {0}")]
    Rejected(String),
}

/// The host's transition primitive.
pub trait Animator {
    fn begin(
        &mut self,
        request: &TransitionRequest,
        now: f64,
    ) -> Result<AnimationHandle, AnimationError>;

    fn poll(&mut self, handle: AnimationHandle, now: f64) -> AnimationStatus;

    /// Jump to the end state. Must not fail.
    fn skip(&mut self, handle: AnimationHandle);
}

/// Why a transition stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum SettleReason {
    Completed,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettledTransition {
    pub id: TransitionId,
    pub node: NodeId,
    pub kind: TransitionKind,
    pub reason: SettleReason,
}

#[derive(Debug)]
struct ActiveTransition {
    id: TransitionId,
    kind: TransitionKind,
    handle: AnimationHandle,
}

pub struct TransitionOrchestrator<A: Animator> {
    animator: A,
    active: HashMap<NodeId, ActiveTransition>,
    settled: VecDeque<SettledTransition>,
    next_id: u64,
    enabled: bool,
}

impl<A: Animator> TransitionOrchestrator<A> {
    pub fn new(animator: A) -> Self {
        Self {
            animator,
            active: HashMap::new(),
            settled: VecDeque::new(),
            next_id: 0,
            enabled: true,
        }
    }

    /// When disabled, transitions complete on the next poll without
    /// touching the animator.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    /// Start a transition, skipping whatever was running on the same node.
    ///
    /// On `Err` the transition is already queued as failed, so its
    /// continuation still runs on the next poll.
    pub fn start(&mut self, request: TransitionRequest, now: f64) -> DragResult<TransitionId> {
        if let Some(prev) = self.skip(request.node) {
            self.settled.push_back(prev);
        }

        let id = TransitionId(self.next_id);
        self.next_id += 1;

        if !self.enabled {
            self.settled.push_back(SettledTransition {
                id,
                node: request.node,
                kind: request.kind,
                reason: SettleReason::Completed,
            });
            return Ok(id);
        }

        match self.animator.begin(&request, now) {
            Ok(handle) => {
                tracing::trace!(node = %request.node, kind = request.kind.label(), "Transition started");
                self.active.insert(
                    request.node,
                    ActiveTransition {
                        id,
                        kind: request.kind,
                        handle,
                    },
                );
                Ok(id)
            }
            Err(e) => {
                let reason = e.to_string();
                self.settled.push_back(SettledTransition {
                    id,
                    node: request.node,
                    kind: request.kind,
                    reason: SettleReason::Failed(reason.clone()),
                });
                Err(DragError::TransitionFailure {
                    node: request.node,
                    reason,
                })
            }
        }
    }

    /// Cancel the node's running transition. The returned record is the
    /// only report of it; the caller runs its continuation.
    pub fn skip(&mut self, node: NodeId) -> Option<SettledTransition> {
        let active = self.active.remove(&node)?;
        self.animator.skip(active.handle);
        tracing::trace!(%node, kind = active.kind.label(), "Transition skipped");
        Some(SettledTransition {
            id: active.id,
            node,
            kind: active.kind,
            reason: SettleReason::Skipped,
        })
    }

    /// Collect every transition that settled since the last poll, in start order.
    pub fn poll(&mut self, now: f64) -> Vec<SettledTransition> {
        let mut done: Vec<SettledTransition> = self.settled.drain(..).collect();

        let mut finished: Vec<(NodeId, SettleReason)> = Vec::new();
        for (node, active) in &self.active {
            match self.animator.poll(active.handle, now) {
                AnimationStatus::Running => {}
                AnimationStatus::Finished => finished.push((*node, SettleReason::Completed)),
                AnimationStatus::Failed(reason) => {
                    finished.push((*node, SettleReason::Failed(reason)))
                }
            }
        }
        for (node, reason) in finished {
            if let Some(active) = self.active.remove(&node) {
                done.push(SettledTransition {
                    id: active.id,
                    node,
                    kind: active.kind,
                    reason,
                });
            }
        }

        done.sort_by_key(|t| t.id);
        done
    }

    pub fn is_running(&self, node: NodeId) -> bool {
        self.active.contains_key(&node)
    }

    pub fn running_kind(&self, node: NodeId) -> Option<&TransitionKind> {
        self.active.get(&node).map(|a| &a.kind)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// True when something is running or waiting to be reported.
    pub fn has_pending(&self) -> bool {
        !self.active.is_empty() || !self.settled.is_empty()
    }
}

// =============================================================================
// Animator backends
// =============================================================================

/// Settles every animation on its first poll. For non-animating hosts and tests.
#[derive(Debug, Default)]
pub struct ImmediateAnimator {
    next_handle: u64,
    started: usize,
}

impl ImmediateAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of animations begun so far.
    pub fn started(&self) -> usize {
        self.started
    }
}

impl Animator for ImmediateAnimator {
    fn begin(
        &mut self,
        _request: &TransitionRequest,
        _now: f64,
    ) -> Result<AnimationHandle, AnimationError> {
        self.next_handle += 1;
        self.started += 1;
        Ok(AnimationHandle(self.next_handle))
    }

    fn poll(&mut self, _handle: AnimationHandle, _now: f64) -> AnimationStatus {
        AnimationStatus::Finished
    }

    fn skip(&mut self, _handle: AnimationHandle) {}
}

#[derive(Debug, Clone, Copy)]
struct TimedAnimation {
    from: Rect,
    to: Rect,
    start_time: f64,
    duration_ms: f64,
}

impl TimedAnimation {
    fn progress(&self, now: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration_ms).clamp(0.0, 1.0)
    }
}

/// Clock-driven animator: each animation finishes once its duration elapsed.
/// Hosts read interpolated geometry from [`TimedAnimator::frame`].
#[derive(Debug, Default)]
pub struct TimedAnimator {
    animations: HashMap<AnimationHandle, TimedAnimation>,
    next_handle: u64,
}

impl TimedAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpolated rectangle for a running animation.
    pub fn frame(&self, handle: AnimationHandle, now: f64) -> Option<Rect> {
        let anim = self.animations.get(&handle)?;
        let t = ease_out_cubic(anim.progress(now) as f32);
        let lerp = |a: f32, b: f32| a + (b - a) * t;
        Some(Rect::new(
            lerp(anim.from.origin.x, anim.to.origin.x),
            lerp(anim.from.origin.y, anim.to.origin.y),
            lerp(anim.from.size.width, anim.to.size.width),
            lerp(anim.from.size.height, anim.to.size.height),
        ))
    }

    pub fn running(&self) -> usize {
        self.animations.len()
    }
}

impl Animator for TimedAnimator {
    fn begin(
        &mut self,
        request: &TransitionRequest,
        now: f64,
    ) -> Result<AnimationHandle, AnimationError> {
        if !request.duration_ms.is_finite() {
            return Err(AnimationError::Rejected(format!(
                "invalid duration {}",
                request.duration_ms
            )));
        }
        self.next_handle += 1;
        let handle = AnimationHandle(self.next_handle);
        self.animations.insert(
            handle,
            TimedAnimation {
                from: request.from,
                to: request.to,
                start_time: now,
                duration_ms: request.duration_ms,
            },
        );
        Ok(handle)
    }

    fn poll(&mut self, handle: AnimationHandle, now: f64) -> AnimationStatus {
        match self.animations.get(&handle) {
            Some(anim) if anim.progress(now) < 1.0 => AnimationStatus::Running,
            Some(_) => {
                self.animations.remove(&handle);
                AnimationStatus::Finished
            }
            None => AnimationStatus::Failed("unknown animation".to_string()),
        }
    }

    fn skip(&mut self, handle: AnimationHandle) {
        self.animations.remove(&handle);
    }
}

/// Ease-out cubic - smooth deceleration
fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}
