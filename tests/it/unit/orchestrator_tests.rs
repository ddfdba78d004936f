//! Unit tests for the transition orchestrator.

use crate::helpers::ManualAnimator;
use dragzone::transition::{
    SettleReason, TimedAnimator, TransitionKind, TransitionOrchestrator, TransitionRequest,
};
use dragzone::{DragError, DragOutcome, ItemId, NodeId, Rect};

fn hover(node: u64, width: f32) -> TransitionRequest {
    TransitionRequest {
        node: NodeId(node),
        kind: TransitionKind::Hover(ItemId::from("a")),
        from: Rect::new(0.0, 0.0, 50.0, 50.0),
        to: Rect::new(0.0, 0.0, width, 50.0),
        duration_ms: 120.0,
    }
}

#[test]
fn test_restart_on_same_node_settles_previous_once() {
    let mut orchestrator = TransitionOrchestrator::new(ManualAnimator::holding());

    let first = orchestrator.start(hover(7, 80.0), 0.0).unwrap();
    let second = orchestrator.start(hover(7, 120.0), 5.0).unwrap();
    assert_eq!(orchestrator.active_count(), 1);
    assert_eq!(orchestrator.animator().skipped, 1);

    let settled = orchestrator.poll(10.0);
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].id, first);
    assert_eq!(settled[0].reason, SettleReason::Skipped);

    orchestrator.animator_mut().complete_all();
    let settled = orchestrator.poll(20.0);
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].id, second);
    assert_eq!(settled[0].reason, SettleReason::Completed);
    assert!(!orchestrator.has_pending());
    assert!(orchestrator.poll(30.0).is_empty());
}

#[test]
fn test_nodes_animate_independently() {
    let mut orchestrator = TransitionOrchestrator::new(ManualAnimator::holding());
    orchestrator.start(hover(1, 80.0), 0.0).unwrap();
    orchestrator.start(hover(2, 80.0), 0.0).unwrap();

    assert_eq!(orchestrator.active_count(), 2);
    assert!(orchestrator.is_running(NodeId(1)));
    assert!(orchestrator.is_running(NodeId(2)));
    assert!(orchestrator.poll(10.0).is_empty());
}

#[test]
fn test_explicit_skip_is_reported_by_caller_only() {
    let mut orchestrator = TransitionOrchestrator::new(ManualAnimator::holding());
    orchestrator.start(hover(3, 80.0), 0.0).unwrap();

    let skipped = orchestrator.skip(NodeId(3)).unwrap();
    assert_eq!(skipped.reason, SettleReason::Skipped);
    assert_eq!(skipped.kind.label(), "hover");
    assert!(orchestrator.skip(NodeId(3)).is_none());
    assert!(orchestrator.poll(10.0).is_empty());
}

#[test]
fn test_rejected_start_settles_as_failed() {
    let mut orchestrator = TransitionOrchestrator::new(ManualAnimator::rejecting());

    let err = orchestrator.start(hover(4, 80.0), 0.0).unwrap_err();
    assert!(matches!(err, DragError::TransitionFailure { node: NodeId(4), .. }));
    assert!(!orchestrator.is_running(NodeId(4)));

    let settled = orchestrator.poll(1.0);
    assert_eq!(settled.len(), 1);
    assert!(matches!(settled[0].reason, SettleReason::Failed(_)));
}

#[test]
fn test_failed_poll_settles_as_failed() {
    let mut animator = ManualAnimator::holding();
    animator.fail_polls = true;
    let mut orchestrator = TransitionOrchestrator::new(animator);
    orchestrator.start(hover(5, 80.0), 0.0).unwrap();

    let settled = orchestrator.poll(1.0);
    assert_eq!(settled.len(), 1);
    assert_eq!(
        settled[0].reason,
        SettleReason::Failed("compositor lost".to_string())
    );
    assert_eq!(orchestrator.active_count(), 0);
}

#[test]
fn test_disabled_orchestrator_bypasses_animator() {
    let mut orchestrator = TransitionOrchestrator::new(ManualAnimator::holding());
    orchestrator.set_enabled(false);

    let settle = TransitionRequest {
        kind: TransitionKind::Settle(ItemId::from("a"), DragOutcome::Commit),
        ..hover(6, 80.0)
    };
    orchestrator.start(settle, 0.0).unwrap();

    assert!(orchestrator.animator().requests.is_empty());
    let settled = orchestrator.poll(0.0);
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].reason, SettleReason::Completed);
}

#[test]
fn test_timed_animator_follows_clock() {
    let mut orchestrator = TransitionOrchestrator::new(TimedAnimator::new());
    orchestrator.start(hover(8, 150.0), 100.0).unwrap();

    assert!(orchestrator.poll(160.0).is_empty());
    assert_eq!(orchestrator.animator().running(), 1);

    let settled = orchestrator.poll(220.0);
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].reason, SettleReason::Completed);
    assert_eq!(orchestrator.animator().running(), 0);
}
