//! Unit tests for the session registry.

use dragzone::registry::{SessionRegistry, TargetChange};
use dragzone::{DragEffect, DragError, DragOutcome, DragPayload, ItemId, SessionStatus, ZoneId};

fn registry_with_session() -> SessionRegistry {
    let mut registry = SessionRegistry::new();
    registry
        .begin_session(
            ItemId::from("A"),
            Some(ZoneId::from("Z0")),
            DragPayload::new("note", "n1"),
            DragEffect::Move,
        )
        .unwrap();
    registry
}

#[test]
fn test_single_session() {
    let mut registry = registry_with_session();
    assert!(registry.is_dragging());
    assert_eq!(
        registry.session().unwrap().status,
        SessionStatus::Dragging
    );

    let second = registry.begin_session(
        ItemId::from("B"),
        Some(ZoneId::from("Z0")),
        DragPayload::new("note", "n2"),
        DragEffect::Move,
    );
    assert_eq!(second.unwrap_err(), DragError::AlreadyDragging);
    assert!(registry.is_subject(&ItemId::from("A")));
    assert!(!registry.is_subject(&ItemId::from("B")));
}

#[test]
fn test_session_requires_source_zone() {
    let mut registry = SessionRegistry::new();
    let err = registry
        .begin_session(
            ItemId::from("A"),
            None,
            DragPayload::new("note", "n1"),
            DragEffect::Move,
        )
        .unwrap_err();
    assert_eq!(err, DragError::NoSourceZone(ItemId::from("A")));
    assert!(!registry.is_session_active());
}

#[test]
fn test_target_changes_leave_before_enter() {
    let mut registry = registry_with_session();
    let z1 = ZoneId::from("Z1");
    let z2 = ZoneId::from("Z2");

    let mut steps = Vec::new();
    for target in [Some(z1.clone()), Some(z2.clone()), Some(z1.clone()), None] {
        steps.extend(registry.set_target(target).unwrap());
    }

    assert_eq!(
        steps,
        vec![
            TargetChange::Enter(z1.clone()),
            TargetChange::Leave(z1.clone()),
            TargetChange::Enter(z2.clone()),
            TargetChange::Leave(z2),
            TargetChange::Enter(z1.clone()),
            TargetChange::Leave(z1),
        ]
    );
}

#[test]
fn test_same_target_is_not_a_change() {
    let mut registry = registry_with_session();
    let z1 = ZoneId::from("Z1");
    registry.set_target(Some(z1.clone())).unwrap();
    assert!(registry.set_target(Some(z1)).unwrap().is_empty());
    assert!(registry.set_target(None).unwrap().len() == 1);
    assert!(registry.set_target(None).unwrap().is_empty());
}

#[test]
fn test_session_ends_once() {
    let mut registry = registry_with_session();
    let ended = registry.end_session(DragOutcome::Abort).unwrap();
    assert_eq!(ended.item, ItemId::from("A"));

    assert_eq!(
        registry.end_session(DragOutcome::Abort).unwrap_err(),
        DragError::NoActiveSession
    );
    assert_eq!(
        registry.set_target(Some(ZoneId::from("Z1"))).unwrap_err(),
        DragError::NoActiveSession
    );
    assert!(!registry.is_dragging());
}
