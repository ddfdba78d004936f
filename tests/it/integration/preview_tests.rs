//! Preview Integration Tests
//!
//! Floating preview, placeholder, copy effect, drag styles and hover
//! transitions.

use crate::helpers::{ManualAnimator, TestSurfaceBuilder, two_zone_builder, two_zone_surface};
use dragzone::{
    DragEffect, DragOutcome, EngineConfig, ItemId, Modifiers, Point, Rect, Size, VisualTree,
};

#[test]
fn test_duplicate_leaves_placeholder_until_commit() {
    let mut s = TestSurfaceBuilder::new()
        .with_zone("Z1", Rect::new(0.0, 0.0, 200.0, 200.0))
        .with_zone("Z2", Rect::new(300.0, 0.0, 200.0, 200.0))
        .with_duplicate_item("A", "Z1", Rect::new(10.0, 10.0, 50.0, 50.0), "n1")
        .with_item("B", "Z1", Rect::new(10.0, 70.0, 50.0, 50.0), "n2")
        .build();
    s.drag_to("A", (20.0, 20.0), (400.0, 100.0));

    let placeholder = s
        .engine
        .get_item(&ItemId::from("A"))
        .unwrap()
        .placeholder()
        .unwrap();
    let z1 = s.node("Z1");
    assert_eq!(s.engine.tree().parent(placeholder), Some(z1));
    assert_eq!(s.engine.tree().index_in_parent(placeholder), Some(0));
    assert_eq!(
        s.engine.tree().style(placeholder, "opacity").as_deref(),
        Some("60%")
    );
    assert_eq!(s.parent_of("A"), Some(s.engine.tree().floating_layer()));

    s.up((400.0, 100.0)).unwrap();
    s.tick();

    assert!(!s.engine.tree().contains(placeholder));
    assert_eq!(s.engine.tree().children(z1), vec![s.node("B")]);
    assert_eq!(s.parent_of("A"), Some(s.node("Z2")));
    assert_eq!(s.contents("Z1"), vec!["n2"]);
    assert_eq!(s.contents("Z2"), vec!["n1"]);
}

#[test]
fn test_duplicate_abort_returns_to_placeholder_slot() {
    let mut s = TestSurfaceBuilder::new()
        .with_zone("Z1", Rect::new(0.0, 0.0, 200.0, 200.0))
        .with_duplicate_item("A", "Z1", Rect::new(10.0, 10.0, 50.0, 50.0), "n1")
        .with_item("B", "Z1", Rect::new(10.0, 70.0, 50.0, 50.0), "n2")
        .build();

    s.drag_to("A", (20.0, 20.0), (700.0, 700.0));
    let placeholder = s
        .engine
        .get_item(&ItemId::from("A"))
        .unwrap()
        .placeholder()
        .unwrap();
    assert_eq!(s.up((700.0, 700.0)).unwrap(), Some(DragOutcome::Abort));
    s.tick();

    let z1 = s.node("Z1");
    assert!(!s.engine.tree().contains(placeholder));
    assert_eq!(s.engine.tree().children(z1), vec![s.node("A"), s.node("B")]);
    assert_eq!(s.contents("Z1"), vec!["n1", "n2"]);
    assert!(
        s.engine
            .get_item(&ItemId::from("A"))
            .unwrap()
            .placeholder()
            .is_none()
    );
}

#[test]
fn test_copy_effect_keeps_source_and_origin() {
    let mut s = two_zone_surface();

    s.down_with("A", (20.0, 20.0), Modifiers::alt()).unwrap();
    s.move_to((400.0, 100.0)).unwrap();
    assert_eq!(s.engine.session().unwrap().effect, DragEffect::Copy);
    s.tick();
    assert_eq!(s.up((400.0, 100.0)).unwrap(), Some(DragOutcome::Commit));
    s.tick();

    assert_eq!(s.contents("Z1"), vec!["n1"]);
    assert_eq!(s.contents("Z2"), vec!["n1"]);
    assert_eq!(s.parent_of("A"), Some(s.node("Z1")));
    assert_eq!(s.index_of("A"), Some(0));
    assert_eq!(
        s.engine.get_item(&ItemId::from("A")).unwrap().zone(),
        Some(&dragzone::ZoneId::from("Z1"))
    );
}

#[test]
fn test_ctrl_copies_only_when_configured() {
    let mut s = two_zone_surface();
    s.down_with("A", (20.0, 20.0), Modifiers::ctrl()).unwrap();
    s.move_to((400.0, 100.0)).unwrap();
    assert_eq!(s.engine.session().unwrap().effect, DragEffect::Move);
}

#[test]
fn test_drag_styles_restored_after_settle() {
    let mut s = two_zone_surface();
    let a = s.node("A");
    let root = s.engine.tree().root();
    s.engine.tree_mut().set_style(a, "opacity", Some("50%"));

    s.drag_to("A", (20.0, 20.0), (400.0, 100.0));
    assert_eq!(s.style("A", "position").as_deref(), Some("fixed"));
    assert_eq!(s.style("A", "pointer-events").as_deref(), Some("none"));
    assert_eq!(s.style("A", "opacity").as_deref(), Some("90%"));
    assert!(s.style("A", "transform").is_some());
    assert_eq!(
        s.engine.tree().style(root, "user-select").as_deref(),
        Some("none")
    );

    s.up((400.0, 100.0)).unwrap();
    // Styles stay until the settle transition completes
    assert_eq!(s.style("A", "position").as_deref(), Some("fixed"));
    s.tick();

    assert_eq!(s.style("A", "position"), None);
    assert_eq!(s.style("A", "transform"), None);
    assert_eq!(s.style("A", "z-index"), None);
    assert_eq!(s.style("A", "opacity").as_deref(), Some("50%"));
    assert_eq!(s.engine.tree().style(root, "user-select"), None);
}

#[test]
fn test_preview_follows_pointer_with_grab_offset() {
    let mut s = two_zone_surface();
    s.drag_to("A", (20.0, 30.0), (400.0, 100.0));

    let preview = s.engine.get_item(&ItemId::from("A")).unwrap().preview_rect();
    assert_eq!(preview, Rect::new(390.0, 80.0, 50.0, 50.0));
    assert_eq!(
        s.style("A", "transform").as_deref(),
        Some(preview.translate_css().as_str())
    );
}

#[test]
fn test_grab_point_is_where_the_pointer_went_down() {
    let mut s = two_zone_builder()
        .with_config(EngineConfig::default().with_drag_threshold(10.0))
        .build();

    s.down("A", (20.0, 30.0)).unwrap();
    s.move_to((25.0, 30.0)).unwrap();
    s.move_to((400.0, 100.0)).unwrap();
    s.tick();

    // Held 10,20 into the visual, however far the pointer went first
    let preview = s.engine.get_item(&ItemId::from("A")).unwrap().preview_rect();
    assert_eq!(preview, Rect::new(390.0, 80.0, 50.0, 50.0));

    s.move_to((300.0, 300.0)).unwrap();
    s.tick();
    let preview = s.engine.get_item(&ItemId::from("A")).unwrap().preview_rect();
    assert_eq!(preview.origin, Point::new(290.0, 280.0));
}

#[test]
fn test_start_drag_grabs_at_the_given_point() {
    let mut s = two_zone_surface();
    s.engine
        .start_drag(&ItemId::from("A"), Point::new(40.0, 40.0), DragEffect::Move)
        .unwrap();
    s.engine.pointer_move(Point::new(400.0, 100.0)).unwrap();
    s.tick();

    let preview = s.engine.get_item(&ItemId::from("A")).unwrap().preview_rect();
    assert_eq!(preview.origin, Point::new(370.0, 70.0));
}

#[test]
fn test_hover_resizes_to_zone_slot_and_back() {
    let mut s = two_zone_builder()
        .with_item("D", "Z2", Rect::new(310.0, 10.0, 120.0, 60.0), "d")
        .build();

    s.drag_to("A", (20.0, 20.0), (400.0, 150.0));
    let item = s.engine.get_item(&ItemId::from("A")).unwrap();
    assert_eq!(item.preview_rect().size, Size::new(120.0, 60.0));
    assert_eq!(s.style("A", "width").as_deref(), Some("120px"));
    assert_eq!(
        s.engine.get_zone(&dragzone::ZoneId::from("Z2")).unwrap().drop_slot(),
        Some(Size::new(120.0, 60.0))
    );

    s.move_to((700.0, 700.0)).unwrap();
    s.tick();
    let item = s.engine.get_item(&ItemId::from("A")).unwrap();
    assert_eq!(item.preview_rect().size, Size::new(50.0, 50.0));
    assert_eq!(s.style("A", "width").as_deref(), Some("50px"));
    assert_eq!(s.engine.animator_mut().requests_of("hover").len(), 2);
}

#[test]
fn test_hover_transitions_never_overlap() {
    let mut s = TestSurfaceBuilder::new()
        .with_animator(ManualAnimator::holding())
        .with_zone("Z0", Rect::new(0.0, 300.0, 200.0, 200.0))
        .with_zone("Z1", Rect::new(0.0, 0.0, 200.0, 200.0))
        .with_zone("Z2", Rect::new(300.0, 0.0, 200.0, 200.0))
        .with_item("A", "Z0", Rect::new(10.0, 310.0, 50.0, 50.0), "n1")
        .with_item("C", "Z1", Rect::new(10.0, 10.0, 80.0, 40.0), "c")
        .with_item("D", "Z2", Rect::new(310.0, 10.0, 120.0, 60.0), "d")
        .build();
    let a = s.node("A");

    s.down("A", (20.0, 320.0)).unwrap();
    s.move_to((100.0, 100.0)).unwrap();
    s.tick();
    // The pick-up is held; no target checks yet
    assert!(!s.labels().iter().any(|l| l.starts_with("dragenter(")));

    s.engine.animator_mut().complete_all();
    s.tick();
    assert!(s.labels().contains(&"dragenter(Z1)".to_string()));
    assert_eq!(
        s.engine.transitions().running_kind(a).map(|k| k.label()),
        Some("hover")
    );

    // Leave Z1 and enter Z2 in the same frame, while the hover is held
    s.move_to((400.0, 100.0)).unwrap();
    s.tick();

    assert_eq!(s.engine.transitions().active_count(), 1);
    assert_eq!(s.engine.animator_mut().running(), 1);
    assert_eq!(s.engine.animator_mut().skipped, 2);
    let hovers = s.engine.animator_mut().requests_of("hover").len();
    assert_eq!(hovers, 3);
    let item = s.engine.get_item(&ItemId::from("A")).unwrap();
    assert_eq!(item.preview_rect().size, Size::new(120.0, 60.0));

    s.engine.animator_mut().complete_all();
    s.tick();
    assert_eq!(s.engine.transitions().active_count(), 0);
    assert_eq!(s.style("A", "width").as_deref(), Some("120px"));
    assert_eq!(s.style("A", "height").as_deref(), Some("60px"));
}

#[test]
fn test_release_skips_running_hover() {
    let mut s = two_zone_builder()
        .with_animator(ManualAnimator::holding())
        .with_item("D", "Z2", Rect::new(310.0, 10.0, 120.0, 60.0), "d")
        .build();
    let a = s.node("A");

    s.drag_to("A", (20.0, 20.0), (400.0, 150.0));
    s.engine.animator_mut().complete_all();
    s.tick();
    assert_eq!(
        s.engine.transitions().running_kind(a).map(|k| k.label()),
        Some("hover")
    );

    assert_eq!(s.up((400.0, 150.0)).unwrap(), Some(DragOutcome::Commit));
    assert_eq!(
        s.engine.transitions().running_kind(a).map(|k| k.label()),
        Some("settle")
    );
    assert_eq!(s.engine.transitions().active_count(), 1);

    s.settle();
    assert!(!s.engine.is_session_active());
    assert_eq!(s.contents("Z2"), vec!["d", "n1"]);
}
