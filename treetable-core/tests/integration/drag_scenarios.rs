//! Drag gestures from start to landed highlight

use std::time::{Duration, Instant};

use treetable_core::{DropPosition, LandingPosition, MoveOutcome, MoveRejection};

use super::{child_keys, sample_view};

#[test]
fn test_drag_second_child_before_first() {
    let mut view = sample_view();
    let now = Instant::now();

    view.drag_start("1.2");
    view.drag_over("1.1", DropPosition::Before, now);
    assert_eq!(view.drag_state().landing_node(), Some("1.1"));
    assert_eq!(view.drag_state().landing_position(), LandingPosition::Before);

    let outcome = view.drop_on("1.1", now);

    assert_eq!(
        outcome,
        MoveOutcome::Moved {
            parent: Some("1".to_string()),
            index: 0,
        }
    );
    assert_eq!(child_keys(&view, "1"), vec!["1.2", "1.1"]);
    assert_eq!(view.tree_updated(), 1);
    assert_eq!(view.drag_state().dragged(), None);
    assert_eq!(view.drag_state().landing_position(), LandingPosition::Landed);
}

#[test]
fn test_landed_highlight_clears_after_duration() {
    let mut view = sample_view();
    let now = Instant::now();

    view.drag_start("1.2");
    view.drag_over("2", DropPosition::After, now);
    assert!(view.drop_on("2", now).is_moved());

    view.advance(now + Duration::from_millis(999));
    assert_eq!(view.drag_state().landing_position(), LandingPosition::Landed);
    view.advance(now + Duration::from_millis(1000));
    assert_eq!(view.drag_state().landing_position(), LandingPosition::None);
    assert_eq!(view.drag_state().landing_node(), None);
}

#[test]
fn test_drop_into_child_expands_target() {
    let mut view = sample_view();
    let now = Instant::now();

    view.drag_start("1.1");
    let position = view.drag_over_at("2.1", 16.0, 32.0, now);
    assert_eq!(position, DropPosition::Child);
    assert!(view.drop_on("2.1", now).is_moved());

    assert_eq!(child_keys(&view, "2.1"), vec!["2.1.1", "1.1"]);
    assert!(view.is_expanded("2.1"));
    // Dropping cancelled the hover auto-expand
    assert_eq!(view.pending_timers(), 1);
}

#[test]
fn test_drop_into_own_subtree_is_ignored() {
    let mut view = sample_view();
    let now = Instant::now();

    view.drag_start("2");
    view.drag_over("2.1.1", DropPosition::Child, now);
    assert_eq!(view.drag_state().landing_node(), None);

    let outcome = view.drop_on("2.1.1", now);
    assert_eq!(outcome, MoveOutcome::Rejected(MoveRejection::TargetIsDescendant));
    assert_eq!(child_keys(&view, "2.1"), vec!["2.1.1"]);
    assert_eq!(view.tree_updated(), 0);
    assert_eq!(view.drag_state().dragged(), None);
}

#[test]
fn test_hover_expand_fires_once_until_leave() {
    let mut view = sample_view();
    let now = Instant::now();

    view.drag_start("1.1");
    view.drag_over("2", DropPosition::Child, now);
    view.drag_over("2", DropPosition::Child, now + Duration::from_millis(500));
    assert_eq!(view.pending_timers(), 1);

    view.advance(now + Duration::from_millis(1000));
    assert!(view.is_expanded("2"));

    // Still armed until the pointer leaves, so no second toggle is scheduled
    view.drag_over("2", DropPosition::Child, now + Duration::from_millis(1100));
    assert_eq!(view.pending_timers(), 0);

    view.drag_leave();
    assert_eq!(view.drag_state().landing_position(), LandingPosition::None);
}

#[test]
fn test_leaving_before_delay_cancels_expand() {
    let mut view = sample_view();
    let now = Instant::now();

    view.drag_start("1.1");
    view.drag_over("2", DropPosition::Child, now);
    view.drag_leave();
    view.advance(now + Duration::from_secs(5));

    assert!(!view.is_expanded("2"));
}

#[test]
fn test_new_drag_clears_landed_highlight() {
    let mut view = sample_view();
    let now = Instant::now();

    view.drag_start("1.2");
    view.drop_on("1.1", now);
    assert_eq!(view.drag_state().landing_position(), LandingPosition::Landed);

    view.drag_start("1.1");
    assert_eq!(view.drag_state().landing_position(), LandingPosition::None);
    assert_eq!(view.pending_timers(), 0);
}
