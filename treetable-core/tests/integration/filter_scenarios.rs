//! Filtering and highlighting through the view

use std::time::{Duration, Instant};

use treetable_core::{DropPosition, FieldProps, GLOBAL, TransitionState, TreeNode};

use super::sample_view;

const HIDDEN: &str = "filtered-out";

fn hidden(view: &treetable_core::TreeView, key: &str) -> bool {
    view.locate(key).unwrap().node.has_class(HIDDEN)
}

#[test]
fn test_global_filter_highlights_alpha() {
    let mut view = sample_view();
    let now = Instant::now();
    view.register_field("name", FieldProps::default());

    view.set_filter(GLOBAL, "al", now);
    // Two characters do not exceed the global minimum: slow debounce
    assert_eq!(view.next_deadline(), Some(now + Duration::from_millis(500)));
    view.advance(now + Duration::from_millis(500));

    assert_eq!(
        view.highlight_column("1.1", "name", 0, false).as_deref(),
        Some(r#"<mark class="filter-highlight">Al</mark>pha"#)
    );
    assert!(!hidden(&view, "1.1"));
    assert!(hidden(&view, "1.2"));
    assert!(view.is_expanded("1"));
}

#[test]
fn test_short_global_filter_is_ignored() {
    let mut view = sample_view();
    let now = Instant::now();
    view.register_field("name", FieldProps::default());
    view.expand("2");

    view.set_filter(GLOBAL, "a", now);
    view.advance(now + Duration::from_millis(500));

    assert!(!hidden(&view, "1.2"));
    assert!(view.is_expanded("2"));
    assert_eq!(view.highlight_column("1.1", "name", 0, false).as_deref(), Some("Alpha"));
}

#[test]
fn test_field_and_global_filters_combine() {
    let mut view = sample_view();
    let now = Instant::now();
    view.highlight_column("1.1", "name", 0, false);
    view.highlight_column("1.1", "size", 0, false);

    view.set_filter(GLOBAL, "an", now);
    view.set_filter("size", "2", now);
    view.advance(now + Duration::from_millis(500));

    // "Banana" matches the global filter and has size 20
    assert!(!hidden(&view, "1.2"));
    // "Alpha" fails the global filter
    assert!(hidden(&view, "1.1"));
    // "Carrot" has no size
    assert!(hidden(&view, "2.1"));
    assert_eq!(
        view.highlights().get("1.2", "size"),
        Some(r#"<mark class="filter-highlight">2</mark>0"#)
    );
}

#[test]
fn test_only_latest_filter_value_is_applied() {
    let mut view = sample_view();
    let now = Instant::now();
    view.register_field("name", FieldProps::default());

    view.set_filter(GLOBAL, "carrot", now);
    view.set_filter(GLOBAL, "banana", now + Duration::from_millis(100));
    let fired = view.advance(now + Duration::from_secs(1));

    assert_eq!(fired, 1);
    assert!(hidden(&view, "2.1"));
    assert!(!hidden(&view, "1.2"));
}

#[test]
fn test_clearing_restores_expansion_and_stay_open() {
    let mut view = sample_view();
    let now = Instant::now();
    view.register_field("name", FieldProps::default());
    view.expand("1");
    view.set_stay_open_keys(["2.1.1"]);

    view.set_filter(GLOBAL, "banana", now);
    view.advance(now + Duration::from_secs(1));
    assert!(view.is_expanded("1"));
    assert!(!view.is_expanded("2"));

    let later = now + Duration::from_secs(2);
    view.set_filter(GLOBAL, "", later);
    view.advance(later + Duration::from_secs(1));

    for key in ["1", "2", "2.1", "2.1.1"] {
        assert!(view.is_expanded(key), "{key} should be expanded");
    }
    assert!(!hidden(&view, "1.1"));
    assert!(view.highlights().is_empty());
}

#[test]
fn test_strict_field_with_alternatives() {
    let mut view = sample_view();
    let now = Instant::now();
    view.highlight_column("1", "name", 1, true);

    view.set_filter("name", "ba, car", now);
    view.advance(now + Duration::from_secs(1));

    assert!(!hidden(&view, "1.2"));
    assert!(!hidden(&view, "2.1"));
    // "Baby carrot" starts with "ba"
    assert!(!hidden(&view, "2.1.1"));
    assert!(hidden(&view, "1.1"));
}

#[test]
fn test_dropping_a_match_elsewhere_refilters() {
    let mut view = sample_view();
    let now = Instant::now();
    view.register_field("name", FieldProps::default());

    view.set_filter(GLOBAL, "banana", now);
    view.advance(now + Duration::from_millis(150));
    assert!(!hidden(&view, "1"));
    assert!(hidden(&view, "2"));

    let later = now + Duration::from_millis(300);
    view.drag_start("1.2");
    view.drag_over("2.1", DropPosition::After, later);
    assert!(view.drop_on("2.1", later).is_moved());
    view.advance(later + Duration::from_millis(150));

    assert!(hidden(&view, "1"));
    assert!(!hidden(&view, "2"));
    assert!(!hidden(&view, "1.2"));
    assert!(view.is_expanded("2"));
}

#[test]
fn test_filtering_mid_collapse_keeps_node_closed_afterwards() {
    let mut view = sample_view();
    let now = Instant::now();
    view.register_field("name", FieldProps::default());
    view.expand("1");
    view.collapse("1", now);

    view.set_filter(GLOBAL, "banana", now + Duration::from_millis(50));
    view.advance(now + Duration::from_millis(250));
    assert!(view.is_expanded("1"));

    let later = now + Duration::from_millis(400);
    view.clear_filters(later);
    view.advance(later + Duration::from_secs(1));

    assert!(!view.is_expanded("1"));
    assert_eq!(view.transition_state("1"), TransitionState::Collapsed);
    assert_eq!(view.pending_timers(), 0);
}

#[test]
fn test_clear_then_retype_restores_original_expansion() {
    let mut view = sample_view();
    let now = Instant::now();
    view.register_field("name", FieldProps::default());
    view.expand("2");

    view.set_filter(GLOBAL, "banana", now);
    view.advance(now + Duration::from_millis(150));
    assert!(view.is_expanded("1"));

    // Cleared and retyped inside one debounce window
    let later = now + Duration::from_millis(300);
    view.set_filter(GLOBAL, "", later);
    view.set_filter(GLOBAL, "banana", later + Duration::from_millis(20));
    view.advance(later + Duration::from_secs(1));

    view.clear_filters(later + Duration::from_secs(2));
    view.advance(later + Duration::from_secs(3));

    assert!(view.is_expanded("2"));
    assert!(!view.is_expanded("1"));
}

#[test]
fn test_unbalanced_regex_is_matched_literally() {
    let mut view = sample_view();
    let now = Instant::now();
    view.register_field("name", FieldProps::default());
    view.replace_nodes(
        vec![
            TreeNode::new("x").with_field("name", "Ca(t"),
            TreeNode::new("y").with_field("name", "Cat"),
        ],
        now,
    );

    view.set_filter(GLOBAL, "a(", now);
    view.advance(now + Duration::from_secs(1));

    assert!(!hidden(&view, "x"));
    assert!(hidden(&view, "y"));
    assert_eq!(
        view.highlight_column("x", "name", 0, false).as_deref(),
        Some(r#"C<mark class="filter-highlight">a(</mark>t"#)
    );
}

#[test]
fn test_highlighted_markup_in_values_is_escaped() {
    let mut view = sample_view();
    let now = Instant::now();
    view.register_field("name", FieldProps::default());
    view.replace_nodes(
        vec![TreeNode::new("x").with_field("name", "<img src=x onerror=alert(1)> ban")],
        now,
    );

    view.set_filter(GLOBAL, "ban", now);
    view.advance(now + Duration::from_secs(1));

    assert_eq!(
        view.highlight_column("x", "name", 0, false).as_deref(),
        Some(r#"&lt;img src=x onerror=alert(1)&gt; <mark class="filter-highlight">ban</mark>"#)
    );
}
