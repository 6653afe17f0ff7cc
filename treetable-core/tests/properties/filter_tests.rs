//! Property-based tests for the filter engine
//!
//! These tests verify that narrowing a filter never reveals more nodes and that
//! clearing filters brings back the expansion state from before filtering.

use std::collections::BTreeSet;
use std::time::Instant;

use proptest::prelude::*;
use proptest::sample::Index;
use treetable_core::{
    ExpansionState, FieldProps, FilterEngine, FilterSettings, GLOBAL, TimerQueue, TreeNode,
    locate_ancestor_chain,
};

use super::strategies::{all_keys, tree_strategy};

fn engine() -> FilterEngine {
    let mut engine = FilterEngine::new(FilterSettings::default());
    engine.register_field("name", FieldProps::default());
    engine
}

fn visible_keys(roots: &[TreeNode]) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    for node in roots {
        if !node.has_class("filtered-out") {
            keys.insert(node.key.clone());
        }
        keys.extend(visible_keys(&node.children));
    }
    keys
}

fn filter_once(roots: &[TreeNode], field: &str, text: &str) -> BTreeSet<String> {
    let mut engine = engine();
    let mut tree = roots.to_vec();
    let mut expansion = ExpansionState::new();
    let mut timers = TimerQueue::new();
    engine.set_filter(field, text, &mut expansion, Instant::now(), &mut timers);
    engine.recompute(&mut tree, &mut expansion, &BTreeSet::new());
    visible_keys(&tree)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Extending the global filter text never reveals more nodes
    #[test]
    fn prop_longer_global_filter_never_grows_visible_set(
        roots in tree_strategy(),
        text in "[a-z]{2,3}",
        extra in "[a-z0-9]",
    ) {
        let loose = filter_once(&roots, GLOBAL, &text);
        let strict = filter_once(&roots, GLOBAL, &format!("{text}{extra}"));
        prop_assert!(
            strict.is_subset(&loose),
            "{:?} should be a subset of {:?}",
            strict,
            loose
        );
    }

    /// Dropping an alternative from a field filter never reveals more nodes
    #[test]
    fn prop_fewer_alternatives_never_grow_visible_set(
        roots in tree_strategy(),
        first in "[a-z]{1,3}",
        second in "[a-z]{1,3}",
    ) {
        let both = filter_once(&roots, "name", &format!("{first},{second}"));
        let one = filter_once(&roots, "name", &first);
        prop_assert!(one.is_subset(&both));
    }

    /// A visible node's ancestors are visible too
    #[test]
    fn prop_visible_nodes_have_visible_ancestors(
        roots in tree_strategy(),
        text in "[a-z]{2,3}",
    ) {
        let visible = filter_once(&roots, GLOBAL, &text);
        for key in &visible {
            for node in locate_ancestor_chain(key, &roots).unwrap() {
                prop_assert!(visible.contains(&node.key));
            }
        }
    }

    /// Clearing the filters restores the earlier expansion plus stay-open chains
    #[test]
    fn prop_clearing_restores_snapshot_and_stay_open(
        roots in tree_strategy(),
        expanded_mask in prop::collection::vec(any::<bool>(), 24),
        stay_open_picks in prop::collection::vec(any::<Index>(), 0..4),
        text in "[a-z]{2,3}",
    ) {
        let keys = all_keys(&roots);
        let snapshot: ExpansionState = keys
            .iter()
            .zip(&expanded_mask)
            .filter(|(_, expanded)| **expanded)
            .map(|(key, _)| key.clone())
            .collect();
        let stay_open: BTreeSet<String> =
            stay_open_picks.iter().map(|pick| pick.get(&keys).clone()).collect();

        let mut engine = engine();
        let mut tree = roots.clone();
        let mut expansion = snapshot.clone();
        let mut timers = TimerQueue::new();
        let now = Instant::now();

        engine.set_filter(GLOBAL, text, &mut expansion, now, &mut timers);
        engine.recompute(&mut tree, &mut expansion, &stay_open);
        engine.set_filter(GLOBAL, "", &mut expansion, now, &mut timers);
        let pass = engine.recompute(&mut tree, &mut expansion, &stay_open);

        let mut expected = snapshot.to_key_set();
        for key in &stay_open {
            for node in locate_ancestor_chain(key, &roots).unwrap() {
                expected.insert(node.key.clone());
            }
        }
        prop_assert!(!pass.active);
        prop_assert_eq!(expansion.to_key_set(), expected);
        prop_assert_eq!(visible_keys(&tree).len(), keys.len());
        prop_assert!(engine.highlights().is_empty());
    }

    /// Any run of edits, with or without passes in between, ends in the
    /// expansion state from before the first active filter
    #[test]
    fn prop_edit_sequences_restore_first_snapshot(
        roots in tree_strategy(),
        expanded_mask in prop::collection::vec(any::<bool>(), 24),
        stay_open_picks in prop::collection::vec(any::<Index>(), 0..3),
        edits in prop::collection::vec(("[a-z]{0,4}", any::<bool>()), 1..8),
    ) {
        let keys = all_keys(&roots);
        let snapshot: ExpansionState = keys
            .iter()
            .zip(&expanded_mask)
            .filter(|(_, expanded)| **expanded)
            .map(|(key, _)| key.clone())
            .collect();
        let stay_open: BTreeSet<String> =
            stay_open_picks.iter().map(|pick| pick.get(&keys).clone()).collect();

        let mut engine = engine();
        let mut tree = roots.clone();
        let mut expansion = snapshot.clone();
        let mut timers = TimerQueue::new();
        let now = Instant::now();

        for (text, run_pass) in &edits {
            engine.set_filter(GLOBAL, text.as_str(), &mut expansion, now, &mut timers);
            if *run_pass {
                engine.recompute(&mut tree, &mut expansion, &stay_open);
            }
        }
        engine.clear_filters(now, &mut timers);
        engine.recompute(&mut tree, &mut expansion, &stay_open);

        // Stay-open chains are only applied when a saved state is restored
        let filtered_at_some_point = edits.iter().any(|(text, _)| text.len() >= 2);
        let mut expected = snapshot.to_key_set();
        if filtered_at_some_point {
            for key in &stay_open {
                for node in locate_ancestor_chain(key, &roots).unwrap() {
                    expected.insert(node.key.clone());
                }
            }
        }
        prop_assert_eq!(expansion.to_key_set(), expected);
        prop_assert!(!engine.has_saved_expansion());
        prop_assert_eq!(visible_keys(&tree).len(), keys.len());
    }
}
