//! Property-based tests for key lookup
//!
//! These tests verify that lookups return the unique node for a key together
//! with a consistent ancestor chain and index path.

use proptest::prelude::*;
use proptest::sample::Index;
use treetable_core::{locate, locate_ancestor_chain, locate_path, locator};

use super::strategies::{all_keys, tree_strategy};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Ancestors run from the parent up to a root-level node, one per level
    #[test]
    fn prop_locate_returns_consistent_ancestors(
        roots in tree_strategy(),
        pick in any::<Index>(),
    ) {
        let keys = all_keys(&roots);
        let key = pick.get(&keys);

        let found = locate(key, &roots);
        prop_assert!(found.is_some(), "Key {} should be found", key);
        let found = found.unwrap();
        prop_assert_eq!(&found.node.key, key);

        let path = locate_path(key, &roots).unwrap();
        prop_assert_eq!(found.depth(), path.len());
        prop_assert_eq!(found.ancestors.len(), path.len() - 1);

        if let Some(root) = found.ancestors.last() {
            prop_assert!(
                roots.iter().any(|r| r.key == root.key),
                "Last ancestor {} should be root-level",
                root.key
            );
        }
        for pair in found.ancestors.windows(2) {
            prop_assert!(
                pair[1].children.iter().any(|c| c.key == pair[0].key),
                "{} should be a child of {}",
                pair[0].key,
                pair[1].key
            );
        }
        if let Some(parent) = found.parent() {
            prop_assert!(parent.children.iter().any(|c| c.key == *key));
        }
    }

    /// The root-first chain is the reversed ancestor list plus the node
    #[test]
    fn prop_ancestor_chain_is_root_first(
        roots in tree_strategy(),
        pick in any::<Index>(),
    ) {
        let keys = all_keys(&roots);
        let key = pick.get(&keys);

        let chain = locate_ancestor_chain(key, &roots).unwrap();
        let found = locate(key, &roots).unwrap();

        let mut expected: Vec<&str> = found.ancestors.iter().rev().map(|n| n.key.as_str()).collect();
        expected.push(key.as_str());
        let actual: Vec<&str> = chain.iter().map(|n| n.key.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// The index path leads back to the same node
    #[test]
    fn prop_path_resolves_to_node(
        roots in tree_strategy(),
        pick in any::<Index>(),
    ) {
        let keys = all_keys(&roots);
        let key = pick.get(&keys);

        let path = locate_path(key, &roots).unwrap();
        let node = locator::node_at_path(&roots, &path).unwrap();
        prop_assert_eq!(&node.key, key);
    }

    /// Unknown keys are never found
    #[test]
    fn prop_missing_key_is_not_found(roots in tree_strategy()) {
        prop_assert!(locate("missing", &roots).is_none());
        prop_assert!(locate_ancestor_chain("missing", &roots).is_none());
        prop_assert!(locate_path("missing", &roots).is_none());
    }
}
