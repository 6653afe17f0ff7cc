//! Expansion state of the tree view.
//!
//! A key present in [`ExpansionState`] means the node is expanded; absence
//! means collapsed. The map is shared between the host UI and the engine and
//! both sides write to it.

use std::collections::{HashMap, HashSet};

use crate::models::TreeNode;

/// Node key → expanded flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    keys: HashMap<String, bool>,
}

impl ExpansionState {
    /// Creates an empty (fully collapsed) expansion state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as expanded
    pub fn expand(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into(), true);
    }

    /// Removes the entry for `key`, returning true if it was present
    pub fn remove(&mut self, key: &str) -> bool {
        self.keys.remove(key).is_some()
    }

    /// Returns true if `key` has an entry
    #[must_use]
    pub fn is_expanded(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Number of expanded keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if nothing is expanded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates over the expanded keys in arbitrary order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Clears every entry
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Takes the whole state, leaving an empty one behind
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Keys present in `previous` but absent in `self`
    #[must_use]
    pub fn removed_since(&self, previous: &Self) -> Vec<String> {
        let mut removed: Vec<String> = previous
            .keys
            .keys()
            .filter(|key| !self.keys.contains_key(*key))
            .cloned()
            .collect();
        removed.sort();
        removed
    }

    /// Drops entries whose key is not present anywhere in `roots`
    ///
    /// Returns the number of pruned entries.
    pub fn prune_missing(&mut self, roots: &[TreeNode]) -> usize {
        let present = crate::locator::collect_keys(roots);
        let before = self.keys.len();
        self.keys.retain(|key, _| present.contains(key.as_str()));
        before - self.keys.len()
    }

    /// Expanded keys as a set, convenient for assertions and snapshots
    #[must_use]
    pub fn to_key_set(&self) -> HashSet<String> {
        self.keys.keys().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(|k| (k.into(), true)).collect(),
        }
    }
}
