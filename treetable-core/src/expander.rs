//! Deferred collapse transitions
//!
//! This module provides the `CollapseAnimator`, which turns a collapse into a
//! short transition. When a key disappears from the expansion state the
//! animator puts it back, tags the visible child rows with the collapsing
//! class and schedules a settle timer. When the timer fires the key is
//! removed for real and the class is cleared.
//!
//! The settle write goes through the same observation path as any other
//! expansion write. An "applying" flag keeps it from being picked up as a
//! fresh collapse.

use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use crate::config::ExpanderSettings;
use crate::locator::{locate_path, node_at_path_mut};
use crate::models::{ExpansionState, TreeNode};
use crate::timers::{TimerEvent, TimerQueue, TimerToken};
use crate::trace_operation;
use crate::tracing::span_names;

/// Where a node is in its open/close transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    /// Open, children shown
    Expanded,
    /// Closing, children still shown with the collapsing class
    Collapsing,
    /// Closed
    Collapsed,
}

/// Defers collapses until their close transition has run
#[derive(Debug)]
pub struct CollapseAnimator {
    settings: ExpanderSettings,
    /// Set while the animator itself writes to the expansion state
    applying: bool,
    /// Settle timers of collapsing keys
    pending: HashMap<String, TimerToken>,
}

impl CollapseAnimator {
    /// Creates an animator with nothing collapsing
    #[must_use]
    pub fn new(settings: ExpanderSettings) -> Self {
        Self {
            settings,
            applying: false,
            pending: HashMap::new(),
        }
    }

    /// Transition settings, including the values the renderer needs
    #[must_use]
    pub const fn settings(&self) -> &ExpanderSettings {
        &self.settings
    }

    /// Returns true while a deferred collapse is being applied
    #[must_use]
    pub const fn is_applying(&self) -> bool {
        self.applying
    }

    /// Returns true if `key` is in its close transition
    #[must_use]
    pub fn is_collapsing(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of keys currently collapsing
    #[must_use]
    pub fn collapsing_count(&self) -> usize {
        self.pending.len()
    }

    /// Transition state of `key`
    #[must_use]
    pub fn transition_state(&self, key: &str, expansion: &ExpansionState) -> TransitionState {
        if self.is_collapsing(key) {
            TransitionState::Collapsing
        } else if expansion.is_expanded(key) {
            TransitionState::Expanded
        } else {
            TransitionState::Collapsed
        }
    }

    /// Observes keys that were just removed from the expansion state
    ///
    /// Each removed key still present in the tree is restored, its visible
    /// children are tagged and a settle timer is armed. Returns the number of
    /// collapses started. Does nothing while a deferred collapse is applied.
    pub fn observe_removed(
        &mut self,
        removed: &[String],
        roots: &mut [TreeNode],
        expansion: &mut ExpansionState,
        now: Instant,
        timers: &mut TimerQueue,
    ) -> usize {
        if self.applying {
            return 0;
        }

        let mut started = 0;
        for key in removed {
            let Some(path) = locate_path(key, roots) else {
                continue;
            };
            expansion.expand(key.clone());
            if self.pending.contains_key(key) {
                continue;
            }

            if let Some(node) = node_at_path_mut(roots, &path) {
                mark_visible_children(&mut node.children, expansion, &self.settings.collapsing_class);
            }
            let token = timers.schedule(
                now,
                self.settings.collapse_duration(),
                TimerEvent::CollapseSettle { key: key.clone() },
            );
            self.pending.insert(key.clone(), token);
            debug!(node_key = %key, "Collapse started");
            started += 1;
        }
        started
    }

    /// Finishes the collapse of `key` when its settle timer fires
    ///
    /// Returns false for a stale token.
    pub fn settle(
        &mut self,
        token: TimerToken,
        key: &str,
        roots: &mut [TreeNode],
        expansion: &mut ExpansionState,
        now: Instant,
        timers: &mut TimerQueue,
    ) -> bool {
        if self.pending.get(key) != Some(&token) {
            return false;
        }
        self.pending.remove(key);
        let _span = trace_operation!(span_names::EXPANSION_COLLAPSE, node_key = %key).entered();

        self.applying = true;
        let previous = expansion.clone();
        expansion.remove(key);
        let removed = expansion.removed_since(&previous);
        let reobserved = self.observe_removed(&removed, roots, expansion, now, timers);
        self.applying = false;

        debug_assert_eq!(reobserved, 0);
        self.unmark(key, roots);
        debug!(node_key = %key, "Collapse settled");
        true
    }

    /// Aborts the collapse of `key`, leaving it expanded
    ///
    /// Returns true if `key` was collapsing.
    pub fn cancel_collapse(
        &mut self,
        key: &str,
        roots: &mut [TreeNode],
        timers: &mut TimerQueue,
    ) -> bool {
        let Some(token) = self.pending.remove(key) else {
            return false;
        };
        timers.cancel(token);
        self.unmark(key, roots);
        true
    }

    /// Ends every running collapse at once, without waiting for its timer
    ///
    /// Marks are cleared and settle timers cancelled. The caller removes the
    /// returned keys from whatever expansion state it keeps.
    pub fn finish_all(&mut self, roots: &mut [TreeNode], timers: &mut TimerQueue) -> Vec<String> {
        let mut finished: Vec<String> = Vec::with_capacity(self.pending.len());
        for (key, token) in std::mem::take(&mut self.pending) {
            timers.cancel(token);
            self.unmark(&key, roots);
            finished.push(key);
        }
        finished.sort();
        if !finished.is_empty() {
            debug!(count = finished.len(), "Collapses finished early");
        }
        finished
    }

    /// Drops collapses of keys no longer in the tree
    pub fn forget_missing(&mut self, roots: &[TreeNode], timers: &mut TimerQueue) {
        self.pending.retain(|key, token| {
            let present = locate_path(key, roots).is_some();
            if !present {
                timers.cancel(*token);
            }
            present
        });
    }

    fn unmark(&self, key: &str, roots: &mut [TreeNode]) {
        let Some(path) = locate_path(key, roots) else {
            return;
        };
        if let Some(node) = node_at_path_mut(roots, &path) {
            unmark_subtree(&mut node.children, &self.settings.collapsing_class);
        }
    }
}

// Tags children, descending only into those that are themselves expanded.
fn mark_visible_children(children: &mut [TreeNode], expansion: &ExpansionState, class: &str) {
    for child in children {
        child.add_class(class);
        if expansion.is_expanded(&child.key) {
            mark_visible_children(&mut child.children, expansion, class);
        }
    }
}

fn unmark_subtree(children: &mut [TreeNode], class: &str) {
    for child in children {
        child.remove_class(class);
        unmark_subtree(&mut child.children, class);
    }
}
