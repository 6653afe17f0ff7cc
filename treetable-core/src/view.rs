//! Tree view state and operations
//!
//! [`TreeView`] owns the nodes and every piece of interaction state around
//! them: expansion, stay-open keys, filters, drag gesture and pending timers.
//! All time-dependent behaviour is driven by the host through
//! [`TreeView::advance`].

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use tracing::debug;

use crate::config::TreeViewSettings;
use crate::drag_drop::{
    DragController, DragState, DropConfig, DropPosition, MoveOutcome, calculate_drop_position,
};
use crate::expander::{CollapseAnimator, TransitionState};
use crate::filter::{FieldProps, FilterEngine, HighlightProjection};
use crate::locator::{Location, contains_key, locate};
use crate::models::{ExpansionState, TreeNode};
use crate::timers::{TimerEvent, TimerQueue, TimerToken};
use crate::trace_operation_debug;
use crate::tracing::span_names;

/// Interactive tree-table state
#[derive(Debug)]
pub struct TreeView {
    nodes: Vec<TreeNode>,
    expansion: ExpansionState,
    stay_open: BTreeSet<String>,
    settings: TreeViewSettings,
    filter: FilterEngine,
    drag: DragController,
    animator: CollapseAnimator,
    timers: TimerQueue,
}

impl TreeView {
    /// Creates a view over `nodes` with nothing expanded
    #[must_use]
    pub fn new(nodes: Vec<TreeNode>, settings: TreeViewSettings) -> Self {
        Self {
            nodes,
            expansion: ExpansionState::new(),
            stay_open: BTreeSet::new(),
            filter: FilterEngine::new(settings.filter.clone()),
            drag: DragController::new(settings.drag.clone()),
            animator: CollapseAnimator::new(settings.expander.clone()),
            timers: TimerQueue::new(),
            settings,
        }
    }

    // ========== Nodes ==========

    /// Root-level nodes
    #[must_use]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Settings the view was built with
    #[must_use]
    pub const fn settings(&self) -> &TreeViewSettings {
        &self.settings
    }

    /// Replaces the whole tree
    ///
    /// Expansion entries and pending collapses of keys that are gone are
    /// dropped, and an active filter is re-applied to the new nodes.
    pub fn replace_nodes(&mut self, nodes: Vec<TreeNode>, now: Instant) {
        self.nodes = nodes;
        let pruned = self.expansion.prune_missing(&self.nodes);
        self.animator.forget_missing(&self.nodes, &mut self.timers);
        if self.filter.is_filtering() {
            self.filter.request_recompute(now, &mut self.timers);
        }
        debug!(pruned, "Tree replaced");
    }

    /// Finds `key` with its ancestors, nearest first
    #[must_use]
    pub fn locate(&self, key: &str) -> Option<Location<'_>> {
        locate(key, &self.nodes)
    }

    // ========== Expansion ==========

    /// Current expansion state
    #[must_use]
    pub const fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Returns true if `key` is expanded (including while it collapses)
    #[must_use]
    pub fn is_expanded(&self, key: &str) -> bool {
        self.expansion.is_expanded(key)
    }

    /// Transition state of `key`
    #[must_use]
    pub fn transition_state(&self, key: &str) -> TransitionState {
        self.animator.transition_state(key, &self.expansion)
    }

    /// Expands `key`, aborting its collapse if one is running
    ///
    /// Returns false if `key` is not in the tree.
    pub fn expand(&mut self, key: &str) -> bool {
        if !contains_key(&self.nodes, key) {
            return false;
        }
        self.animator
            .cancel_collapse(key, &mut self.nodes, &mut self.timers);
        self.expansion.expand(key);
        true
    }

    /// Starts collapsing `key`
    ///
    /// Returns false if `key` is not expanded or already collapsing.
    pub fn collapse(&mut self, key: &str, now: Instant) -> bool {
        if !self.expansion.is_expanded(key) || self.animator.is_collapsing(key) {
            return false;
        }
        let mut next = self.expansion.clone();
        next.remove(key);
        self.write_expansion(next, now);
        true
    }

    /// Collapses an expanded key, expands anything else
    pub fn toggle(&mut self, key: &str, now: Instant) -> bool {
        if self.transition_state(key) == TransitionState::Expanded {
            self.collapse(key, now)
        } else {
            self.expand(key)
        }
    }

    /// Replaces the expansion state
    ///
    /// Keys dropped by the new state go through the collapse transition.
    pub fn replace_expansion(&mut self, expansion: ExpansionState, now: Instant) {
        self.write_expansion(expansion, now);
    }

    fn write_expansion(&mut self, next: ExpansionState, now: Instant) {
        let removed = next.removed_since(&self.expansion);
        self.expansion = next;
        self.animator.observe_removed(
            &removed,
            &mut self.nodes,
            &mut self.expansion,
            now,
            &mut self.timers,
        );
    }

    // ========== Filtering ==========

    /// Sets the keys whose ancestors reopen when filters are cleared
    pub fn set_stay_open_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stay_open = keys.into_iter().map(Into::into).collect();
    }

    /// Keys whose ancestors reopen when filters are cleared
    #[must_use]
    pub const fn stay_open_keys(&self) -> &BTreeSet<String> {
        &self.stay_open
    }

    /// Sets the filter text of `field` (or [`GLOBAL`]) and schedules a pass
    ///
    /// When this starts filtering, running collapses are finished on the spot
    /// so the saved expansion state records those keys as collapsed.
    ///
    /// [`GLOBAL`]: crate::filter::GLOBAL
    pub fn set_filter(&mut self, field: &str, text: impl Into<String>, now: Instant) -> TimerToken {
        let had_snapshot = self.filter.has_saved_expansion();
        let token = self
            .filter
            .set_filter(field, text, &mut self.expansion, now, &mut self.timers);

        if !had_snapshot && self.filter.has_saved_expansion() {
            let finished = self.animator.finish_all(&mut self.nodes, &mut self.timers);
            self.filter.forget_saved_keys(&finished);
        }
        token
    }

    /// Clears every filter and schedules a pass
    pub fn clear_filters(&mut self, now: Instant) -> TimerToken {
        self.filter.clear_filters(now, &mut self.timers)
    }

    /// Current filter values
    #[must_use]
    pub const fn filters(&self) -> &BTreeMap<String, String> {
        self.filter.filters()
    }

    /// Registers or replaces the properties of a filterable field
    pub fn register_field(&mut self, field: impl Into<String>, props: FieldProps) {
        self.filter.register_field(field, props);
    }

    /// Display text of `field` on node `key`, highlighted when it matched
    ///
    /// Registers the field on first use. Returns `None` if `key` is not in
    /// the tree.
    pub fn highlight_column(
        &mut self,
        key: &str,
        field: &str,
        min_length: usize,
        strict: bool,
    ) -> Option<String> {
        let node = locate(key, &self.nodes)?.node;
        Some(
            self.filter
                .highlight_column(node, field, min_length, strict),
        )
    }

    /// Highlight projection from the last filter pass
    #[must_use]
    pub const fn highlights(&self) -> &HighlightProjection {
        self.filter.highlights()
    }

    /// Filter engine, for inspection
    #[must_use]
    pub const fn filter_engine(&self) -> &FilterEngine {
        &self.filter
    }

    // ========== Drag and drop ==========

    /// Starts dragging `key`
    pub fn drag_start(&mut self, key: impl Into<String>) {
        self.drag.drag_start(key, &mut self.timers);
    }

    /// Hovers the dragged node over `target_key` at `position`
    pub fn drag_over(&mut self, target_key: &str, position: DropPosition, now: Instant) {
        self.drag
            .drag_over(&self.nodes, target_key, position, now, &mut self.timers);
    }

    /// Hovers over `target_key` with the pointer `y_in_row` pixels into a row
    /// of `row_height`, returning the derived drop slot
    pub fn drag_over_at(
        &mut self,
        target_key: &str,
        y_in_row: f64,
        row_height: f64,
        now: Instant,
    ) -> DropPosition {
        let config = DropConfig::for_row(row_height, self.drag.settings());
        let position = calculate_drop_position(y_in_row, &config);
        self.drag_over(target_key, position, now);
        position
    }

    /// Pointer left the hovered row
    pub fn drag_leave(&mut self) {
        self.drag.drag_leave(&mut self.timers);
    }

    /// Drops the dragged node on `target_key`
    ///
    /// An active filter is re-applied after a successful move.
    pub fn drop_on(&mut self, target_key: &str, now: Instant) -> MoveOutcome {
        let outcome = self.drag.drop_on(
            &mut self.nodes,
            &mut self.expansion,
            target_key,
            now,
            &mut self.timers,
        );
        if outcome.is_moved() {
            self.refilter_after_move(now);
        }
        outcome
    }

    /// Moves `dragged_key` relative to `target_key` without a gesture
    ///
    /// An active filter is re-applied after a successful move.
    pub fn move_node(
        &mut self,
        dragged_key: &str,
        target_key: &str,
        position: DropPosition,
        now: Instant,
    ) -> MoveOutcome {
        let outcome = crate::drag_drop::move_node(
            &mut self.nodes,
            &mut self.expansion,
            dragged_key,
            target_key,
            position,
        );
        if outcome.is_moved() {
            self.drag.mark_tree_updated();
            self.refilter_after_move(now);
        }
        outcome
    }

    // Ancestor visibility depends on structure, so a moved match needs a pass.
    fn refilter_after_move(&mut self, now: Instant) {
        if self.filter.is_filtering() {
            self.filter.request_recompute(now, &mut self.timers);
        }
    }

    /// Current drag state
    #[must_use]
    pub const fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Counter bumped after every successful move
    #[must_use]
    pub const fn tree_updated(&self) -> u64 {
        self.drag.state().tree_updated()
    }

    // ========== Timers ==========

    /// Deadline of the earliest pending timer
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Number of pending timers
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Runs every timer due at `now`, returning how many fired
    pub fn advance(&mut self, now: Instant) -> usize {
        let _span = trace_operation_debug!(span_names::TIMERS_ADVANCE).entered();
        let mut fired = 0;

        while let Some((token, event)) = self.timers.pop_due(now) {
            fired += 1;
            debug!(?event, "Timer fired");
            match event {
                TimerEvent::FilterRecompute => {
                    self.filter.on_timer(
                        token,
                        &mut self.nodes,
                        &mut self.expansion,
                        &self.stay_open,
                    );
                }
                TimerEvent::CollapseSettle { key } => {
                    self.animator.settle(
                        token,
                        &key,
                        &mut self.nodes,
                        &mut self.expansion,
                        now,
                        &mut self.timers,
                    );
                }
                TimerEvent::DragExpand { key } => {
                    if let Some(key) = self.drag.on_drag_expand(token, &key) {
                        self.toggle(&key, now);
                    }
                }
                TimerEvent::DropHighlightClear => self.drag.on_highlight_clear(token),
            }
        }

        fired
    }
}
