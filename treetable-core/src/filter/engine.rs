//! Debounced filter engine.
//!
//! Filter edits are collected into the filter state and a single recompute is
//! scheduled on the timer queue; scheduling again cancels the pending one, so
//! only the latest filter values are ever applied. A pass walks the whole
//! tree, rebuilds the highlight projection, tags hidden rows and opens the
//! ancestors of matches.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::debug;

use super::highlight::{HighlightProjection, escape_html, mark_matches};
use super::pattern::{FieldPredicate, FieldProps, combine, comma_to_pattern, compile, sanitize};
use crate::config::FilterSettings;
use crate::locator::locate_ancestor_chain;
use crate::models::{ExpansionState, TreeNode};
use crate::timers::{TimerEvent, TimerQueue, TimerToken};
use crate::trace_operation;
use crate::tracing::span_names;

/// Reserved filter key matched against every registered field
pub const GLOBAL: &str = "global";

/// Counts from one filter pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterPass {
    /// Nodes left visible
    pub visible: usize,
    /// Nodes tagged as filtered out
    pub hidden: usize,
    /// Whether any filter was active during the pass
    pub active: bool,
}

/// A field filter compiled for one pass
struct CompiledField {
    field: String,
    /// Regex of the field's own filter, `None` when it matches everything
    pattern: Option<Regex>,
    predicate: Option<FieldPredicate>,
    /// Whether the field's own filter is active
    filtered: bool,
    /// Global and field patterns combined, used for marking
    highlight: Option<Regex>,
}

struct CompiledFilters {
    global: Option<Regex>,
    fields: Vec<CompiledField>,
    active: bool,
}

/// Debounced multi-field filter with match highlighting
#[derive(Debug)]
pub struct FilterEngine {
    settings: FilterSettings,
    filters: BTreeMap<String, String>,
    props: BTreeMap<String, FieldProps>,
    highlights: HighlightProjection,
    saved_expansion: Option<ExpansionState>,
    pending: Option<TimerToken>,
}

impl FilterEngine {
    /// Creates an engine with no filters and no registered fields
    #[must_use]
    pub fn new(settings: FilterSettings) -> Self {
        Self {
            settings,
            filters: BTreeMap::new(),
            props: BTreeMap::new(),
            highlights: HighlightProjection::new(),
            saved_expansion: None,
            pending: None,
        }
    }

    /// Current filter values keyed by field (and [`GLOBAL`])
    #[must_use]
    pub const fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Current filter text of `field`, empty when unset
    #[must_use]
    pub fn filter(&self, field: &str) -> &str {
        self.filters.get(field).map_or("", String::as_str)
    }

    /// Highlight projection from the last pass
    #[must_use]
    pub const fn highlights(&self) -> &HighlightProjection {
        &self.highlights
    }

    /// Filter settings in use
    #[must_use]
    pub const fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    /// Registers or replaces the properties of `field`
    pub fn register_field(&mut self, field: impl Into<String>, props: FieldProps) {
        let field = field.into();
        if field != GLOBAL {
            self.props.insert(field, props);
        }
    }

    /// Properties of a registered field
    #[must_use]
    pub fn field_props(&self, field: &str) -> Option<&FieldProps> {
        self.props.get(field)
    }

    /// Display text of `field` on `node`, highlighted when projected
    ///
    /// The first call for a field registers it with `min_length` and
    /// `strict`; later calls keep the registered properties.
    pub fn highlight_column(
        &mut self,
        node: &TreeNode,
        field: &str,
        min_length: usize,
        strict: bool,
    ) -> String {
        if field != GLOBAL && !self.props.contains_key(field) {
            self.props
                .insert(field.to_string(), FieldProps::new(min_length, strict));
        }
        self.highlight_text(node, field)
    }

    /// Display text of `field` on `node` without registering anything
    ///
    /// The result is always markup-safe: unprojected values are escaped the
    /// same way the projection escapes text around its marks.
    #[must_use]
    pub fn highlight_text(&self, node: &TreeNode, field: &str) -> String {
        self.highlights.get(&node.key, field).map_or_else(
            || escape_html(&node.field_text(field)).into_owned(),
            str::to_string,
        )
    }

    /// Returns true if any value in `filters` is long enough to take effect
    #[must_use]
    pub fn has_some_filter(&self, filters: &BTreeMap<String, String>) -> bool {
        filters.iter().any(|(field, text)| self.is_active(field, text))
    }

    /// Returns true if the current filter values filter anything
    #[must_use]
    pub fn is_filtering(&self) -> bool {
        self.has_some_filter(&self.filters)
    }

    /// Returns true while a recompute is scheduled
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn min_length(&self, field: &str) -> usize {
        if field == GLOBAL {
            self.settings.min_global_length
        } else {
            self.props.get(field).map_or(0, |p| p.min_length)
        }
    }

    fn is_active(&self, field: &str, text: &str) -> bool {
        !text.is_empty() && text.chars().count() >= self.min_length(field)
    }

    /// Delay before the next recompute
    ///
    /// Short when some active filter value is longer than the global minimum
    /// (the user is narrowing a search), long otherwise.
    #[must_use]
    pub fn debounce_delay(&self) -> Duration {
        let narrowing = self.filters.iter().any(|(field, text)| {
            self.is_active(field, text) && text.chars().count() > self.settings.min_global_length
        });
        if narrowing {
            self.settings.fast_debounce()
        } else {
            self.settings.slow_debounce()
        }
    }

    /// Sets the filter text of `field` and schedules a recompute
    ///
    /// When this edit turns filtering on, the current expansion state is
    /// cleared so matches open from a fully collapsed tree. The state from
    /// before the first active filter is kept until a pass runs with no
    /// filter at all; turning filtering off and on again in between does not
    /// replace it. Fields filtered before they were rendered get default
    /// properties.
    pub fn set_filter(
        &mut self,
        field: &str,
        text: impl Into<String>,
        expansion: &mut ExpansionState,
        now: Instant,
        timers: &mut TimerQueue,
    ) -> TimerToken {
        if field != GLOBAL && !self.props.contains_key(field) {
            self.props.insert(field.to_string(), FieldProps::default());
        }

        let was_filtering = self.is_filtering();
        self.filters.insert(field.to_string(), text.into());
        let is_filtering = self.is_filtering();

        if is_filtering && !was_filtering {
            let current = expansion.take();
            if self.saved_expansion.is_none() {
                debug!(expanded = current.len(), "Filtering started, saving expansion state");
                self.saved_expansion = Some(current);
            }
        }

        self.request_recompute(now, timers)
    }

    /// Returns true while the pre-filter expansion state is held
    #[must_use]
    pub const fn has_saved_expansion(&self) -> bool {
        self.saved_expansion.is_some()
    }

    /// Removes `keys` from the held pre-filter expansion state
    ///
    /// Returns the number of keys removed.
    pub fn forget_saved_keys<S: AsRef<str>>(&mut self, keys: &[S]) -> usize {
        let Some(saved) = self.saved_expansion.as_mut() else {
            return 0;
        };
        keys.iter().filter(|key| saved.remove(key.as_ref())).count()
    }

    /// Clears every filter value and schedules a recompute
    pub fn clear_filters(&mut self, now: Instant, timers: &mut TimerQueue) -> TimerToken {
        self.filters.clear();
        self.request_recompute(now, timers)
    }

    /// Schedules a recompute, replacing any pending one
    pub fn request_recompute(&mut self, now: Instant, timers: &mut TimerQueue) -> TimerToken {
        if let Some(token) = self.pending.take() {
            timers.cancel(token);
        }
        let delay = self.debounce_delay();
        debug!(delay_ms = delay.as_millis() as u64, "Scheduling filter pass");
        let token = timers.schedule(now, delay, TimerEvent::FilterRecompute);
        self.pending = Some(token);
        token
    }

    /// Handles a fired recompute timer
    ///
    /// Returns `None` for a stale token.
    pub fn on_timer(
        &mut self,
        token: TimerToken,
        roots: &mut [TreeNode],
        expansion: &mut ExpansionState,
        stay_open: &BTreeSet<String>,
    ) -> Option<FilterPass> {
        if self.pending != Some(token) {
            return None;
        }
        self.pending = None;
        Some(self.recompute(roots, expansion, stay_open))
    }

    /// Runs a filter pass immediately
    ///
    /// With no active filter this restores the expansion state saved when
    /// filtering started, drops entries for keys no longer in the tree and
    /// reopens the ancestors of every stay-open key.
    pub fn recompute(
        &mut self,
        roots: &mut [TreeNode],
        expansion: &mut ExpansionState,
        stay_open: &BTreeSet<String>,
    ) -> FilterPass {
        let compiled = self.compile_filters();
        let _span = trace_operation!(span_names::FILTER_RECOMPUTE, active = compiled.active).entered();

        self.highlights.clear();
        let mut pass = FilterPass {
            active: compiled.active,
            ..FilterPass::default()
        };
        self.style_matching_nodes(roots, &compiled, expansion, &mut pass);

        if !compiled.active
            && let Some(saved) = self.saved_expansion.take()
        {
            *expansion = saved;
            expansion.prune_missing(roots);
            for key in stay_open {
                for node in locate_ancestor_chain(key, roots).unwrap_or_default() {
                    expansion.expand(node.key.clone());
                }
            }
        }

        debug!(
            visible = pass.visible,
            hidden = pass.hidden,
            highlighted = self.highlights.len(),
            "Filter pass complete"
        );
        pass
    }

    fn compile_filters(&self) -> CompiledFilters {
        let global_text = self.filter(GLOBAL);
        let global_source = if self.is_active(GLOBAL, global_text) {
            sanitize(global_text).into_owned()
        } else {
            String::new()
        };
        let global = compile(&global_source);

        let fields = self
            .props
            .iter()
            .filter(|(field, _)| !self.filter(field).is_empty() || global.is_some())
            .map(|(field, props)| {
                let text = self.filter(field);
                let filtered = self.is_active(field, text);
                let field_source = if filtered {
                    comma_to_pattern(text, props.min_length, props.strict)
                } else {
                    String::new()
                };
                CompiledField {
                    field: field.clone(),
                    pattern: compile(&field_source),
                    predicate: props.predicate.clone(),
                    filtered,
                    highlight: compile(&combine(&[&global_source, &field_source])),
                }
            })
            .collect();

        CompiledFilters {
            global,
            fields,
            active: self.is_filtering(),
        }
    }

    // Returns true if any node in `nodes` stays visible.
    fn style_matching_nodes(
        &mut self,
        nodes: &mut [TreeNode],
        compiled: &CompiledFilters,
        expansion: &mut ExpansionState,
        pass: &mut FilterPass,
    ) -> bool {
        let mut any_visible = false;

        for node in nodes {
            let node_match = self.highlight_matching_values(node, compiled);
            let child_match =
                self.style_matching_nodes(&mut node.children, compiled, expansion, pass);

            let hidden = !node_match && !child_match;
            if hidden {
                expansion.remove(&node.key);
                node.add_class(&self.settings.filtered_out_class);
                pass.hidden += 1;
            } else {
                if child_match && compiled.active {
                    expansion.expand(node.key.clone());
                }
                node.remove_class(&self.settings.filtered_out_class);
                pass.visible += 1;
                any_visible = true;
            }
        }

        any_visible
    }

    // Evaluates the node's own fields and records their highlights.
    fn highlight_matching_values(&mut self, node: &TreeNode, compiled: &CompiledFilters) -> bool {
        let mut all_fields_matched = true;
        let mut any_global_matched = compiled.global.is_none();

        for field in &compiled.fields {
            let text = node.field_text(&field.field);

            if let Some(global) = &compiled.global
                && global.is_match(&text)
            {
                any_global_matched = true;
            }

            let field_matched = if field.filtered {
                match (&field.predicate, &field.pattern) {
                    (Some(predicate), _) => predicate(text.as_str()),
                    (None, Some(pattern)) => pattern.is_match(&text),
                    (None, None) => true,
                }
            } else {
                true
            };

            if let Some(highlight) = &field.highlight
                && highlight.is_match(&text)
            {
                let marked = mark_matches(&text, highlight, &self.settings.highlight_class);
                self.highlights.insert(&node.key, &field.field, marked);
            }

            all_fields_matched = all_fields_matched && field_matched;
        }

        all_fields_matched && any_global_matched
    }
}
