//! Configuration for the tree view
//!
//! This module provides [`TreeViewSettings`], loaded from TOML, with the
//! animation, drag-and-drop and filter tuning knobs.

mod settings;

pub use settings::{
    DEFAULT_COLLAPSE_DURATION_MS, DEFAULT_COLLAPSING_CLASS, DEFAULT_DRAG_EXPAND_DELAY_MS,
    DEFAULT_DROP_HIGHLIGHT_DURATION_MS, DEFAULT_DROP_ZONE_RATIO, DEFAULT_EXPAND_DURATION_MS,
    DEFAULT_FAST_DEBOUNCE_MS, DEFAULT_FILTERED_OUT_CLASS, DEFAULT_HIGHLIGHT_CLASS,
    DEFAULT_MAX_NODE_HEIGHT, DEFAULT_MIN_GLOBAL_FILTER_LENGTH, DEFAULT_SLOW_DEBOUNCE_MS,
    DragSettings, ExpanderSettings, FilterSettings, TreeViewSettings,
};
