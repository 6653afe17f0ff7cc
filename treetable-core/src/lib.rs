//! `TreeTable` Core Library
//!
//! This crate provides the interaction engine behind a hierarchical tree-table:
//! locating nodes, relocating them by drag and drop, debounced multi-field
//! filtering with match highlighting, and deferred collapse transitions.
//! It has no rendering of its own; a host feeds it gestures and time and reads
//! back nodes, expansion state, CSS classes and highlighted text.
//!
//! # Crate Structure
//!
//! - [`models`] - Tree nodes and expansion state
//! - [`locator`] - Key lookup with ancestor chains and index paths
//! - [`drag_drop`] - Move engine, drop-zone calculation and drag gesture state
//! - [`filter`] - Debounced filter engine and highlight projection
//! - [`expander`] - Deferred collapse transitions
//! - [`timers`] - Host-driven timer queue
//! - [`view`] - The [`TreeView`] facade tying everything together
//! - [`driver`] - Optional tokio driver for the timer queue
//! - [`config`] - Settings loaded from TOML
//! - [`tracing`] - Spans and the optional `[logging]` subscriber

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod drag_drop;
pub mod driver;
pub mod error;
pub mod expander;
pub mod filter;
pub mod locator;
pub mod models;
pub mod timers;
pub mod tracing;
pub mod view;

// =============================================================================
// Convenience re-exports
//
// Flat re-exports used by the property and integration tests. Library code
// imports via modular paths.
// =============================================================================

pub use config::{DragSettings, ExpanderSettings, FilterSettings, TreeViewSettings};
pub use drag_drop::{
    DragController, DragState, DropConfig, DropPosition, LandingPosition, MoveOutcome,
    MoveRejection, calculate_drop_position, move_node, validate_move,
};
pub use driver::drive_until_idle;
pub use error::{ConfigError, ConfigResult, TreeError, TreeResult};
pub use expander::{CollapseAnimator, TransitionState};
pub use filter::{
    FieldPredicate, FieldProps, FilterEngine, FilterPass, GLOBAL, HighlightProjection,
    comma_to_pattern, escape_html, mark_matches,
};
pub use locator::{
    Location, NodePath, is_descendant, is_last_child, locate, locate_ancestor_chain, locate_path,
};
pub use models::{ExpansionState, TreeNode};
pub use timers::{TimerEvent, TimerQueue, TimerToken};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, init_tracing,
    is_tracing_initialized, span_names,
};
pub use view::TreeView;
