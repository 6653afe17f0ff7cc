//! Filtering and match highlighting
//!
//! - [`FilterEngine`] - debounced multi-field filter over the tree
//! - [`HighlightProjection`] - derived highlighted text per node and field
//! - [`pattern`] - filter text to regex conversion

mod engine;
pub mod highlight;
pub mod pattern;

pub use engine::{FilterEngine, FilterPass, GLOBAL};
pub use highlight::{HighlightProjection, escape_html, mark_matches};
pub use pattern::{FieldPredicate, FieldProps, comma_to_pattern};
