//! Drag-and-drop relocation of tree nodes
//!
//! This module holds the pure model behind dragging rows around the tree:
//! where a pointer lands inside a row ([`calculate_drop_position`]), the
//! structural move itself ([`move_node`]) and the gesture state machine that
//! drives it ([`DragController`]). None of it touches the rendering layer.

mod controller;
mod mover;

pub use controller::{DragController, DragState, LandingPosition};
pub use mover::{MoveOutcome, MoveRejection, move_node, validate_move};

use crate::config::DragSettings;

/// Drop position relative to a target node
///
/// Determines where a dragged node will be placed relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    /// Insert before the target, as its previous sibling
    Before,
    /// Insert after the target, as its next sibling
    After,
    /// Append as the target's last child
    Child,
}

impl std::fmt::Display for DropPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
            Self::Child => write!(f, "child"),
        }
    }
}

/// Configuration for drop position calculation
#[derive(Debug, Clone, Copy)]
pub struct DropConfig {
    /// Height of the hovered row in pixels
    pub row_height: f64,
    /// Ratio of row height for before/after zones (e.g., 0.25 = top/bottom 25%)
    pub drop_zone_ratio: f64,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            row_height: 32.0,
            drop_zone_ratio: crate::config::DEFAULT_DROP_ZONE_RATIO,
        }
    }
}

impl DropConfig {
    /// Builds a configuration for a row of `row_height` using the drag settings
    #[must_use]
    pub const fn for_row(row_height: f64, settings: &DragSettings) -> Self {
        Self {
            row_height,
            drop_zone_ratio: settings.drop_zone_ratio,
        }
    }
}

/// Calculates the drop position based on Y coordinate within a row
///
/// The row is divided into three zones:
/// - Top zone (`drop_zone_ratio`): Before
/// - Middle zone: Child
/// - Bottom zone (`drop_zone_ratio`): After
///
/// Every node can accept children, so the middle zone is always available.
#[must_use]
pub fn calculate_drop_position(y_in_row: f64, config: &DropConfig) -> DropPosition {
    let drop_zone_size = config.row_height * config.drop_zone_ratio;

    if y_in_row < drop_zone_size {
        DropPosition::Before
    } else if y_in_row > config.row_height - drop_zone_size {
        DropPosition::After
    } else {
        DropPosition::Child
    }
}
