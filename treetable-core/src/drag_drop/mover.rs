//! Structural relocation of a node inside the tree.
//!
//! A move takes the dragged node out of its sibling collection by value and
//! places it relative to the target. Illegal moves are not errors: they come
//! back as [`MoveOutcome::Rejected`] and leave the tree untouched.

use tracing::debug;

use super::DropPosition;
use crate::locator::{
    is_descendant, locate, locate_path, node_at_path, node_at_path_mut, siblings_at_mut,
};
use crate::models::{ExpansionState, TreeNode};
use crate::trace_operation;
use crate::tracing::span_names;

/// Why a move was turned into a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// The node was dropped on itself
    SameNode,
    /// The target lies inside the dragged subtree
    TargetIsDescendant,
    /// The dragged key is not in the tree
    DraggedNotFound,
    /// The target key is not in the tree
    TargetNotFound,
}

impl std::fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SameNode => write!(f, "node dropped on itself"),
            Self::TargetIsDescendant => write!(f, "target is a descendant of the dragged node"),
            Self::DraggedNotFound => write!(f, "dragged node not found"),
            Self::TargetNotFound => write!(f, "target node not found"),
        }
    }
}

/// Result of a move request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The node now lives under `parent` (root sequence when `None`) at `index`
    Moved {
        /// Key of the new parent
        parent: Option<String>,
        /// Index inside the new sibling collection
        index: usize,
    },
    /// Nothing changed
    Rejected(MoveRejection),
}

impl MoveOutcome {
    /// Returns true if the tree was changed
    #[must_use]
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Checks whether `dragged_key` may be dropped on `target_key`
///
/// # Errors
///
/// Returns the [`MoveRejection`] that would turn the move into a no-op.
pub fn validate_move(
    roots: &[TreeNode],
    dragged_key: &str,
    target_key: &str,
) -> Result<(), MoveRejection> {
    if dragged_key == target_key {
        return Err(MoveRejection::SameNode);
    }
    let dragged = locate(dragged_key, roots).ok_or(MoveRejection::DraggedNotFound)?;
    if is_descendant(dragged.node, target_key) {
        return Err(MoveRejection::TargetIsDescendant);
    }
    if locate(target_key, roots).is_none() {
        return Err(MoveRejection::TargetNotFound);
    }
    Ok(())
}

/// Moves `dragged_key` relative to `target_key`
///
/// For [`DropPosition::Child`] the node is appended to the target's children
/// and the target is marked expanded. For `Before`/`After` the target is
/// located again after the removal, since taking an earlier sibling out shifts
/// its index.
pub fn move_node(
    roots: &mut Vec<TreeNode>,
    expansion: &mut ExpansionState,
    dragged_key: &str,
    target_key: &str,
    position: DropPosition,
) -> MoveOutcome {
    let _span = trace_operation!(
        span_names::TREE_MOVE,
        node_key = %dragged_key,
        target_key = %target_key,
        position = %position
    )
    .entered();

    if let Err(reason) = validate_move(roots, dragged_key, target_key) {
        debug!(%reason, "Move rejected");
        return MoveOutcome::Rejected(reason);
    }

    let Some(source_path) = locate_path(dragged_key, roots) else {
        return MoveOutcome::Rejected(MoveRejection::DraggedNotFound);
    };
    let Some(node) = take_node(roots, &source_path) else {
        return MoveOutcome::Rejected(MoveRejection::DraggedNotFound);
    };

    let Some(target_path) = locate_path(target_key, roots) else {
        // Unreachable after validation; put the node back rather than lose it
        restore_node(roots, &source_path, node);
        return MoveOutcome::Rejected(MoveRejection::TargetNotFound);
    };

    let outcome = match position {
        DropPosition::Child => {
            let Some(target) = node_at_path_mut(roots, &target_path) else {
                restore_node(roots, &source_path, node);
                return MoveOutcome::Rejected(MoveRejection::TargetNotFound);
            };
            target.children.push(node);
            let index = target.children.len() - 1;
            expansion.expand(target_key);
            MoveOutcome::Moved {
                parent: Some(target_key.to_string()),
                index,
            }
        }
        DropPosition::Before | DropPosition::After => {
            let parent = parent_key(roots, &target_path);
            let target_index = target_path.last().copied().unwrap_or_default();
            let index = if position == DropPosition::After {
                target_index + 1
            } else {
                target_index
            };
            let Some(siblings) = siblings_at_mut(roots, &target_path) else {
                restore_node(roots, &source_path, node);
                return MoveOutcome::Rejected(MoveRejection::TargetNotFound);
            };
            siblings.insert(index, node);
            MoveOutcome::Moved { parent, index }
        }
    };

    debug!(?outcome, "Node moved");
    outcome
}

fn take_node(roots: &mut Vec<TreeNode>, path: &[usize]) -> Option<TreeNode> {
    let index = *path.last()?;
    let siblings = siblings_at_mut(roots, path)?;
    (index < siblings.len()).then(|| siblings.remove(index))
}

fn restore_node(roots: &mut Vec<TreeNode>, path: &[usize], node: TreeNode) {
    let index = path.last().copied().unwrap_or_default();
    if let Some(siblings) = siblings_at_mut(roots, path) {
        let index = index.min(siblings.len());
        siblings.insert(index, node);
    }
}

fn parent_key(roots: &[TreeNode], path: &[usize]) -> Option<String> {
    let (_, parent_path) = path.split_last()?;
    node_at_path(roots, parent_path).map(|parent| parent.key.clone())
}
