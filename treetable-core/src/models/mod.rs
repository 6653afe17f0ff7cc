//! Core data structures shared by the engines.

mod expansion;
mod node;

pub use expansion::ExpansionState;
pub use node::TreeNode;
