//! Node lookup inside the tree.
//!
//! All functions here are pure reads over a root sequence. Lookups return
//! freshly built result records; nothing is accumulated across sibling
//! calls, so a failed branch never leaks into the chain of a later one.
//!
//! Correctness relies on node keys being unique across the tree: the first
//! depth-first match wins.

use std::collections::HashSet;

use crate::models::TreeNode;

/// Index path from the root sequence down to a node
///
/// `[2, 0]` is the first child of the third root-level node.
pub type NodePath = Vec<usize>;

/// A located node together with its ancestors
#[derive(Debug, Clone)]
pub struct Location<'a> {
    /// The node itself
    pub node: &'a TreeNode,
    /// Ancestors ordered from the nearest parent up to the root-level node
    pub ancestors: Vec<&'a TreeNode>,
}

impl<'a> Location<'a> {
    /// The immediate parent, `None` for a root-level node
    #[must_use]
    pub fn parent(&self) -> Option<&'a TreeNode> {
        self.ancestors.first().copied()
    }

    /// Depth of the node, 1 for root-level nodes
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestors.len() + 1
    }
}

/// Finds `key` and its ancestor chain (nearest parent first)
#[must_use]
pub fn locate<'a>(key: &str, roots: &'a [TreeNode]) -> Option<Location<'a>> {
    let mut chain = find_chain_reversed(key, roots)?;
    let node = chain.remove(0);
    Some(Location {
        node,
        ancestors: chain,
    })
}

/// Finds the root-first chain of nodes leading to `key`, ending with the node
///
/// Used when every ancestor of a node must be expanded.
#[must_use]
pub fn locate_ancestor_chain<'a>(key: &str, roots: &'a [TreeNode]) -> Option<Vec<&'a TreeNode>> {
    let mut chain = find_chain_reversed(key, roots)?;
    chain.reverse();
    Some(chain)
}

// Node first, then ancestors nearest-first.
fn find_chain_reversed<'a>(key: &str, nodes: &'a [TreeNode]) -> Option<Vec<&'a TreeNode>> {
    for node in nodes {
        if node.key == key {
            return Some(vec![node]);
        }
        if let Some(mut chain) = find_chain_reversed(key, &node.children) {
            chain.push(node);
            return Some(chain);
        }
    }
    None
}

/// Finds the index path of `key`
#[must_use]
pub fn locate_path(key: &str, roots: &[TreeNode]) -> Option<NodePath> {
    for (index, node) in roots.iter().enumerate() {
        if node.key == key {
            return Some(vec![index]);
        }
        if let Some(mut rest) = locate_path(key, &node.children) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

/// Resolves an index path to a node
#[must_use]
pub fn node_at_path<'a>(roots: &'a [TreeNode], path: &[usize]) -> Option<&'a TreeNode> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get(*first)?;
    for index in rest {
        node = node.children.get(*index)?;
    }
    Some(node)
}

/// Resolves an index path to a mutable node
#[must_use]
pub fn node_at_path_mut<'a>(roots: &'a mut [TreeNode], path: &[usize]) -> Option<&'a mut TreeNode> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get_mut(*first)?;
    for index in rest {
        node = node.children.get_mut(*index)?;
    }
    Some(node)
}

/// Returns the sibling collection that holds the node at `path`
///
/// For a root-level path this is the root sequence itself.
#[must_use]
pub fn siblings_at_mut<'a>(
    roots: &'a mut Vec<TreeNode>,
    path: &[usize],
) -> Option<&'a mut Vec<TreeNode>> {
    let (_, parent_path) = path.split_last()?;
    if parent_path.is_empty() {
        return Some(roots);
    }
    node_at_path_mut(roots, parent_path).map(|parent| &mut parent.children)
}

/// Returns true if `key` appears anywhere below `ancestor`
///
/// The ancestor itself does not count.
#[must_use]
pub fn is_descendant(ancestor: &TreeNode, key: &str) -> bool {
    ancestor
        .children
        .iter()
        .any(|child| child.key == key || is_descendant(child, key))
}

/// Returns true if `key` is present anywhere in the tree
#[must_use]
pub fn contains_key(roots: &[TreeNode], key: &str) -> bool {
    roots
        .iter()
        .any(|node| node.key == key || contains_key(&node.children, key))
}

/// Collects every key in the tree
#[must_use]
pub fn collect_keys(roots: &[TreeNode]) -> HashSet<&str> {
    let mut keys = HashSet::new();
    let mut stack: Vec<&TreeNode> = roots.iter().collect();
    while let Some(node) = stack.pop() {
        keys.insert(node.key.as_str());
        stack.extend(node.children.iter());
    }
    keys
}

/// Returns true if `node` is the last child of `parent`
///
/// A parent without children reports true, so renderers can close the
/// connector line unconditionally.
#[must_use]
pub fn is_last_child(node: &TreeNode, parent: &TreeNode) -> bool {
    parent
        .children
        .last()
        .is_none_or(|last| last.key == node.key)
}
