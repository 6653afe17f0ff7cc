//! Scenario tests over the tree view facade

mod drag_scenarios;
mod filter_scenarios;

use treetable_core::{TreeNode, TreeView, TreeViewSettings};

/// Two root nodes with two and one children
pub fn sample_view() -> TreeView {
    TreeView::new(
        vec![
            TreeNode::new("1")
                .with_field("name", "Fruits")
                .with_field("size", 2)
                .with_children(vec![
                    TreeNode::new("1.1")
                        .with_field("name", "Alpha")
                        .with_field("size", 10),
                    TreeNode::new("1.2")
                        .with_field("name", "Banana")
                        .with_field("size", 20),
                ]),
            TreeNode::new("2")
                .with_field("name", "Vegetables")
                .with_children(vec![
                    TreeNode::new("2.1")
                        .with_field("name", "Carrot")
                        .with_children(vec![TreeNode::new("2.1.1").with_field("name", "Baby carrot")]),
                ]),
        ],
        TreeViewSettings::default(),
    )
}

/// Child keys of `key` in order
pub fn child_keys(view: &TreeView, key: &str) -> Vec<String> {
    view.locate(key)
        .map(|found| found.node.children.iter().map(|c| c.key.clone()).collect())
        .unwrap_or_default()
}
