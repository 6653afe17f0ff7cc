//! Tree node model.
//!
//! A [`TreeNode`] carries a unique key, an open field map used by filtering
//! and highlighting, its ordered children and a space-separated display class
//! string the renderer reads to apply transient styles.

use std::collections::BTreeMap;

use serde_json::Value;

/// A node in the tree table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeNode {
    /// Key, unique across the whole tree
    pub key: String,
    /// Field name → value, rendered as table columns
    pub data: BTreeMap<String, Value>,
    /// Ordered children (empty for a leaf)
    pub children: Vec<Self>,
    /// Space-separated display classes
    pub style_class: String,
}

impl TreeNode {
    /// Creates a leaf node with no data
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Sets a data field
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(field.into(), value.into());
        self
    }

    /// Sets the children
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// Returns true if the node has at least one child
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the display text of a data field
    ///
    /// Strings are returned verbatim, `null` and missing fields as an empty
    /// string, anything else in its JSON form.
    #[must_use]
    pub fn field_text(&self, field: &str) -> String {
        match self.data.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Returns true if the display class list contains `class`
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.style_class.split_whitespace().any(|c| c == class)
    }

    /// Adds `class` to the display class list if absent
    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() || self.has_class(class) {
            return;
        }
        if !self.style_class.is_empty() {
            self.style_class.push(' ');
        }
        self.style_class.push_str(class);
    }

    /// Removes every occurrence of `class` from the display class list
    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        self.style_class = self
            .style_class
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
    }
}
