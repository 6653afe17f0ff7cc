//! Highlighted-text projection.
//!
//! The projection is derived data: it maps a node key and field to the field's
//! display text with every match wrapped in a `<mark>` element. It is rebuilt
//! from scratch on each filter pass and never written back to the nodes.
//!
//! Projected text is markup: field values are HTML-escaped before the marks
//! are added, so a host can render it as HTML directly.

use std::borrow::Cow;
use std::collections::HashMap;

use regex::Regex;

/// Node key → field → highlighted text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightProjection {
    entries: HashMap<String, HashMap<String, String>>,
}

impl HighlightProjection {
    /// Creates an empty projection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlighted text of `field` on node `key`, if projected
    #[must_use]
    pub fn get(&self, key: &str, field: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }

    /// All projected fields of node `key`
    #[must_use]
    pub fn fields(&self, key: &str) -> Option<&HashMap<String, String>> {
        self.entries.get(key)
    }

    /// Stores the highlighted text of `field` on node `key`
    pub fn insert(&mut self, key: &str, field: &str, text: String) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), text);
    }

    /// Drops every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of projected nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is projected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Escapes `&`, `<`, `>`, `"` and `'` for use in HTML text or attributes
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Wraps every non-empty match of `regex` in `text` with a marker element
///
/// Matching runs on the raw text; the text between and inside matches is
/// escaped on output.
#[must_use]
pub fn mark_matches(text: &str, regex: &Regex, class: &str) -> String {
    let class = escape_html(class);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for found in regex.find_iter(text).filter(|m| !m.is_empty()) {
        out.push_str(&escape_html(&text[last..found.start()]));
        out.push_str(r#"<mark class=""#);
        out.push_str(&class);
        out.push_str(r#"">"#);
        out.push_str(&escape_html(found.as_str()));
        out.push_str("</mark>");
        last = found.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}
