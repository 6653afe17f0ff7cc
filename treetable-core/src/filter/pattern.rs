//! Filter text to regular expression conversion.
//!
//! Filter text is treated as a case-insensitive regular expression. Field
//! filters additionally support comma-separated alternatives, optionally
//! anchored at the start of the value. Text that does not parse as a regular
//! expression is matched literally instead.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use regex::{Regex, RegexBuilder};

/// Custom match predicate for a field, called with the field's display text
pub type FieldPredicate = Rc<dyn Fn(&str) -> bool>;

/// Registered properties of a filterable field
#[derive(Clone, Default)]
pub struct FieldProps {
    /// Minimum filter length before the field filter takes effect
    pub min_length: usize,
    /// Anchor every alternative at the start of the value
    pub strict: bool,
    /// Replaces the regex test when set
    pub predicate: Option<FieldPredicate>,
}

impl FieldProps {
    /// Creates properties with the given minimum length and strict mode
    #[must_use]
    pub fn new(min_length: usize, strict: bool) -> Self {
        Self {
            min_length,
            strict,
            predicate: None,
        }
    }

    /// Sets a custom predicate
    #[must_use]
    pub fn with_predicate(mut self, predicate: impl Fn(&str) -> bool + 'static) -> Self {
        self.predicate = Some(Rc::new(predicate));
        self
    }
}

impl fmt::Debug for FieldProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldProps")
            .field("min_length", &self.min_length)
            .field("strict", &self.strict)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

/// Returns `pattern` if it is a valid regex, its escaped form otherwise
#[must_use]
pub fn sanitize(pattern: &str) -> Cow<'_, str> {
    if Regex::new(pattern).is_ok() {
        Cow::Borrowed(pattern)
    } else {
        Cow::Owned(regex::escape(pattern))
    }
}

/// Turns comma-separated filter text into a regex alternation
///
/// Leading whitespace of each alternative is dropped, empty alternatives and
/// those shorter than `min_length` are skipped, and in `strict` mode each
/// alternative is anchored with `^`. Returns an empty string when nothing
/// is left.
#[must_use]
pub fn comma_to_pattern(text: &str, min_length: usize, strict: bool) -> String {
    text.split(',')
        .map(str::trim_start)
        .filter(|alt| !alt.is_empty() && alt.chars().count() >= min_length)
        .map(|alt| {
            let alt = sanitize(alt);
            if strict {
                format!("^{alt}")
            } else {
                alt.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Joins non-empty patterns into one alternation
#[must_use]
pub fn combine(patterns: &[&str]) -> String {
    patterns
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| format!("(?:{p})"))
        .collect::<Vec<_>>()
        .join("|")
}

/// Compiles a case-insensitive regex, `None` for an empty pattern
#[must_use]
pub fn compile(pattern: &str) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    let pattern = sanitize(pattern);
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()
}
