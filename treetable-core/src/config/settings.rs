//! Tree view settings
//!
//! Settings are grouped the way the engines consume them. Every field has a
//! serde default, so a partial TOML document only overrides what it names.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::tracing::TracingConfig;

/// Default collapse animation duration in milliseconds
pub const DEFAULT_COLLAPSE_DURATION_MS: u64 = 200;
/// Default expand animation duration in milliseconds
pub const DEFAULT_EXPAND_DURATION_MS: u64 = 300;
/// Default max height of an expanding row (CSS length)
pub const DEFAULT_MAX_NODE_HEIGHT: &str = "100px";
/// Default class added to rows playing their close animation
pub const DEFAULT_COLLAPSING_CLASS: &str = "expander-node-collapsed";
/// Default hover delay before a collapsed drop target auto-expands
pub const DEFAULT_DRAG_EXPAND_DELAY_MS: u64 = 1000;
/// Default duration of the landed highlight after a drop
pub const DEFAULT_DROP_HIGHLIGHT_DURATION_MS: u64 = 1000;
/// Default share of the row height used for before/after drop zones
pub const DEFAULT_DROP_ZONE_RATIO: f64 = 0.25;
/// Default minimum length of the global filter text
pub const DEFAULT_MIN_GLOBAL_FILTER_LENGTH: usize = 2;
/// Default debounce while a search is narrowing
pub const DEFAULT_FAST_DEBOUNCE_MS: u64 = 150;
/// Default debounce for short or cleared input
pub const DEFAULT_SLOW_DEBOUNCE_MS: u64 = 500;
/// Default class added to rows hidden by a filter
pub const DEFAULT_FILTERED_OUT_CLASS: &str = "filtered-out";
/// Default class of the highlight marker element
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "filter-highlight";

/// All tree view settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeViewSettings {
    /// Expand/collapse transition settings
    pub expander: ExpanderSettings,
    /// Drag-and-drop settings
    pub drag: DragSettings,
    /// Filter and highlight settings
    pub filter: FilterSettings,
    /// Subscriber settings for [`init_tracing`](crate::tracing::init_tracing)
    pub logging: TracingConfig,
}

/// Expand/collapse transition settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpanderSettings {
    /// How long a collapsing subtree stays visible, in milliseconds
    pub collapse_duration_ms: u64,
    /// Expand animation duration for the renderer, in milliseconds
    pub expand_duration_ms: u64,
    /// Max height an expanding row grows to (CSS length)
    pub max_node_height: String,
    /// Class marking rows that are playing their close animation
    pub collapsing_class: String,
}

impl Default for ExpanderSettings {
    fn default() -> Self {
        Self {
            collapse_duration_ms: DEFAULT_COLLAPSE_DURATION_MS,
            expand_duration_ms: DEFAULT_EXPAND_DURATION_MS,
            max_node_height: DEFAULT_MAX_NODE_HEIGHT.to_string(),
            collapsing_class: DEFAULT_COLLAPSING_CLASS.to_string(),
        }
    }
}

impl ExpanderSettings {
    /// Collapse duration as a [`Duration`]
    #[must_use]
    pub const fn collapse_duration(&self) -> Duration {
        Duration::from_millis(self.collapse_duration_ms)
    }

    /// Expand duration as a [`Duration`]
    #[must_use]
    pub const fn expand_duration(&self) -> Duration {
        Duration::from_millis(self.expand_duration_ms)
    }
}

/// Drag-and-drop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    /// Hover time before a collapsed drop target toggles open, in milliseconds
    pub expand_delay_ms: u64,
    /// How long the landed highlight stays after a drop, in milliseconds
    pub drop_highlight_duration_ms: u64,
    /// Share of the row height used for the before and after zones
    pub drop_zone_ratio: f64,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            expand_delay_ms: DEFAULT_DRAG_EXPAND_DELAY_MS,
            drop_highlight_duration_ms: DEFAULT_DROP_HIGHLIGHT_DURATION_MS,
            drop_zone_ratio: DEFAULT_DROP_ZONE_RATIO,
        }
    }
}

impl DragSettings {
    /// Drag-expand delay as a [`Duration`]
    #[must_use]
    pub const fn expand_delay(&self) -> Duration {
        Duration::from_millis(self.expand_delay_ms)
    }

    /// Landed highlight duration as a [`Duration`]
    #[must_use]
    pub const fn drop_highlight_duration(&self) -> Duration {
        Duration::from_millis(self.drop_highlight_duration_ms)
    }
}

/// Filter and highlight settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Minimum length before the global filter text takes effect
    pub min_global_length: usize,
    /// Debounce used when some filter value is longer than `min_global_length`
    pub fast_debounce_ms: u64,
    /// Debounce used otherwise
    pub slow_debounce_ms: u64,
    /// Class added to rows hidden by the filter
    pub filtered_out_class: String,
    /// Class of the `<mark>` element wrapping matches
    pub highlight_class: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            min_global_length: DEFAULT_MIN_GLOBAL_FILTER_LENGTH,
            fast_debounce_ms: DEFAULT_FAST_DEBOUNCE_MS,
            slow_debounce_ms: DEFAULT_SLOW_DEBOUNCE_MS,
            filtered_out_class: DEFAULT_FILTERED_OUT_CLASS.to_string(),
            highlight_class: DEFAULT_HIGHLIGHT_CLASS.to_string(),
        }
    }
}

impl FilterSettings {
    /// Fast debounce as a [`Duration`]
    #[must_use]
    pub const fn fast_debounce(&self) -> Duration {
        Duration::from_millis(self.fast_debounce_ms)
    }

    /// Slow debounce as a [`Duration`]
    #[must_use]
    pub const fn slow_debounce(&self) -> Duration {
        Duration::from_millis(self.slow_debounce_ms)
    }
}

impl TreeViewSettings {
    /// Parses settings from a TOML document and validates them
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Validation`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every value is usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        let durations = [
            ("expander.collapse_duration_ms", self.expander.collapse_duration_ms),
            ("expander.expand_duration_ms", self.expander.expand_duration_ms),
            ("drag.expand_delay_ms", self.drag.expand_delay_ms),
            ("drag.drop_highlight_duration_ms", self.drag.drop_highlight_duration_ms),
            ("filter.fast_debounce_ms", self.filter.fast_debounce_ms),
            ("filter.slow_debounce_ms", self.filter.slow_debounce_ms),
        ];
        for (field, value) in durations {
            if value == 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }

        if !(self.drag.drop_zone_ratio > 0.0 && self.drag.drop_zone_ratio <= 0.5) {
            return Err(invalid(
                "drag.drop_zone_ratio",
                format!("{} is outside (0, 0.5]", self.drag.drop_zone_ratio),
            ));
        }

        if self.expander.max_node_height.trim().is_empty() {
            return Err(invalid("expander.max_node_height", "must not be empty"));
        }

        let classes = [
            ("expander.collapsing_class", &self.expander.collapsing_class),
            ("filter.filtered_out_class", &self.filter.filtered_out_class),
            ("filter.highlight_class", &self.filter.highlight_class),
        ];
        for (field, class) in classes {
            if class.is_empty() || class.contains(char::is_whitespace) {
                return Err(invalid(field, "must be a single non-empty class name"));
            }
        }

        if let Err(err) = self.logging.env_filter() {
            return Err(invalid("logging.filter", err.to_string()));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        reason: reason.into(),
    }
}
