//! Structured logging
//!
//! The engines emit `tracing` spans around moves, filter passes, settled
//! collapses and timer dispatch, plus debug events for rejected gestures.
//! Hosts with their own subscriber get those for free. Hosts without one can
//! install a `tracing-subscriber` pipeline from the `[logging]` section of
//! [`TreeViewSettings`](crate::config::TreeViewSettings).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Set once a subscriber has been installed by [`init_tracing`]
static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Errors raised while installing the subscriber
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TracingError {
    /// Unknown level name
    #[error("Unknown log level '{0}'")]
    InvalidLevel(String),

    /// The filter directive does not parse
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// Directive as configured
        directive: String,
        /// Parser message
        reason: String,
    },

    /// Another subscriber is already installed
    #[error("Tracing has already been initialized")]
    AlreadyInitialized,

    /// The log file could not be opened
    #[error("Failed to create log file: {0}")]
    FileCreationFailed(String),
}

/// Result type for tracing setup
pub type TracingResult<T> = Result<T, TracingError>;

/// Verbosity of the crate's own events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    #[default]
    Warn,
    /// Spans around moves, filter passes and settled collapses
    Info,
    /// Rejected gestures, scheduled passes and fired timers
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl FromStr for TracingLevel {
    type Err = TracingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(TracingError::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingOutput {
    /// Standard output
    Stdout,
    /// Standard error
    #[default]
    Stderr,
    /// A file, truncated on startup; written without ANSI colours
    File(PathBuf),
}

/// The `[logging]` settings section
///
/// ```toml
/// [logging]
/// level = "debug"
/// output = { file = "tree.log" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Level applied to `treetable_core` targets
    pub level: TracingLevel,
    /// Output destination
    pub output: TracingOutput,
    /// Print the emitting thread id
    pub thread_ids: bool,
    /// Full `EnvFilter` directive, replacing `level` when set
    pub filter: Option<String>,
}

impl TracingConfig {
    /// Effective filter directive
    #[must_use]
    pub fn filter_directive(&self) -> String {
        self.filter
            .clone()
            .unwrap_or_else(|| format!("treetable_core={}", self.level))
    }

    /// Parses the effective filter directive
    ///
    /// # Errors
    ///
    /// Returns [`TracingError::InvalidFilter`] if the directive does not parse.
    pub fn env_filter(&self) -> TracingResult<EnvFilter> {
        let directive = self.filter_directive();
        EnvFilter::try_new(&directive).map_err(|e| TracingError::InvalidFilter {
            directive,
            reason: e.to_string(),
        })
    }
}

/// Installs a global subscriber built from `config`
///
/// Only the first successful call installs anything. A failed call leaves
/// the crate uninitialized so it can be retried with a corrected config.
///
/// # Errors
///
/// Returns an error if:
/// - A subscriber was already installed
/// - The filter directive does not parse
/// - File output is configured but the file cannot be created
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if TRACING_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(TracingError::AlreadyInitialized);
    }

    let result = install(config);
    if result.is_err() {
        TRACING_INITIALIZED.store(false, Ordering::SeqCst);
    }
    result
}

fn install(config: &TracingConfig) -> TracingResult<()> {
    let filter = config.env_filter()?;
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(config.thread_ids);
    let registry = tracing_subscriber::registry().with(filter);

    match &config.output {
        TracingOutput::Stdout => registry.with(layer.with_writer(std::io::stdout)).try_init(),
        TracingOutput::Stderr => registry.with(layer.with_writer(std::io::stderr)).try_init(),
        TracingOutput::File(path) => {
            let file = std::fs::File::create(path)
                .map_err(|e| TracingError::FileCreationFailed(format!("{}: {e}", path.display())))?;
            registry
                .with(layer.with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
        }
    }
    // A subscriber installed outside this crate
    .map_err(|_| TracingError::AlreadyInitialized)?;

    tracing::info!(level = %config.level, "Tracing initialized");
    Ok(())
}

/// Returns true once [`init_tracing`] has succeeded
#[must_use]
pub fn is_tracing_initialized() -> bool {
    TRACING_INITIALIZED.load(Ordering::SeqCst)
}

/// Opens an info-level span for one engine operation
///
/// ```ignore
/// let _span = trace_operation!(span_names::TREE_MOVE, node_key = %dragged).entered();
/// ```
#[macro_export]
macro_rules! trace_operation {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Debug-level variant of `trace_operation!` for frequent operations
#[macro_export]
macro_rules! trace_operation_debug {
    ($name:expr) => {
        tracing::debug_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::debug_span!($name, $($field)*)
    };
}

/// Span names emitted by the engines
pub mod span_names {
    /// Node relocation
    pub const TREE_MOVE: &str = "tree.move";
    /// Filter pass
    pub const FILTER_RECOMPUTE: &str = "filter.recompute";
    /// Settled collapse
    pub const EXPANSION_COLLAPSE: &str = "expansion.collapse";
    /// Timer dispatch
    pub const TIMERS_ADVANCE: &str = "timers.advance";
}
