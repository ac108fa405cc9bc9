//! Leveled, context-labelled diagnostics.
//!
//! Every loader invocation carries its own [`Diagnostics`] value. It applies the
//! caller's [`LogLevel`] threshold before anything reaches `tracing`, so a page
//! embedding several loaders can keep one of them quiet without touching the
//! global subscriber.
//!
//! # Example
//!
//! ```
//! use umbed_core::{Diagnostics, LogLevel};
//!
//! let diagnostics = Diagnostics::new(LogLevel::Info, Some("widget"));
//! diagnostics.info("inserting 2 element(s) into document head");
//! diagnostics.debug("not emitted, below threshold");
//! ```

use core::fmt;

use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// LogLevel
// ─────────────────────────────────────────────────────────────────────────────

/// Diagnostic verbosity threshold.
///
/// Ordered from most to least verbose; [`LogLevel::None`] silences everything.
/// Deserializes from `"debug" | "info" | "warn" | "error" | "none"`; any other
/// string falls back to the default [`LogLevel::Warn`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "String")]
pub enum LogLevel {
    /// Everything, including per-element bookkeeping.
    Debug,
    /// Progress messages.
    Info,
    /// Skipped or suspicious work (default).
    #[default]
    Warn,
    /// Failures that abort an invocation or indicate a configuration conflict.
    Error,
    /// No diagnostics at all.
    None,
}

impl LogLevel {
    /// Parses a level name, returning `None` for unknown names.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    /// Returns the label used in diagnostic output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARNING",
            Self::Error => "ERROR",
            Self::None => "",
        }
    }
}

impl From<String> for LogLevel {
    fn from(name: String) -> Self {
        Self::parse(&name).unwrap_or_default()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Diagnostics
// ─────────────────────────────────────────────────────────────────────────────

/// Per-invocation diagnostic emitter.
///
/// Messages at or above the threshold are forwarded to `tracing` with a
/// `context` field (the caller's `log_context`) and, when set, an `operation`
/// field naming the step that produced them.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    threshold: LogLevel,
    context: String,
    operation: Option<&'static str>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(LogLevel::default(), None::<String>)
    }
}

impl Diagnostics {
    /// Context label used when the caller supplies none.
    pub const DEFAULT_CONTEXT: &'static str = "UMbed";

    /// Creates diagnostics with the given threshold and optional context label.
    #[must_use]
    pub fn new(threshold: LogLevel, context: Option<impl Into<String>>) -> Self {
        Self {
            threshold,
            context: context
                .map(Into::into)
                .unwrap_or_else(|| Self::DEFAULT_CONTEXT.to_string()),
            operation: None,
        }
    }

    /// Returns a copy that tags every message with `operation`.
    #[must_use]
    pub fn scoped(&self, operation: &'static str) -> Self {
        Self {
            operation: Some(operation),
            ..self.clone()
        }
    }

    /// Returns the configured threshold.
    #[must_use]
    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    /// Returns the context label.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Returns `true` if a message at `level` would be emitted.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::None && level >= self.threshold
    }

    /// Emits a debug-level message.
    pub fn debug(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Debug, message);
    }

    /// Emits an info-level message.
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Info, message);
    }

    /// Emits a warning.
    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Warn, message);
    }

    /// Emits an error-level message.
    pub fn error(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Error, message);
    }

    /// Emits `message` at `level` if it passes the threshold.
    pub fn emit(&self, level: LogLevel, message: impl fmt::Display) {
        if !self.enabled(level) {
            return;
        }

        let context = self.context.as_str();
        let operation = self.operation.unwrap_or("");
        match level {
            LogLevel::Debug => tracing::debug!(context, operation, "{message}"),
            LogLevel::Info => tracing::info!(context, operation, "{message}"),
            LogLevel::Warn => tracing::warn!(context, operation, "{message}"),
            LogLevel::Error => tracing::error!(context, operation, "{message}"),
            LogLevel::None => {}
        }
    }
}
