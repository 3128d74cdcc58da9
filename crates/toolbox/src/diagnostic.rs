//! Diagnostic events and the sinks that receive them.

use std::{
    fmt,
    sync::{Mutex, PoisonError},
};

use tracing::Level;

/// A single structured diagnostic event.
///
/// Events carry a severity, a human-readable message, and an ordered list of
/// key/value fields. Field values are rendered to strings when the event is
/// built so sinks never need to know the original types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(Level::DEBUG, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::INFO, message)
    }

    #[must_use]
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Level::WARN, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::ERROR, message)
    }

    /// Appends a field, rendering `value` with its `Display` implementation.
    #[must_use]
    pub fn with_field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    /// Returns the first value recorded under `key`.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Destination for diagnostic events emitted during a tool call.
///
/// Implementations must be cheap to call and must not fail; a sink that
/// cannot deliver an event drops it.
pub trait DiagnosticSink: Send + Sync + fmt::Debug {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` subscriber installed by the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let fields = FieldList(&diagnostic.fields);
        let message = diagnostic.message.as_str();
        match diagnostic.level {
            Level::ERROR => tracing::error!(fields = %fields, "{message}"),
            Level::WARN => tracing::warn!(fields = %fields, "{message}"),
            Level::INFO => tracing::info!(fields = %fields, "{message}"),
            Level::DEBUG => tracing::debug!(fields = %fields, "{message}"),
            _ => tracing::trace!(fields = %fields, "{message}"),
        }
    }
}

/// Renders fields as `key=value` pairs separated by spaces.
struct FieldList<'a>(&'a [(&'static str, String)]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Keeps every event in memory, in emission order.
///
/// Useful for asserting on the diagnostics a handler produced.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}
