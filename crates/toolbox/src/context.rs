//! Context for tool invocations.

use std::sync::Arc;

use crate::diagnostic::{Diagnostic, DiagnosticSink, TracingSink};

/// Per-call state handed to a tool handler.
///
/// The context is deliberately minimal: it carries only the diagnostic sink
/// the handler reports through. Credentials and endpoints belong to the tool's
/// own client, injected when the tool is registered.
#[derive(Debug, Clone)]
pub struct Context {
    sink: Arc<dyn DiagnosticSink>,
}

impl Context {
    #[must_use]
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// Creates a context that forwards diagnostics to `tracing`.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    #[must_use]
    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    pub fn emit(&self, diagnostic: Diagnostic) {
        self.sink.emit(diagnostic);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.emit(Diagnostic::debug(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(Diagnostic::info(message));
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(Diagnostic::warn(message));
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;
    use crate::diagnostic::RecordingSink;

    #[test]
    fn test_context_routes_diagnostics_to_its_sink() {
        // Arrange
        let sink = Arc::new(RecordingSink::new());
        let ctx = Context::new(sink.clone());

        // Act
        ctx.info("handling list_folder");
        ctx.warn("root path substituted");
        ctx.emit(Diagnostic::debug("request path").with_field("path", ""));

        // Assert
        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].level, Level::INFO);
        assert_eq!(events[0].message, "handling list_folder");
        assert_eq!(events[1].level, Level::WARN);
        assert_eq!(events[2].field("path"), Some(""));
    }

    #[test]
    fn test_cloned_context_shares_sink() {
        // Arrange
        let sink = Arc::new(RecordingSink::new());
        let original = Context::new(sink.clone());

        // Act
        let cloned = original.clone();
        original.debug("from original");
        cloned.debug("from clone");

        // Assert
        assert_eq!(sink.events().len(), 2);
        assert!(Arc::ptr_eq(original.sink(), cloned.sink()));
    }

    #[test]
    fn test_empty_context_debug_output_names_sink() {
        let debug = format!("{:?}", Context::empty());
        assert!(debug.contains("TracingSink"));
    }
}
