//! Direct invocation of tool handlers.
//!
//! The host server normally drives tool handlers from its own dispatch loop.
//! [`invoke`] runs a handler without that loop, which is how tools are
//! smoke-tested from the CLI and from tests.

use std::{fmt, future::Future, sync::Arc};

use crate::{
    context::Context,
    diagnostic::{Diagnostic, DiagnosticSink},
};

/// Errors returned by [`invoke`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum InvokeError {
    /// The handler itself returned an error, kept as the source.
    #[error("failed to call {label}")]
    Handler {
        label: String,
        #[source]
        source: anyhow::Error,
    },
}

impl InvokeError {
    /// The diagnostic label the failing handler was invoked under.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Handler { label, .. } => label,
        }
    }
}

/// Calls `handler` directly with a fresh [`Context`] bound to `sink`.
///
/// The handler runs inline on the current task. Exactly one start event is
/// emitted before the call, followed by exactly one success or failure event.
/// The success event carries the output rendered with `Debug`. Arguments are
/// passed through untouched; any validation is the handler's business.
///
/// # Errors
///
/// Returns [`InvokeError::Handler`] wrapping the handler's error together with
/// `label` when the handler fails.
pub async fn invoke<I, O, F, Fut>(
    sink: Arc<dyn DiagnosticSink>,
    label: &str,
    input: I,
    handler: F,
) -> Result<O, InvokeError>
where
    F: FnOnce(Context, I) -> Fut,
    Fut: Future<Output = anyhow::Result<O>>,
    O: fmt::Debug,
{
    let ctx = Context::new(sink);
    let events = ctx.clone();

    events.emit(Diagnostic::info("calling handler directly").with_field("handler", label));

    match handler(ctx, input).await {
        Ok(output) => {
            events.emit(
                Diagnostic::info("handler call succeeded")
                    .with_field("handler", label)
                    .with_field("result", format_args!("{output:?}")),
            );
            Ok(output)
        }
        Err(source) => {
            events.emit(
                Diagnostic::error("handler call failed")
                    .with_field("handler", label)
                    .with_field("error", format_args!("{source:#}")),
            );
            Err(InvokeError::Handler {
                label: label.to_string(),
                source,
            })
        }
    }
}
