//! # Toolbox Tool SDK
//!
//! This crate provides the pieces a tool crate needs to expose async tools to
//! an agent host, and a harness for invoking those tools directly when
//! smoke-testing them outside the host's dispatch loop.
//!
//! ## Defining a Tool
//!
//! Tools are async functions with the shape:
//!
//! ```ignore
//! async fn my_tool(ctx: &Context, input: MyInput) -> Result<MyOutput> {
//!     // ...
//! }
//! ```
//!
//! and are registered with a `ToolRegistry` (see the `toolbox-core` crate),
//! which erases the input and output types behind a uniform JSON interface.
//!
//! The `Result` type is re-exported from `anyhow` and expands to `Result<T,
//! anyhow::Error>`. Typed errors returned through it stay reachable with
//! `anyhow::Error::downcast_ref`.
//!
//! ## Context
//!
//! The [`Context`] parameter carries the diagnostic sink for the call. Tools
//! report progress through [`Context::info`] and friends; the sink decides
//! where those events end up ([`TracingSink`] forwards them to `tracing`,
//! [`RecordingSink`] keeps them in memory for assertions).
//!
//! ## Direct Invocation
//!
//! [`invoke`] calls any `(Context, I) -> Result<O>` handler inline, bracketing
//! the call with start and success/failure diagnostics:
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let output = toolbox::invoke(
//!     Arc::new(toolbox::TracingSink),
//!     "dropbox.list_folder",
//!     input,
//!     |ctx, input| async move { list_folder(&client, &ctx, input).await },
//! )
//! .await?;
//! ```

mod context;
mod diagnostic;
mod invoke;

pub use anyhow::{self, Result, bail, ensure};
pub use context::Context;
pub use diagnostic::{Diagnostic, DiagnosticSink, RecordingSink, TracingSink};
pub use invoke::{InvokeError, invoke};
// Full schemars re-export required because JsonSchema derive macro generates
// code referencing `schemars::*` paths directly.
pub use schemars;
pub use schemars::JsonSchema;
pub use tracing::{Level, debug, error, info, span, trace, warn};
