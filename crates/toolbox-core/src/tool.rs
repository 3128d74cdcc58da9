//! Tool registry and type-erased tool handles.
//!
//! # Architecture
//!
//! The tool system is built around three types:
//!
//! - [`ToolRegistry`]: maps qualified tool IDs to handles
//! - [`ToolHandle`]: runtime handle for invoking a specific tool
//! - [`ToolInfo`]: immutable metadata describing a tool's interface
//!
//! Tools are registered with their concrete input and output types. The
//! registry derives JSON schemas for both and wraps the handler in a closure
//! that decodes `serde_json::Value` input into the input type, awaits the
//! handler, and encodes the output back to a `Value`. Callers therefore invoke
//! every tool through the same `call(Context, Value)` shape without any
//! runtime dispatch on tool names.
//!
//! # Thread Safety
//!
//! Registration takes `&mut self`; register every tool before wrapping the
//! registry in [`Arc`]. After that, [`ToolRegistry::get`],
//! [`ToolRegistry::list`] and [`ToolRegistry::call`] may run concurrently.

use std::{collections::BTreeMap, future::Future, sync::Arc};

use futures::{FutureExt, future::BoxFuture};
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use toolbox::Context;
use tracing::{Instrument, info, info_span};

/// Errors that can occur during tool registry operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// A tool with the given qualified ID was not found in the registry.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Attempted to register a tool with a qualified ID that already exists.
    #[error("duplicate tool ID: {0}")]
    DuplicateId(String),

    /// The JSON input could not be decoded into the tool's input type.
    #[error("invalid input for {tool}: {source}")]
    InvalidInput {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    /// A schema or tool output could not be encoded as JSON.
    #[error("failed to encode {what} for {tool}: {source}")]
    Serialization {
        tool: String,
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Static description supplied when registering a tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolMeta {
    /// Qualified identifier (format: `crate-name.tool-name`).
    pub id: &'static str,
    /// Human-readable display name.
    pub name: &'static str,
    /// What the tool does and when to use it.
    pub description: &'static str,
}

/// Immutable metadata describing a registered tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    /// Qualified identifier (format: `crate-name.tool-name`)
    pub id: String,
    /// Human-readable display name
    pub display_name: String,
    /// Detailed description of the tool's purpose
    pub description: String,
    /// JSON Schema for the tool's input
    pub input_schema: String,
    /// JSON Schema describing the tool's output
    pub output_schema: String,
}

type ErasedHandler =
    Box<dyn Fn(Context, Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// Runtime handle for invoking a specific tool.
pub struct ToolHandle {
    info: ToolInfo,
    handler: ErasedHandler,
}

impl std::fmt::Debug for ToolHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolHandle")
            .field("id", &self.info.id)
            .finish_non_exhaustive()
    }
}

impl ToolHandle {
    /// Returns a reference to this tool's metadata.
    #[must_use]
    pub fn info(&self) -> &ToolInfo {
        &self.info
    }

    /// Invokes the tool with JSON input.
    ///
    /// The returned future is `'static` and runs inside a `tool_call` span
    /// tagged with the tool ID. Input decoding failures surface as
    /// [`RegistryError::InvalidInput`]; handler failures are passed through
    /// unchanged so typed errors stay downcastable.
    pub fn call(&self, ctx: Context, input: Value) -> BoxFuture<'static, anyhow::Result<Value>> {
        let span = info_span!("tool_call", tool_id = %self.info.id);
        (self.handler)(ctx, input).instrument(span).boxed()
    }
}

/// Central registry mapping qualified tool IDs to handles.
///
/// # Example
///
/// ```ignore
/// use toolbox_core::{ToolMeta, ToolRegistry};
///
/// let mut registry = ToolRegistry::new();
/// registry.register(
///     ToolMeta { id: "demo.echo", name: "Echo", description: "Echoes input." },
///     |_ctx, input: EchoInput| async move { Ok(EchoOutput { echo: input.message }) },
/// )?;
///
/// for info in registry.list() {
///     println!("{}: {}", info.id, info.description);
/// }
/// ```
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<ToolHandle>>,
}

impl ToolRegistry {
    /// Creates a new, empty tool registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `meta.id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] if the ID is already taken, or
    /// [`RegistryError::Serialization`] if a schema cannot be encoded.
    pub fn register<I, O, F, Fut>(&mut self, meta: ToolMeta, handler: F) -> Result<(), RegistryError>
    where
        I: DeserializeOwned + JsonSchema + Send + 'static,
        O: Serialize + JsonSchema + Send + 'static,
        F: Fn(Context, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
    {
        if self.tools.contains_key(meta.id) {
            return Err(RegistryError::DuplicateId(meta.id.to_string()));
        }

        let info = ToolInfo {
            id: meta.id.to_string(),
            display_name: meta.name.to_string(),
            description: meta.description.to_string(),
            input_schema: encode_schema(meta.id, "input schema", &schemars::schema_for!(I))?,
            output_schema: encode_schema(meta.id, "output schema", &schemars::schema_for!(O))?,
        };

        let tool_id = meta.id;
        let handler: ErasedHandler = Box::new(
            move |ctx: Context, input: Value| -> BoxFuture<'static, anyhow::Result<Value>> {
                match serde_json::from_value::<I>(input) {
                    Ok(input) => {
                        let fut = handler(ctx, input);
                        async move {
                            let output = fut.await?;
                            let value = serde_json::to_value(output).map_err(|source| {
                                RegistryError::Serialization {
                                    tool: tool_id.to_string(),
                                    what: "output",
                                    source,
                                }
                            })?;
                            Ok::<Value, anyhow::Error>(value)
                        }
                        .boxed()
                    }
                    Err(source) => {
                        let err = RegistryError::InvalidInput {
                            tool: tool_id.to_string(),
                            source,
                        };
                        async move { Err::<Value, anyhow::Error>(err.into()) }.boxed()
                    }
                }
            },
        );

        info!(tool_id = %meta.id, "Registered tool");
        self.tools
            .insert(meta.id.to_string(), Arc::new(ToolHandle { info, handler }));
        Ok(())
    }

    /// Looks up a tool by qualified ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<ToolHandle>> {
        self.tools.get(id).cloned()
    }

    /// Iterates over registered tools in ID order.
    pub fn list(&self) -> impl Iterator<Item = &ToolInfo> {
        self.tools.values().map(|handle| handle.info())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invokes the tool registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for an unknown ID, and otherwise
    /// whatever [`ToolHandle::call`] returns.
    pub async fn call(&self, id: &str, ctx: Context, input: Value) -> anyhow::Result<Value> {
        let handle = self
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        handle.call(ctx, input).await
    }
}

fn encode_schema(
    tool: &str,
    what: &'static str,
    schema: &schemars::Schema,
) -> Result<String, RegistryError> {
    serde_json::to_string(schema).map_err(|source| RegistryError::Serialization {
        tool: tool.to_string(),
        what,
        source,
    })
}
