//! Core runtime pieces for the toolbox.
//!
//! # Key Components
//!
//! - **Tool Registry**: [`ToolRegistry`] maps qualified tool IDs to
//!   type-erased handles that all share the `call(Context, Value)` shape
//! - **Configuration**: [`Config`] locates and parses `toolbox.toml`, handing
//!   each tool crate its own `[tools.<name>]` section
//!
//! # Example
//!
//! ```ignore
//! use toolbox::Context;
//! use toolbox_core::{Config, ToolRegistry};
//!
//! let config = Config::load_resolved()?.unwrap_or_default();
//! let client = dropbox::DropboxClient::new(&dropbox::DropboxConfig::from_config(&config)?)?;
//! let mut registry = ToolRegistry::new();
//! dropbox::register(&mut registry, &client)?;
//!
//! let output = registry
//!     .call("dropbox.list_folder", Context::empty(), serde_json::json!({ "path": "" }))
//!     .await?;
//! ```

mod config;
mod tool;

pub use config::{CONFIG_FILE_NAME, CONFIG_PATH_ENV, Config, ConfigError};
pub use tool::{RegistryError, ToolHandle, ToolInfo, ToolMeta, ToolRegistry};
