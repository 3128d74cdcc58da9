//! Builds the registry of tools the CLI can reach.

use std::path::Path;

use anyhow::{Context, Result};
use dropbox::{DropboxClient, DropboxConfig};
use toolbox_core::{Config, ToolRegistry};
use tracing::debug;

/// Loads configuration and registers every bundled tool.
///
/// An explicit `config_path` must exist; otherwise the usual search path is
/// used and a missing file falls back to defaults. `staging_dir` overrides the
/// Dropbox staging directory from the file.
pub fn build_registry(config_path: Option<&Path>, staging_dir: Option<&Path>) -> Result<ToolRegistry> {
    let config = match config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load_resolved()
            .context("failed to load toolbox config")?
            .unwrap_or_default(),
    };

    register_tools(&config, staging_dir)
}

fn register_tools(config: &Config, staging_dir: Option<&Path>) -> Result<ToolRegistry> {
    let mut dropbox_config =
        DropboxConfig::from_config(config).context("invalid [tools.dropbox] configuration")?;
    if let Some(dir) = staging_dir {
        dropbox_config = dropbox_config.with_staging_dir(dir);
    }
    debug!(staging_dir = %dropbox_config.staging_dir.display(), "Configured Dropbox tools");

    let client = DropboxClient::new(&dropbox_config).context("failed to create Dropbox client")?;

    let mut registry = ToolRegistry::new();
    dropbox::register(&mut registry, &client).context("failed to register Dropbox tools")?;
    Ok(registry)
}
