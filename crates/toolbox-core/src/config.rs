//! Configuration file resolution for the toolbox.
//!
//! # Resolution Algorithm
//!
//! `toolbox.toml` is located with the following precedence:
//!
//! 1. `TOOLBOX_CONFIG_PATH` environment variable
//! 2. Current directory
//! 3. Parent directories (walk up to filesystem root)
//! 4. XDG config directory (`~/.config/toolbox/toolbox.toml`)
//!
//! A missing file is not an error: callers fall back to defaults.
//!
//! # Example
//!
//! ```toml
//! [tools.dropbox]
//! token_env = "DROPBOX_API_KEY"
//! staging_dir = "/srv/agent/dropbox"
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

/// File name searched for during resolution.
pub const CONFIG_FILE_NAME: &str = "toolbox.toml";

/// Environment variable that points at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "TOOLBOX_CONFIG_PATH";

/// Errors that can occur during configuration resolution or loading.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// I/O error when reading a config file.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error when a config file or tool section is malformed.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file not found.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
}

/// Project configuration from `toolbox.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Per-tool settings keyed by tool crate name (`[tools.dropbox]`).
    ///
    /// Sections are kept as raw tables; each tool crate deserializes its own
    /// section with [`Config::tool_section`].
    #[serde(default)]
    pub tools: BTreeMap<String, toml::Table>,
}

impl Config {
    /// Loads and parses a config file from the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist,
    /// [`ConfigError::Io`] if it cannot be read, and [`ConfigError::Parse`] if
    /// it is not valid TOML of the expected shape.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads the config using the resolution algorithm.
    ///
    /// Returns `Ok(None)` when no config file exists anywhere on the search
    /// path.
    ///
    /// # Errors
    ///
    /// Returns `Err(ConfigError)` if a config file was found but could not be
    /// read or parsed.
    pub fn load_resolved() -> Result<Option<Self>, ConfigError> {
        let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let current = std::env::current_dir().ok();
        let xdg_path = dirs::config_dir().map(|dir| dir.join("toolbox").join(CONFIG_FILE_NAME));

        match resolve_path(env_path, current.as_deref(), xdg_path) {
            Some(path) => {
                debug!(path = %path.display(), "Loading toolbox config");
                Self::load(&path).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Creates an empty config with no tool sections.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Deserializes the `[tools.<name>]` section into `T`.
    ///
    /// A missing section yields `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the section does not match `T`.
    pub fn tool_section<T>(&self, name: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        match self.tools.get(name) {
            Some(table) => Ok(toml::Value::Table(table.clone()).try_into()?),
            None => Ok(T::default()),
        }
    }
}

/// Picks the config file path following the documented precedence.
///
/// An explicit override wins only when it points at an existing file.
fn resolve_path(
    env_override: Option<PathBuf>,
    start_dir: Option<&Path>,
    xdg_path: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = env_override
        && path.exists()
    {
        return Some(path);
    }

    if let Some(start) = start_dir {
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    xdg_path.filter(|path| path.is_file())
}
