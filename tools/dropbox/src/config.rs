//! Dropbox client configuration and credential resolution.

use std::{fmt, path::PathBuf};

use serde::Deserialize;
use toolbox::debug;
use toolbox_core::Config;

use crate::error::DropboxError;

/// Environment variable the bearer token is read from by default.
pub const DEFAULT_TOKEN_ENV: &str = "DROPBOX_API_KEY";
pub const DEFAULT_API_BASE_URL: &str = "https://api.dropboxapi.com";
pub const DEFAULT_CONTENT_BASE_URL: &str = "https://content.dropboxapi.com";
/// Folder under the home directory used when no staging directory is set.
pub const DEFAULT_STAGING_DIR_NAME: &str = "dropbox-downloads";

/// Name of this tool's section in `toolbox.toml` (`[tools.dropbox]`).
pub const CONFIG_SECTION: &str = "dropbox";

/// An opaque Dropbox bearer token.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Where the bearer token comes from.
///
/// The source is resolved on every call; tokens are never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Read the named environment variable at call time.
    Env(String),
    /// A fixed token, typically injected by tests or an embedding host.
    Static(Credential),
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::Env(DEFAULT_TOKEN_ENV.to_string())
    }
}

impl CredentialSource {
    /// Resolves the current credential.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::Configuration`] if the environment variable is
    /// unset, not valid Unicode, or blank.
    pub fn resolve(&self) -> Result<Credential, DropboxError> {
        match self {
            Self::Env(var) => match std::env::var(var) {
                Ok(token) if !token.trim().is_empty() => {
                    debug!(env = %var, "Resolved Dropbox credential from environment");
                    Ok(Credential(token))
                }
                Ok(_) => Err(DropboxError::Configuration(format!(
                    "environment variable {var} is empty"
                ))),
                Err(_) => Err(DropboxError::Configuration(format!(
                    "environment variable {var} is not set"
                ))),
            },
            Self::Static(credential) => Ok(credential.clone()),
        }
    }
}

/// The `[tools.dropbox]` section of `toolbox.toml`.
///
/// Every key is optional; [`DropboxConfig::from_settings`] fills in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DropboxSettings {
    pub token_env: Option<String>,
    pub staging_dir: Option<PathBuf>,
    pub api_base_url: Option<String>,
    pub content_base_url: Option<String>,
}

/// Resolved configuration for a [`crate::DropboxClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropboxConfig {
    pub credentials: CredentialSource,
    /// Local directory downloads are persisted into.
    pub staging_dir: PathBuf,
    pub api_base_url: String,
    pub content_base_url: String,
}

impl DropboxConfig {
    /// Creates a config with the default credential source and endpoints.
    #[must_use]
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            credentials: CredentialSource::default(),
            staging_dir: staging_dir.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            content_base_url: DEFAULT_CONTENT_BASE_URL.to_string(),
        }
    }

    /// Reads the `[tools.dropbox]` section of a loaded toolbox config.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::Configuration`] if the section is malformed or
    /// no staging directory can be determined.
    pub fn from_config(config: &Config) -> Result<Self, DropboxError> {
        let settings: DropboxSettings = config
            .tool_section(CONFIG_SECTION)
            .map_err(|e| DropboxError::Configuration(format!("[tools.{CONFIG_SECTION}]: {e}")))?;
        Self::from_settings(settings)
    }

    /// Applies defaults to the optional settings.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::Configuration`] if `staging_dir` is unset and
    /// the home directory cannot be determined.
    pub fn from_settings(settings: DropboxSettings) -> Result<Self, DropboxError> {
        let staging_dir = match settings.staging_dir {
            Some(dir) => dir,
            None => default_staging_dir()?,
        };

        let mut config = Self::new(staging_dir);
        if let Some(var) = settings.token_env {
            config.credentials = CredentialSource::Env(var);
        }
        if let Some(url) = settings.api_base_url {
            config.api_base_url = url;
        }
        if let Some(url) = settings.content_base_url {
            config.content_base_url = url;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: CredentialSource) -> Self {
        self.credentials = credentials;
        self
    }

    #[must_use]
    pub fn with_staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }

    /// Points both endpoints at custom base URLs (for example a mock server).
    #[must_use]
    pub fn with_base_urls(mut self, api: impl Into<String>, content: impl Into<String>) -> Self {
        self.api_base_url = api.into();
        self.content_base_url = content.into();
        self
    }
}

fn default_staging_dir() -> Result<PathBuf, DropboxError> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_STAGING_DIR_NAME))
        .ok_or_else(|| {
            DropboxError::Configuration(
                "cannot determine home directory; set staging_dir in [tools.dropbox]".to_string(),
            )
        })
}
