//! Error types for the Dropbox integration.

use std::{fmt, io, path::PathBuf};

use serde_json::Value;

/// A non-200 response from the Dropbox API.
///
/// The raw body is always kept. `parsed_json` is populated only when the body
/// was valid JSON, which is the case for Dropbox's structured endpoint errors
/// but not for proxy or gateway failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub raw_body: String,
    pub parsed_json: Option<Value>,
}

impl ApiError {
    /// Builds an `ApiError` from a drained response body.
    #[must_use]
    pub fn from_body(status: u16, raw_body: String) -> Self {
        let parsed_json = serde_json::from_str(&raw_body).ok();
        Self {
            status,
            raw_body,
            parsed_json,
        }
    }

    /// The `error_summary` field Dropbox includes in structured errors.
    #[must_use]
    pub fn error_summary(&self) -> Option<&str> {
        self.parsed_json.as_ref()?.get("error_summary")?.as_str()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_summary() {
            Some(summary) => write!(f, "HTTP {} {summary}", self.status),
            None => write!(f, "HTTP {} {}", self.status, self.raw_body),
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors produced by [`crate::DropboxClient`] and the tool functions.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DropboxError {
    /// The caller supplied an unusable argument. Raised before any I/O.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The credential or client configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not be sent or the response could not be read.
    #[error("Dropbox {operation} request failed: {source}")]
    Network {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Dropbox answered with a status other than 200. The API error is part
    /// of the message rather than a separate cause.
    #[error("Dropbox {operation} failed: {error}")]
    Remote {
        operation: &'static str,
        error: ApiError,
    },

    /// A response body or metadata header was not the expected JSON.
    #[error("failed to decode Dropbox {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The metadata header contained bytes that are not visible ASCII.
    #[error("Dropbox {operation} metadata header is not valid text: {source}")]
    InvalidHeader {
        operation: &'static str,
        #[source]
        source: reqwest::header::ToStrError,
    },

    #[error("Dropbox {operation} response is missing the Dropbox-API-Result header")]
    MissingMetadata { operation: &'static str },

    #[error("failed to {operation} {}: {source}", .path.display())]
    Filesystem {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid Dropbox base URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl DropboxError {
    /// Returns the API error for [`DropboxError::Remote`].
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Remote { error, .. } => Some(error),
            _ => None,
        }
    }
}
