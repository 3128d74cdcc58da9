//! Header-carried download metadata.
//!
//! Content endpoints return the raw file bytes as the body and the file's
//! metadata as JSON in the `Dropbox-API-Result` response header.

use bytes::Bytes;
use reqwest::header::HeaderMap;

use crate::{error::DropboxError, types::FileMetadata};

pub const API_RESULT_HEADER: &str = "dropbox-api-result";

/// A downloaded file: metadata from the header, bytes from the body.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub metadata: FileMetadata,
    pub content: Bytes,
}

/// Decodes [`FileMetadata`] from the `Dropbox-API-Result` header.
///
/// # Errors
///
/// - [`DropboxError::MissingMetadata`] if the header is absent or blank
/// - [`DropboxError::InvalidHeader`] if the header is not visible ASCII
/// - [`DropboxError::Decode`] if the header is not metadata JSON
pub fn extract(operation: &'static str, headers: &HeaderMap) -> Result<FileMetadata, DropboxError> {
    let value = headers
        .get(API_RESULT_HEADER)
        .ok_or(DropboxError::MissingMetadata { operation })?;
    let text = value
        .to_str()
        .map_err(|source| DropboxError::InvalidHeader { operation, source })?;
    if text.trim().is_empty() {
        return Err(DropboxError::MissingMetadata { operation });
    }

    serde_json::from_str(text).map_err(|source| DropboxError::Decode { operation, source })
}
