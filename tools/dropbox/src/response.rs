//! Classification of raw Dropbox responses.

use reqwest::{Response, StatusCode};
use toolbox::debug;

use crate::error::{ApiError, DropboxError};

/// Passes a `200 OK` response through and turns anything else into an error.
///
/// Only status 200 counts as success; other 2xx codes are treated as failures
/// because no Dropbox RPC or content endpoint used here returns them. On
/// failure the body is drained and kept verbatim, with a parsed copy when it is
/// valid JSON.
///
/// # Errors
///
/// Returns [`DropboxError::Remote`] for non-200 statuses and
/// [`DropboxError::Network`] if the error body cannot be read.
pub async fn classify(operation: &'static str, response: Response) -> Result<Response, DropboxError> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }

    let raw_body = response
        .text()
        .await
        .map_err(|source| DropboxError::Network { operation, source })?;
    debug!(operation, status = status.as_u16(), "Dropbox request failed");

    Err(DropboxError::Remote {
        operation,
        error: ApiError::from_body(status.as_u16(), raw_body),
    })
}
