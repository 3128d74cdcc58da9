//! Authenticated HTTP client for the Dropbox v2 API.

use std::path::{Path, PathBuf};

use reqwest::{Request, Url, header::CONTENT_TYPE};
use serde_json::{Value, json};
use toolbox::debug;

use crate::{
    config::{Credential, CredentialSource, DropboxConfig},
    error::DropboxError,
    metadata::{self, DownloadedFile},
    path, response,
    types::ListFolderResponse,
};

const LIST_FOLDER: &str = "files/list_folder";
const DOWNLOAD: &str = "files/download";

/// Request header carrying the JSON argument of content endpoints.
pub const API_ARG_HEADER: &str = "dropbox-api-arg";

/// A configured Dropbox client.
///
/// Cheap to clone and immutable. Each operation resolves the credential,
/// builds one request, sends it, and classifies the response.
#[derive(Debug, Clone)]
pub struct DropboxClient {
    http: reqwest::Client,
    api_base: Url,
    content_base: Url,
    credentials: CredentialSource,
    staging_dir: PathBuf,
}

impl DropboxClient {
    /// Creates a client with a default `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::InvalidUrl`] if a base URL cannot be parsed.
    pub fn new(config: &DropboxConfig) -> Result<Self, DropboxError> {
        Self::with_http(reqwest::Client::new(), config)
    }

    /// Creates a client around a caller-supplied HTTP client, for example one
    /// with timeouts or a proxy configured.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::InvalidUrl`] if a base URL cannot be parsed.
    pub fn with_http(http: reqwest::Client, config: &DropboxConfig) -> Result<Self, DropboxError> {
        Ok(Self {
            http,
            api_base: parse_base(&config.api_base_url)?,
            content_base: parse_base(&config.content_base_url)?,
            credentials: config.credentials.clone(),
            staging_dir: config.staging_dir.clone(),
        })
    }

    /// Directory downloads are persisted into.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    fn api_url(&self, endpoint: &str) -> Result<Url, DropboxError> {
        join(&self.api_base, endpoint)
    }

    fn content_url(&self, endpoint: &str) -> Result<Url, DropboxError> {
        join(&self.content_base, endpoint)
    }

    /// Builds the `files/list_folder` request for an already-normalized path.
    ///
    /// The listing flags are fixed: non-recursive, deleted entries excluded,
    /// media info plus mounted and non-downloadable files included.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::InvalidUrl`] or [`DropboxError::Network`] if the
    /// request cannot be assembled.
    pub fn list_folder_request(
        &self,
        path: &str,
        credential: &Credential,
    ) -> Result<Request, DropboxError> {
        let body = json!({
            "path": path,
            "include_deleted": false,
            "include_has_explicit_shared_members": false,
            "include_media_info": true,
            "include_mounted_folders": true,
            "include_non_downloadable_files": true,
            "recursive": false,
        });

        self.http
            .post(self.api_url("/2/files/list_folder")?)
            .bearer_auth(credential.expose())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .build()
            .map_err(|source| DropboxError::Network {
                operation: LIST_FOLDER,
                source,
            })
    }

    /// Builds the `files/download` request.
    ///
    /// The body is empty; the path travels in the `Dropbox-API-Arg` header.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::Argument`] if `path` is empty or whitespace,
    /// otherwise the same errors as [`Self::list_folder_request`].
    pub fn download_request(
        &self,
        path: &str,
        credential: &Credential,
    ) -> Result<Request, DropboxError> {
        validate_download_path(path)?;

        self.http
            .post(self.content_url("/2/files/download")?)
            .bearer_auth(credential.expose())
            .header(API_ARG_HEADER, header_safe_json(&json!({ "path": path })))
            .build()
            .map_err(|source| DropboxError::Network {
                operation: DOWNLOAD,
                source,
            })
    }

    /// Lists the immediate children of `path`.
    ///
    /// Root spellings (`""`, `"/"`, `"."`) are normalized before sending.
    /// Only the first page is fetched; `has_more` and `cursor` are returned
    /// as reported.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::Configuration`] if no credential is available
    /// (no request is sent), [`DropboxError::Network`] or
    /// [`DropboxError::Remote`] for transport and API failures, and
    /// [`DropboxError::Decode`] if the body is not a listing.
    pub async fn list_folder(&self, path: &str) -> Result<ListFolderResponse, DropboxError> {
        let path = path::normalize(path);
        let credential = self.credentials.resolve()?;
        let request = self.list_folder_request(path, &credential)?;

        debug!(operation = LIST_FOLDER, path, "Sending Dropbox request");
        let response = self.send(LIST_FOLDER, request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|source| DropboxError::Network {
                operation: LIST_FOLDER,
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| DropboxError::Decode {
            operation: LIST_FOLDER,
            source,
        })
    }

    /// Downloads the file at `path`.
    ///
    /// Metadata is read from the `Dropbox-API-Result` header only; the body is
    /// kept as opaque bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::Argument`] for an empty path and
    /// [`DropboxError::Configuration`] for a missing credential, both before
    /// any request is sent. Afterwards, [`DropboxError::Network`],
    /// [`DropboxError::Remote`], [`DropboxError::MissingMetadata`],
    /// [`DropboxError::InvalidHeader`] or [`DropboxError::Decode`].
    pub async fn download(&self, path: &str) -> Result<DownloadedFile, DropboxError> {
        validate_download_path(path)?;
        let credential = self.credentials.resolve()?;
        let request = self.download_request(path, &credential)?;

        debug!(operation = DOWNLOAD, path, "Sending Dropbox request");
        let response = self.send(DOWNLOAD, request).await?;
        let metadata = metadata::extract(DOWNLOAD, response.headers())?;
        let content = response
            .bytes()
            .await
            .map_err(|source| DropboxError::Network {
                operation: DOWNLOAD,
                source,
            })?;

        Ok(DownloadedFile { metadata, content })
    }

    async fn send(
        &self,
        operation: &'static str,
        request: Request,
    ) -> Result<reqwest::Response, DropboxError> {
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| DropboxError::Network { operation, source })?;
        response::classify(operation, response).await
    }
}

fn validate_download_path(path: &str) -> Result<(), DropboxError> {
    if path.trim().is_empty() {
        return Err(DropboxError::Argument("path must not be empty".to_string()));
    }
    Ok(())
}

fn parse_base(url: &str) -> Result<Url, DropboxError> {
    Url::parse(url).map_err(|e| DropboxError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn join(base: &Url, endpoint: &str) -> Result<Url, DropboxError> {
    base.join(endpoint).map_err(|e| DropboxError::InvalidUrl {
        url: format!("{base}{endpoint}"),
        reason: e.to_string(),
    })
}

/// Serializes `value` as JSON that is safe to place in an HTTP header.
///
/// Every character outside printable ASCII is written as a `\uXXXX` escape
/// (as a surrogate pair above the BMP), which Dropbox requires for
/// `Dropbox-API-Arg`.
pub fn header_safe_json(value: &Value) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    let mut units = [0_u16; 2];
    for ch in raw.chars() {
        if ch.is_ascii() && ch != '\x7f' {
            out.push(ch);
        } else {
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}
