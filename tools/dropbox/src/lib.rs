//! Dropbox integration for the toolbox.
//!
//! This integration provides tools for interacting with Dropbox file storage:
//! - List the contents of a folder
//! - Download a file into the local staging directory
//!
//! Both tools share one [`DropboxClient`], which is built from
//! [`DropboxConfig`] and handed to [`register`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use toolbox::{Context, Diagnostic, JsonSchema, Result, schemars};
use toolbox_core::{RegistryError, ToolMeta, ToolRegistry};

mod client;
mod config;
mod error;
mod metadata;
mod path;
mod persist;
mod response;
mod types;

pub use client::{API_ARG_HEADER, DropboxClient, header_safe_json};
pub use config::{
    CONFIG_SECTION, Credential, CredentialSource, DEFAULT_API_BASE_URL, DEFAULT_CONTENT_BASE_URL,
    DEFAULT_STAGING_DIR_NAME, DEFAULT_TOKEN_ENV, DropboxConfig, DropboxSettings,
};
pub use error::{ApiError, DropboxError};
pub use metadata::{API_RESULT_HEADER, DownloadedFile, extract as extract_metadata};
pub use path::normalize;
pub use persist::persist;
pub use response::classify;
pub use types::{
    FileLockInfo, FileMetadata, FolderEntry, ListFolderResponse, PropertyField, PropertyGroup,
    SharingInfo,
};

pub const LIST_FOLDER: ToolMeta = ToolMeta {
    id: "dropbox.list_folder",
    name: "List Dropbox Folder",
    description: "Lists the files and folders directly inside a Dropbox folder. \
                  Use an empty path, \"/\" or \".\" for the root folder.",
};

pub const DOWNLOAD: ToolMeta = ToolMeta {
    id: "dropbox.download",
    name: "Download Dropbox File",
    description: "Downloads a Dropbox file into the local staging directory and \
                  returns its metadata together with the local path.",
};

/// Registers every Dropbox tool with `registry`, sharing `client`.
///
/// # Errors
///
/// Returns [`RegistryError`] if a Dropbox tool is already registered.
pub fn register(registry: &mut ToolRegistry, client: &DropboxClient) -> Result<(), RegistryError> {
    let list_client = client.clone();
    registry.register(LIST_FOLDER, move |ctx: Context, input: ListFolderInput| {
        let client = list_client.clone();
        async move { list_folder(&client, &ctx, input).await }
    })?;

    let download_client = client.clone();
    registry.register(DOWNLOAD, move |ctx: Context, input: DownloadInput| {
        let client = download_client.clone();
        async move { download(&client, &ctx, input).await }
    })?;

    Ok(())
}

// ============================================================================
// List Folder Tool
// ============================================================================

/// Input for listing a Dropbox folder.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListFolderInput {
    /// The folder to list (e.g., "/Documents"). Empty, "/" or "." mean the
    /// root folder.
    #[serde(default)]
    pub path: String,
}

/// Output from the list folder tool.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ListFolderOutput {
    /// Entries in the order Dropbox returned them.
    pub entries: Vec<FolderEntry>,
    /// Whether Dropbox holds more entries than this page.
    pub has_more: bool,
    /// Cursor for fetching the next page, as reported by Dropbox.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// # List Dropbox Folder
///
/// Lists the files and folders directly inside a Dropbox folder. Use this tool
/// when the user wants to see what a folder contains before downloading
/// something from it.
///
/// The listing is not recursive and excludes deleted entries. Entries are
/// returned exactly as Dropbox orders them. Only the first page is fetched;
/// `has_more` reports whether Dropbox truncated the listing.
///
/// # Errors
///
/// Returns an error if:
/// - The credential environment variable is not set
/// - The HTTP request fails or returns a status other than 200
/// - The response body is not a folder listing
pub async fn list_folder(
    client: &DropboxClient,
    ctx: &Context,
    input: ListFolderInput,
) -> Result<ListFolderOutput> {
    let ListFolderInput { path } = input;
    if path::substitutes_root(&path) {
        ctx.emit(Diagnostic::debug("substituting root folder for path").with_field("path", &path));
    }

    ctx.emit(Diagnostic::debug("requesting Dropbox folder listing").with_field("path", &path));
    let listing = client.list_folder(&path).await?;
    ctx.emit(
        Diagnostic::info("listed Dropbox folder")
            .with_field("path", &path)
            .with_field("entries", listing.entries.len())
            .with_field("has_more", listing.has_more),
    );

    Ok(ListFolderOutput {
        entries: listing.entries,
        has_more: listing.has_more,
        cursor: listing.cursor,
    })
}

// ============================================================================
// Download Tool
// ============================================================================

/// Input for downloading a file from Dropbox.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DownloadInput {
    /// The file path in Dropbox (e.g., "/Documents/report.pdf").
    pub path: String,
}

/// Output from the download tool.
#[derive(Debug, Serialize, JsonSchema)]
pub struct DownloadOutput {
    /// Metadata for the downloaded file.
    pub metadata: FileMetadata,
    /// Where the file content was written.
    pub local_path: PathBuf,
}

/// # Download Dropbox File
///
/// Downloads a file from Dropbox and writes it into the configured staging
/// directory under its Dropbox file name. Use this tool when the user wants to
/// work with the actual content of a file from their Dropbox.
///
/// An existing file with the same name in the staging directory is replaced.
/// The output includes comprehensive file metadata (size, revision,
/// modification dates, content hash) and the local path of the written file.
///
/// # Errors
///
/// Returns an error if:
/// - The `path` is empty or contains only whitespace
/// - The credential environment variable is not set
/// - The HTTP request fails or returns a status other than 200
/// - The `Dropbox-API-Result` header is missing or cannot be parsed
/// - The file cannot be written to the staging directory
///
/// The write runs on the blocking thread pool.
pub async fn download(
    client: &DropboxClient,
    ctx: &Context,
    input: DownloadInput,
) -> Result<DownloadOutput> {
    let DownloadInput { path } = input;
    ctx.emit(Diagnostic::debug("requesting Dropbox file").with_field("path", &path));
    let DownloadedFile { metadata, content } = client.download(&path).await?;
    ctx.emit(
        Diagnostic::info("downloaded Dropbox file")
            .with_field("name", &metadata.name)
            .with_field("bytes", content.len()),
    );

    let staging_dir = client.staging_dir().to_path_buf();
    let name = metadata.name.clone();
    let local_path =
        tokio::task::spawn_blocking(move || persist::persist(&staging_dir, &name, &content))
            .await??;

    ctx.emit(
        Diagnostic::info("saved Dropbox file")
            .with_field("path", &path)
            .with_field("local_path", local_path.display()),
    );

    Ok(DownloadOutput {
        metadata,
        local_path,
    })
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use serde_json::json;
    use tempfile::TempDir;
    use toolbox::{InvokeError, RecordingSink, invoke};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path as url_path},
    };

    use super::*;

    fn test_client(server: &MockServer, staging_dir: &std::path::Path) -> DropboxClient {
        let config = DropboxConfig::new(staging_dir)
            .with_credentials(CredentialSource::Static(Credential::new("test-token")))
            .with_base_urls(server.uri(), server.uri());
        DropboxClient::new(&config).unwrap()
    }

    #[test]
    fn test_list_folder_input_defaults_to_root() {
        let input: ListFolderInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.path, "");
    }

    #[tokio::test]
    async fn test_download_empty_path_returns_error() {
        // Arrange
        let server = MockServer::start().await;
        let staging = TempDir::new().unwrap();
        let client = test_client(&server, staging.path());

        // Act
        let result = download(
            &client,
            &Context::empty(),
            DownloadInput {
                path: "   ".to_string(),
            },
        )
        .await;

        // Assert
        let err = result.unwrap_err();
        assert!(err.to_string().contains("path must not be empty"));
        assert!(matches!(
            err.downcast_ref::<DropboxError>(),
            Some(DropboxError::Argument(_))
        ));
    }

    #[tokio::test]
    async fn test_list_folder_root_spelling_emits_diagnostic() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(url_path("/2/files/list_folder"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"entries":[{"id":"a","name":"A","path_display":"/A",".tag":"folder"}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        let staging = TempDir::new().unwrap();
        let client = test_client(&server, staging.path());
        let sink = Arc::new(RecordingSink::new());

        // Act
        let output = list_folder(
            &client,
            &Context::new(sink.clone()),
            ListFolderInput {
                path: ".".to_string(),
            },
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(output.entries.len(), 1);
        assert_eq!(output.entries[0].tag, "folder");
        assert!(!output.has_more);
        let events = sink.events();
        let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "substituting root folder for path",
                "requesting Dropbox folder listing",
                "listed Dropbox folder",
            ]
        );
        assert_eq!(events[0].field("path"), Some("."));
        assert_eq!(events[2].field("entries"), Some("1"));
        assert_eq!(events[2].field("has_more"), Some("false"));
    }

    #[tokio::test]
    async fn test_list_folder_keeps_entries_without_path_display() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(url_path("/2/files/list_folder"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"entries":[
                    {"id":"id:a","name":"A",".tag":"folder","path_display":null},
                    {"id":"id:b","name":"B",".tag":"file","path_display":"/B"}
                ]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        let staging = TempDir::new().unwrap();
        let client = test_client(&server, staging.path());

        // Act
        let output = list_folder(&client, &Context::empty(), ListFolderInput::default())
            .await
            .unwrap();

        // Assert
        assert_eq!(output.entries.len(), 2);
        assert_eq!(output.entries[0].path_display, None);
        assert_eq!(output.entries[1].path_display.as_deref(), Some("/B"));
        let value = serde_json::to_value(&output).unwrap();
        assert!(value["entries"][0].get("path_display").is_none());
    }

    #[tokio::test]
    async fn test_download_persists_content_into_staging_dir() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(url_path("/2/files/download"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(
                        "Dropbox-API-Result",
                        r#"{"name":"notes.txt","id":"id:n","rev":"0a1","size":11}"#,
                    )
                    .set_body_raw(b"hello world".to_vec(), "application/octet-stream"),
            )
            .mount(&server)
            .await;
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("not/yet/created");
        let client = test_client(&server, &staging);
        let sink = Arc::new(RecordingSink::new());

        // Act
        let output = download(
            &client,
            &Context::new(sink.clone()),
            DownloadInput {
                path: "/Work/notes.txt".to_string(),
            },
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(output.local_path, staging.join("notes.txt"));
        assert_eq!(fs::read(&output.local_path).unwrap(), b"hello world");
        assert_eq!(output.metadata.rev, "0a1");
        let events = sink.events();
        let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "requesting Dropbox file",
                "downloaded Dropbox file",
                "saved Dropbox file",
            ]
        );
        assert_eq!(events[1].field("name"), Some("notes.txt"));
        assert_eq!(events[1].field("bytes"), Some("11"));
    }

    #[tokio::test]
    async fn test_register_exposes_both_tools_through_registry() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(url_path("/2/files/list_folder"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"entries":[],"has_more":false}"#, "application/json"),
            )
            .mount(&server)
            .await;
        let staging = TempDir::new().unwrap();
        let mut registry = ToolRegistry::new();

        // Act
        register(&mut registry, &test_client(&server, staging.path())).unwrap();
        let output = registry
            .call("dropbox.list_folder", Context::empty(), json!({ "path": "/" }))
            .await
            .unwrap();

        // Assert
        let ids: Vec<&str> = registry.list().map(|info| info.id.as_str()).collect();
        assert_eq!(ids, vec!["dropbox.download", "dropbox.list_folder"]);
        assert_eq!(output, json!({ "entries": [], "has_more": false }));
    }

    #[tokio::test]
    async fn test_invoke_download_failure_reports_label_and_remote_error() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(url_path("/2/files/download"))
            .respond_with(ResponseTemplate::new(500).set_body_string("try again later"))
            .mount(&server)
            .await;
        let staging = TempDir::new().unwrap();
        let client = test_client(&server, staging.path());
        let sink = Arc::new(RecordingSink::new());

        // Act
        let err = invoke(
            sink.clone(),
            "dropbox.download",
            DownloadInput {
                path: "/a.txt".to_string(),
            },
            |ctx, input| async move { download(&client, &ctx, input).await },
        )
        .await
        .unwrap_err();

        // Assert
        assert_eq!(err.to_string(), "failed to call dropbox.download");
        let InvokeError::Handler { source, .. } = &err else {
            panic!("expected handler error, got {err:?}");
        };
        assert!(source.to_string().contains("try again later"));
        assert_eq!(
            source
                .downcast_ref::<DropboxError>()
                .and_then(DropboxError::api_error)
                .map(|e| e.status),
            Some(500)
        );
        let messages: Vec<String> = sink.events().into_iter().map(|e| e.message).collect();
        assert_eq!(
            messages,
            vec![
                "calling handler directly",
                "requesting Dropbox file",
                "handler call failed",
            ]
        );
    }
}
