//! Type definitions for Dropbox API.

use serde::{Deserialize, Serialize};
use toolbox::{JsonSchema, schemars};

// ============================================================================
// List Folder Types
// ============================================================================

/// One file or folder returned by `files/list_folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FolderEntry {
    /// The unique identifier (`id:...`).
    pub id: String,
    /// The last path component.
    pub name: String,
    /// The cased path as the user would see it. Dropbox leaves it out for
    /// entries that are not mounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_display: Option<String>,
    /// Entry kind: `file`, `folder` or `deleted`.
    #[serde(rename = ".tag")]
    pub tag: String,
    /// Set when the entry is the root of a shared folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_folder_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListFolderResponse {
    pub entries: Vec<FolderEntry>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub cursor: Option<String>,
}

// ============================================================================
// Download Types
// ============================================================================

/// File metadata carried in the `Dropbox-API-Result` header of a download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FileMetadata {
    /// The file name; also the name the download is persisted under.
    pub name: String,
    pub id: String,
    /// Revision identifier, unique per file version.
    pub rev: String,
    /// File size in bytes.
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_lower: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    /// Modification time reported by the desktop client (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_modified: Option<String>,
    /// Last time the file changed on Dropbox (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_modified: Option<String>,
    #[serde(default = "default_true")]
    pub is_downloadable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_explicit_shared_members: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_lock_info: Option<FileLockInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_groups: Vec<PropertyGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing_info: Option<SharingInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileLockInfo {
    #[serde(default)]
    pub is_lockholder: Option<bool>,
    #[serde(default)]
    pub lockholder_name: Option<String>,
    #[serde(default)]
    pub lockholder_account_id: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

/// Custom properties attached to a file through a property template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PropertyGroup {
    pub template_id: String,
    #[serde(default)]
    pub fields: Vec<PropertyField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PropertyField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SharingInfo {
    pub read_only: bool,
    #[serde(default)]
    pub parent_shared_folder_id: Option<String>,
    #[serde(default)]
    pub modified_by: Option<String>,
}

fn default_true() -> bool {
    true
}
