//! Atomic persistence of downloaded content.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::error::DropboxError;

/// Writes `content` to `staging_dir/name` and returns the final path.
///
/// Missing directories are created. The bytes are written and synced to a
/// temporary file beside the destination, which is then renamed over it, so
/// readers see either the previous file or the complete new one. An existing
/// file is replaced. `name` is used exactly as given.
///
/// # Errors
///
/// Returns [`DropboxError::Filesystem`] naming the step that failed.
pub fn persist(staging_dir: &Path, name: &str, content: &[u8]) -> Result<PathBuf, DropboxError> {
    let destination = staging_dir.join(name);
    let parent = destination.parent().unwrap_or(staging_dir);

    fs::create_dir_all(parent).map_err(|source| DropboxError::Filesystem {
        operation: "create directory",
        path: parent.to_path_buf(),
        source,
    })?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|source| DropboxError::Filesystem {
        operation: "create temporary file in",
        path: parent.to_path_buf(),
        source,
    })?;

    temp.write_all(content)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|source| DropboxError::Filesystem {
            operation: "write",
            path: temp.path().to_path_buf(),
            source,
        })?;

    temp.persist(&destination)
        .map_err(|err| DropboxError::Filesystem {
            operation: "rename into",
            path: destination.clone(),
            source: err.error,
        })?;

    Ok(destination)
}
