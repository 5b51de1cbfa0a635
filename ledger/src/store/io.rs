//! Atomic read/write for metadata documents.
//!
//! Uses the temp-file + fsync + rename pattern for crash-safe writes.
//! Read path provides deterministic errors for missing and damaged files.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Indentation used for every document written by the store.
const INDENT: &[u8] = b"    ";

/// Errors from metadata I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Metadata file not found at expected path.
    #[error("Metadata not found at {path}")]
    NotFound { path: PathBuf },

    /// Metadata file exists but does not parse.
    #[error("Metadata corrupted at {path}: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    /// Filesystem error while reading.
    #[error("I/O error reading {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Filesystem error while writing (disk full, permissions, vanished mount).
    #[error("I/O error writing {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read and parse a JSON document.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound {
                path: path.to_path_buf(),
            });
        }
        // Not UTF-8: the bytes are there but they are not a JSON document.
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            return Err(StoreError::Corrupted {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
        Err(e) => {
            return Err(StoreError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    serde_json::from_str(&content).map_err(|e| StoreError::Corrupted {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Serialize with 4-space indentation and a trailing newline.
pub fn to_pretty_json<T: Serialize>(document: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write a JSON document atomically.
///
/// 1. Write to a temporary sibling (`.<name>.XXXX.tmp`) in the same directory
/// 2. fsync the temporary file
/// 3. Rename over the target
///
/// The temporary file is removed on every failure path when the handle drops.
/// The parent directory must already exist; see [`ensure_directory`].
pub fn save<T: Serialize>(document: &T, path: &Path) -> Result<(), StoreError> {
    let write_failed = |source: std::io::Error| StoreError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let bytes = to_pretty_json(document)
        .map_err(|e| write_failed(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(&parent)
        .map_err(write_failed)?;
    tracing::debug!(target = %path.display(), temp = %tmp.path().display(), "writing metadata");

    tmp.write_all(&bytes).map_err(write_failed)?;
    tmp.flush().map_err(write_failed)?;
    tmp.as_file().sync_all().map_err(write_failed)?;

    // On failure the returned PersistError owns the temp file and deletes it on drop.
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}

/// Create `path` and any missing parents. Succeeds if it already exists.
pub fn ensure_directory(path: &Path) -> Result<(), StoreError> {
    std::fs::create_dir_all(path).map_err(|e| StoreError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
