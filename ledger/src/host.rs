//! Capabilities the ledger needs from the application that owns scene content.
//!
//! The engine never produces content bytes itself. It asks a [`ContentHost`]
//! to write the current working content to a path, to open a file, and to
//! say who and where it is.

use std::io;
use std::path::{Path, PathBuf};

pub trait ContentHost {
    /// Write the current working content to `target`.
    fn materialize(&self, target: &Path) -> io::Result<()>;

    /// Open `path` as the working content. `force` discards unsaved changes.
    fn open(&self, path: &Path, force: bool) -> io::Result<()>;

    /// Copy `from` over `to`, replacing any existing file.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::copy(from, to).map(|_| ())
    }

    /// Machine name recorded in version entries.
    fn host_identity(&self) -> String;

    /// Login of the operating user, for logs.
    fn user_identity(&self) -> String;
}

/// Filesystem host: content is a working file on disk that gets copied into
/// the versioned location.
#[derive(Debug, Clone, Default)]
pub struct WorkingFileHost {
    working_file: Option<PathBuf>,
}

impl WorkingFileHost {
    pub fn new(working_file: impl Into<PathBuf>) -> Self {
        Self {
            working_file: Some(working_file.into()),
        }
    }

    /// A host that can open and copy files but has nothing to save.
    pub fn read_only() -> Self {
        Self::default()
    }

    pub fn working_file(&self) -> Option<&Path> {
        self.working_file.as_deref()
    }
}

impl ContentHost for WorkingFileHost {
    fn materialize(&self, target: &Path) -> io::Result<()> {
        let source = self.working_file.as_deref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no working file to save")
        })?;
        std::fs::copy(source, target)?;
        tracing::debug!(
            from = %source.display(),
            to = %target.display(),
            "materialized working file"
        );
        Ok(())
    }

    fn open(&self, path: &Path, force: bool) -> io::Result<()> {
        if !path.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ));
        }
        tracing::info!(path = %path.display(), force, "opening scene file");
        Ok(())
    }

    fn host_identity(&self) -> String {
        hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }

    fn user_identity(&self) -> String {
        whoami::username()
    }
}
