//! Error taxonomy for ledger operations.
//!
//! Every engine-level operation returns either a value or one of these
//! variants. None of them abort the process; callers branch on
//! [`LedgerError::kind`] to pick a message or an exit code.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Ledger result type alias
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Ledger error taxonomy
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid name {name:?}: only letters, digits, '_' and '-' are allowed")]
    InvalidName { name: String },

    #[error("Metadata not found at {path}")]
    NotFound { path: PathBuf },

    #[error("Metadata corrupted at {path}: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    #[error("Version {requested} is out of range (scene has {available} versions)")]
    OutOfRange { requested: usize, available: usize },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No reference set for scene {name}")]
    NoReferenceSet { name: String },

    #[error("Host failed to save content to {path}: {source}")]
    Materialize {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown sub-project: {0}")]
    UnknownSubProject(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("{what} already exists: {name}")]
    AlreadyExists { what: &'static str, name: String },

    #[error("{path} is not a tracked base scene: {reason}")]
    NotTracked { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Payload-free discriminant of [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidName,
    NotFound,
    Corrupted,
    OutOfRange,
    WriteFailed,
    ReadFailed,
    NoReferenceSet,
    Materialize,
    CopyFailed,
    UnknownCategory,
    UnknownSubProject,
    UnknownUser,
    AlreadyExists,
    NotTracked,
    Config,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidName { .. } => ErrorKind::InvalidName,
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::Corrupted { .. } => ErrorKind::Corrupted,
            LedgerError::OutOfRange { .. } => ErrorKind::OutOfRange,
            LedgerError::WriteFailed { .. } => ErrorKind::WriteFailed,
            LedgerError::ReadFailed { .. } => ErrorKind::ReadFailed,
            LedgerError::NoReferenceSet { .. } => ErrorKind::NoReferenceSet,
            LedgerError::Materialize { .. } => ErrorKind::Materialize,
            LedgerError::CopyFailed { .. } => ErrorKind::CopyFailed,
            LedgerError::UnknownCategory(_) => ErrorKind::UnknownCategory,
            LedgerError::UnknownSubProject(_) => ErrorKind::UnknownSubProject,
            LedgerError::UnknownUser(_) => ErrorKind::UnknownUser,
            LedgerError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            LedgerError::NotTracked { .. } => ErrorKind::NotTracked,
            LedgerError::Config(_) => ErrorKind::Config,
        }
    }

    /// Benign conditions that should be shown as a notice rather than a failure.
    pub fn is_user_facing_notice(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NoReferenceSet | ErrorKind::NotFound | ErrorKind::NotTracked
        )
    }

    /// Input the caller can correct without touching the filesystem.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidName
                | ErrorKind::OutOfRange
                | ErrorKind::UnknownCategory
                | ErrorKind::UnknownSubProject
                | ErrorKind::UnknownUser
                | ErrorKind::AlreadyExists
        )
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { path } => LedgerError::NotFound { path },
            StoreError::Corrupted { path, reason } => LedgerError::Corrupted { path, reason },
            StoreError::ReadFailed { path, source } => LedgerError::ReadFailed { path, source },
            StoreError::WriteFailed { path, source } => LedgerError::WriteFailed { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_their_classification() {
        let err: LedgerError = StoreError::Corrupted {
            path: "/tmp/ShotA.json".into(),
            reason: "expected value at line 1".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
        assert!(!err.is_user_facing_notice());

        let err: LedgerError = StoreError::NotFound {
            path: "/tmp/ShotA.json".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.is_user_facing_notice());
    }

    #[test]
    fn invalid_input_covers_recoverable_errors() {
        assert!(
            LedgerError::InvalidName {
                name: "a/b".to_string()
            }
            .is_invalid_input()
        );
        assert!(
            LedgerError::OutOfRange {
                requested: 4,
                available: 3
            }
            .is_invalid_input()
        );
        let io = LedgerError::WriteFailed {
            path: "/tmp/x".into(),
            source: std::io::Error::other("disk full"),
        };
        assert!(!io.is_invalid_input());
        assert!(!io.is_user_facing_notice());
    }

    #[test]
    fn messages_name_the_offending_path() {
        let err = LedgerError::Corrupted {
            path: "/proj/data/json/Animation/ShotA.json".into(),
            reason: "trailing characters".to_string(),
        };
        assert!(err.to_string().contains("ShotA.json"));
    }
}
