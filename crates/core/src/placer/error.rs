//! Error types for the placer module.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacerError {
    #[error("Source not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The entry already at the target could not be removed.
    #[error("Cannot remove existing {path}: {source}")]
    ReplaceFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot copy {from} to {to}: {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot move {from} to {to}: {source}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only files fall back to copying when a rename crosses filesystems.
    #[error("Cannot move directory {path} across filesystems")]
    CrossDeviceDirectory { path: PathBuf },

    #[error("Copy at {path} is corrupt: sha256 {actual}, expected {expected}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// The copy is in place but the original is still there.
    #[error("Copied to {to} but cannot remove {from}: {source}")]
    SourceNotRemoved {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlacerError {
    pub fn copy_failed(from: &Path, to: &Path, source: std::io::Error) -> Self {
        Self::CopyFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
    }

    pub fn move_failed(from: &Path, to: &Path, source: std::io::Error) -> Self {
        Self::MoveFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
    }
}
