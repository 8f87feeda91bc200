//! Error types for the engine module.

use std::path::PathBuf;
use thiserror::Error;

use crate::converter::ConverterError;
use crate::placer::PlacerError;

/// Failure inside a stage adapter hook.
#[derive(Debug, Error)]
pub enum StageError {
    /// The codec collaborator failed.
    #[error(transparent)]
    Converter(#[from] ConverterError),

    /// Moving a produced file failed.
    #[error(transparent)]
    Placer(#[from] PlacerError),

    /// Writing the archive failed.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// An archive entry was appended before `prepare` or after `finish`.
    #[error("Archive {path} is not open")]
    ArchiveNotOpen { path: PathBuf },

    /// A blocking worker panicked or was cancelled.
    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by job construction and [`run`](super::ConversionJob::run).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected at construction; the batch never starts.
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The input could not be enumerated.
    #[error("Failed to enumerate {path}")]
    Enumerate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A hook failed during `run`; the job ended in `Failed`.
    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: StageError,
    },
}

impl EngineError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Whether the error was raised before the job ran.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
