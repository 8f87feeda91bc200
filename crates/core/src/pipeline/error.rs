//! Error types for the pipeline module.

use thiserror::Error;

use crate::engine::EngineError;
use crate::placer::PlacerError;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage was rejected or failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Handing over the archive or removing the intermediate directory failed.
    #[error("Final placement failed: {0}")]
    Placement(#[from] PlacerError),

    /// Sweeping intermediate files failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
