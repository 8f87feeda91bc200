//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::JobSummary;

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// First stage (source kind to intermediate kind).
    pub transcode: JobSummary,
    /// Second stage (intermediate kind to zip).
    pub archive: JobSummary,
    /// Directory the first stage wrote into.
    pub intermediate_dir: PathBuf,
    /// Whether the intermediate directory was deleted.
    pub intermediate_removed: bool,
    /// `<input>.zip`, when both stages converted something.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_archive: Option<PathBuf>,
}

impl PipelineOutcome {
    /// Whether an archive was handed over.
    pub fn produced_archive(&self) -> bool {
        self.final_archive.is_some()
    }
}
