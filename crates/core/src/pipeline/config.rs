//! Configuration for the pipeline module.

use serde::{Deserialize, Serialize};

use crate::kind::FileKind;

/// Kinds and cleanup policy of the two-stage pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Kind picked up from the input.
    #[serde(default = "default_source_kind")]
    pub source_kind: FileKind,

    /// Kind produced by the first stage and archived by the second.
    #[serde(default = "default_intermediate_kind")]
    pub intermediate_kind: FileKind,

    /// Remove the intermediate directory when no archive was produced.
    #[serde(default = "default_true")]
    pub cleanup_intermediate: bool,

    /// Delete intermediate files from a kept intermediate directory.
    #[serde(default)]
    pub remove_intermediate_files: bool,
}

fn default_source_kind() -> FileKind {
    FileKind::Wave
}

fn default_intermediate_kind() -> FileKind {
    FileKind::Mp3
}

fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_kind: default_source_kind(),
            intermediate_kind: default_intermediate_kind(),
            cleanup_intermediate: true,
            remove_intermediate_files: false,
        }
    }
}

impl PipelineConfig {
    /// Sets the source and intermediate kinds.
    pub fn with_kinds(mut self, source_kind: FileKind, intermediate_kind: FileKind) -> Self {
        self.source_kind = source_kind;
        self.intermediate_kind = intermediate_kind;
        self
    }

    /// Enables or disables removal of an unused intermediate directory.
    pub fn with_cleanup(mut self, enabled: bool) -> Self {
        self.cleanup_intermediate = enabled;
        self
    }

    /// Enables or disables sweeping intermediate files from a kept directory.
    pub fn with_remove_intermediate_files(mut self, enabled: bool) -> Self {
        self.remove_intermediate_files = enabled;
        self
    }
}
