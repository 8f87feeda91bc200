//! Types for the engine module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::status::JobStatus;
use crate::kind::FileKind;

/// The immutable part of a job, fixed at construction.
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// Job identifier.
    pub id: Uuid,
    /// Kind of the input items.
    pub source_kind: FileKind,
    /// Kind produced by the stage.
    pub dest_kind: FileKind,
    /// File or directory the items come from.
    pub input_path: PathBuf,
    /// File or directory the stage writes to.
    pub output_path: PathBuf,
    /// Items of `source_kind` found at construction, sorted.
    pub items: Vec<PathBuf>,
    /// Whether `input_path` was a directory at construction.
    pub input_is_dir: bool,
}

impl JobSpec {
    /// Number of items eligible for conversion.
    pub fn total_count(&self) -> usize {
        self.items.len()
    }
}

/// The mutable part of a job, guarded by the job's progress lock.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub status: JobStatus,
    pub processed_count: usize,
    pub target_file_path: Option<PathBuf>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Read-only view of a job handed to observers during a transition.
///
/// Only valid for the duration of the callback.
#[derive(Debug, Clone, Copy)]
pub struct JobView<'a> {
    spec: &'a JobSpec,
    stage: &'a str,
    progress: &'a Progress,
}

impl<'a> JobView<'a> {
    pub fn new(spec: &'a JobSpec, stage: &'a str, progress: &'a Progress) -> Self {
        Self {
            spec,
            stage,
            progress,
        }
    }

    pub fn id(&self) -> Uuid {
        self.spec.id
    }

    pub fn stage(&self) -> &'a str {
        self.stage
    }

    pub fn status(&self) -> JobStatus {
        self.progress.status
    }

    pub fn processed_count(&self) -> usize {
        self.progress.processed_count
    }

    pub fn total_count(&self) -> usize {
        self.spec.total_count()
    }

    pub fn target_file_path(&self) -> Option<&'a Path> {
        self.progress.target_file_path.as_deref()
    }

    pub fn source_kind(&self) -> FileKind {
        self.spec.source_kind
    }

    pub fn dest_kind(&self) -> FileKind {
        self.spec.dest_kind
    }

    pub fn input_path(&self) -> &'a Path {
        &self.spec.input_path
    }

    pub fn output_path(&self) -> &'a Path {
        &self.spec.output_path
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.progress.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.progress.finished_at
    }

    /// Owned copy of the current state.
    pub fn summary(&self) -> JobSummary {
        JobSummary {
            id: self.spec.id,
            stage: self.stage.to_string(),
            source_kind: self.spec.source_kind,
            dest_kind: self.spec.dest_kind,
            input_path: self.spec.input_path.clone(),
            output_path: self.spec.output_path.clone(),
            status: self.progress.status,
            processed_count: self.progress.processed_count,
            total_count: self.spec.total_count(),
            started_at: self.progress.started_at,
            finished_at: self.progress.finished_at,
        }
    }
}

/// Owned snapshot of a job, returned by `run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub stage: String,
    pub source_kind: FileKind,
    pub dest_kind: FileKind,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub status: JobStatus,
    pub processed_count: usize,
    pub total_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobSummary {
    /// Wall time between `Start` and the terminal transition.
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}
