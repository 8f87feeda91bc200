//! Structured log events for job transitions.

use tracing::{debug, error, info};

use super::traits::JobObserver;
use crate::engine::{JobStatus, JobView};

/// Emits one `tracing` event per transition.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl JobObserver for TracingObserver {
    fn update(&self, job: &JobView<'_>) {
        let job_id = job.id();
        let stage = job.stage();

        match job.status() {
            JobStatus::Wait => info!(
                %job_id,
                stage,
                input = %job.input_path().display(),
                source_kind = %job.source_kind(),
                "Nothing to convert"
            ),
            JobStatus::Start => info!(
                %job_id,
                stage,
                total = job.total_count(),
                source_kind = %job.source_kind(),
                dest_kind = %job.dest_kind(),
                "Job started"
            ),
            JobStatus::Running => debug!(
                %job_id,
                stage,
                item = %job.target_file_path().map(|p| p.display().to_string()).unwrap_or_default(),
                processed = job.processed_count(),
                total = job.total_count(),
                "Item converted"
            ),
            JobStatus::Complete => info!(
                %job_id,
                stage,
                processed = job.processed_count(),
                output = %job.output_path().display(),
                duration_ms = job.summary().duration().map(|d| d.num_milliseconds()),
                "Job complete"
            ),
            JobStatus::Failed => error!(
                %job_id,
                stage,
                processed = job.processed_count(),
                total = job.total_count(),
                "Job failed"
            ),
        }
    }
}
