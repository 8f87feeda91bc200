//! Feeds the Prometheus metrics from job transitions.

use super::traits::JobObserver;
use crate::engine::{JobStatus, JobView};
use crate::metrics::{ITEMS_CONVERTED, JOBS_TOTAL, JOB_DURATION};

/// Counts converted items and finished jobs.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsObserver;

impl MetricsObserver {
    pub fn new() -> Self {
        Self
    }
}

impl JobObserver for MetricsObserver {
    fn update(&self, job: &JobView<'_>) {
        let stage = job.stage();

        let result = match job.status() {
            JobStatus::Start => return,
            JobStatus::Running => {
                ITEMS_CONVERTED.with_label_values(&[stage]).inc();
                return;
            }
            JobStatus::Wait => "empty",
            JobStatus::Complete => "complete",
            JobStatus::Failed => "failed",
        };

        JOBS_TOTAL.with_label_values(&[stage, result]).inc();

        if let (Some(start), Some(end)) = (job.started_at(), job.finished_at()) {
            let secs = (end - start).num_milliseconds() as f64 / 1000.0;
            JOB_DURATION.with_label_values(&[stage]).observe(secs.max(0.0));
        }
    }
}
