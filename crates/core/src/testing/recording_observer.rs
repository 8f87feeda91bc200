//! Observer that records every transition for test assertions.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::engine::{JobStatus, JobView};
use crate::observer::JobObserver;

/// What an observer saw at one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub stage: String,
    pub status: JobStatus,
    pub processed_count: usize,
    pub total_count: usize,
    pub target_file_path: Option<PathBuf>,
}

/// Records transitions, optionally into a log shared with other observers.
///
/// # Example
///
/// ```rust,ignore
/// let log = Arc::new(Mutex::new(Vec::new()));
/// let first = Arc::new(RecordingObserver::with_shared_log("first", log.clone()));
/// let second = Arc::new(RecordingObserver::with_shared_log("second", log.clone()));
/// job.add_observer(first.clone());
/// job.add_observer(second);
/// job.run().await?;
/// assert_eq!(log.lock().unwrap()[..2], ["first:start", "second:start"]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingObserver {
    label: String,
    transitions: Mutex<Vec<Transition>>,
    shared_log: Option<Arc<Mutex<Vec<String>>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also appends `"<label>:<status>"` to `log` on every update.
    pub fn with_shared_log(label: impl Into<String>, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label: label.into(),
            transitions: Mutex::new(Vec::new()),
            shared_log: Some(log),
        }
    }

    /// All transitions seen so far.
    pub fn transitions(&self) -> Vec<Transition> {
        self.lock().clone()
    }

    /// Statuses seen so far, in order.
    pub fn statuses(&self) -> Vec<JobStatus> {
        self.lock().iter().map(|t| t.status).collect()
    }

    /// How many times `status` was seen.
    pub fn count(&self, status: JobStatus) -> usize {
        self.lock().iter().filter(|t| t.status == status).count()
    }

    /// `processed_count` at each `Running` transition.
    pub fn running_counts(&self) -> Vec<usize> {
        self.lock()
            .iter()
            .filter(|t| t.status == JobStatus::Running)
            .map(|t| t.processed_count)
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Transition>> {
        self.transitions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JobObserver for RecordingObserver {
    fn update(&self, job: &JobView<'_>) {
        self.lock().push(Transition {
            stage: job.stage().to_string(),
            status: job.status(),
            processed_count: job.processed_count(),
            total_count: job.total_count(),
            target_file_path: job.target_file_path().map(|p| p.to_path_buf()),
        });

        if let Some(log) = &self.shared_log {
            log.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(format!("{}:{}", self.label, job.status()));
        }
    }
}
