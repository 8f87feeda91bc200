//! The batch conversion job.

use chrono::Utc;
use futures::stream::{self, TryStreamExt};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use uuid::Uuid;

use super::config::{available_parallelism, EngineConfig};
use super::error::{EngineError, StageError};
use super::status::JobStatus;
use super::traits::{StageAdapter, WriteMode};
use super::types::{JobSpec, JobSummary, JobView, Progress};
use crate::kind::FileKind;
use crate::observer::JobObserver;
use crate::paths;

/// One batch: a set of items of one kind run through one stage adapter.
///
/// The item list is computed when the job is built and never changes. Every
/// status change updates the counters and notifies the observers while the
/// progress lock is held, so observers always see a consistent
/// `(status, processed_count, target_file_path)` triple.
pub struct ConversionJob<A: StageAdapter> {
    spec: JobSpec,
    adapter: A,
    observers: Vec<Arc<dyn JobObserver>>,
    progress: Mutex<Progress>,
    write_gate: tokio::sync::Mutex<()>,
    max_parallel: usize,
}

impl<A: StageAdapter> ConversionJob<A> {
    /// Validates the arguments and enumerates the input.
    ///
    /// `output_path` defaults to the directory containing `input_path`.
    /// A missing input is not an error: the job simply has nothing to do.
    pub fn new(
        adapter: A,
        source_kind: FileKind,
        dest_kind: FileKind,
        input_path: impl Into<PathBuf>,
        output_path: Option<PathBuf>,
    ) -> Result<Self, EngineError> {
        let input_path = input_path.into();

        if source_kind == dest_kind {
            return Err(EngineError::invalid_argument(format!(
                "source and destination kinds are both '{}'",
                source_kind
            )));
        }
        if !dest_kind.is_concrete() {
            return Err(EngineError::invalid_argument(
                "destination kind must name a single format",
            ));
        }
        if paths::has_invalid_chars(&input_path) {
            return Err(EngineError::invalid_argument(format!(
                "input path contains invalid characters: {}",
                input_path.display()
            )));
        }
        if let Some(output) = &output_path {
            if paths::has_invalid_chars(output) {
                return Err(EngineError::invalid_argument(format!(
                    "output path contains invalid characters: {}",
                    output.display()
                )));
            }
        }

        let output_path = output_path
            .or_else(|| paths::containing_dir(&input_path))
            .unwrap_or_default();

        let items = paths::files_of_kind(&input_path, source_kind).map_err(|e| {
            EngineError::Enumerate {
                path: input_path.clone(),
                source: e,
            }
        })?;
        let input_is_dir = input_path.is_dir();

        let spec = JobSpec {
            id: Uuid::new_v4(),
            source_kind,
            dest_kind,
            input_path,
            output_path,
            items,
            input_is_dir,
        };

        debug!(
            job_id = %spec.id,
            stage = adapter.name(),
            input = %spec.input_path.display(),
            output = %spec.output_path.display(),
            total = spec.total_count(),
            "Job created"
        );

        Ok(Self {
            spec,
            adapter,
            observers: Vec::new(),
            progress: Mutex::new(Progress::default()),
            write_gate: tokio::sync::Mutex::new(()),
            max_parallel: available_parallelism(),
        })
    }

    /// Applies engine tuning.
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.max_parallel = config.effective_max_parallel();
        self
    }

    /// Sets how many items may be converted at once. Values below 1 become 1.
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Registers an observer; notification follows registration order.
    pub fn add_observer(&mut self, observer: Arc<dyn JobObserver>) {
        self.observers.push(observer);
    }

    /// Builder form of [`add_observer`](Self::add_observer).
    pub fn with_observer(mut self, observer: Arc<dyn JobObserver>) -> Self {
        self.add_observer(observer);
        self
    }

    /// Unregisters an observer by identity. Returns whether it was registered.
    pub fn remove_observer(&mut self, observer: &Arc<dyn JobObserver>) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| !Arc::ptr_eq(o, observer));
        self.observers.len() != before
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Re-sends the current state to every observer.
    pub fn notify_observers(&self) {
        let progress = self.lock_progress();
        self.notify_locked(&progress);
    }

    pub fn id(&self) -> Uuid {
        self.spec.id
    }

    pub fn stage(&self) -> &str {
        self.adapter.name()
    }

    pub fn spec(&self) -> &JobSpec {
        &self.spec
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn source_kind(&self) -> FileKind {
        self.spec.source_kind
    }

    pub fn dest_kind(&self) -> FileKind {
        self.spec.dest_kind
    }

    pub fn input_path(&self) -> &Path {
        &self.spec.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.spec.output_path
    }

    pub fn total_count(&self) -> usize {
        self.spec.total_count()
    }

    pub fn processed_count(&self) -> usize {
        self.lock_progress().processed_count
    }

    pub fn status(&self) -> JobStatus {
        self.lock_progress().status
    }

    pub fn target_file_path(&self) -> Option<PathBuf> {
        self.lock_progress().target_file_path.clone()
    }

    /// Owned snapshot of the current state.
    pub fn summary(&self) -> JobSummary {
        let progress = self.lock_progress();
        JobView::new(&self.spec, self.adapter.name(), &progress).summary()
    }

    /// Runs the batch.
    ///
    /// With nothing to convert the job goes to `Wait` and no adapter hook is
    /// called. Otherwise the job goes through `Start`, one `Running` per
    /// item, and `Complete`. The first failing hook moves the job to `Failed`
    /// and is returned; items already converted are left in place.
    pub async fn run(&self) -> Result<JobSummary, EngineError> {
        if self.spec.total_count() == 0 {
            self.transition(JobStatus::Wait, None);
            return Ok(self.summary());
        }

        self.transition(JobStatus::Start, None);

        match self.execute().await {
            Ok(()) => {
                self.transition(JobStatus::Complete, None);
                Ok(self.summary())
            }
            Err(source) => {
                self.transition(JobStatus::Failed, None);
                Err(EngineError::Stage {
                    stage: self.adapter.name().to_string(),
                    source,
                })
            }
        }
    }

    async fn execute(&self) -> Result<(), StageError> {
        self.adapter.prepare(&self.spec).await?;

        if self.spec.input_is_dir {
            self.convert_all().await?;
        } else {
            self.convert_single().await?;
        }

        self.adapter.finish(&self.spec).await
    }

    async fn convert_single(&self) -> Result<(), StageError> {
        for item in &self.spec.items {
            self.process_item(item).await?;
        }
        Ok(())
    }

    /// Fans items out with bounded parallelism. Stops starting new items on
    /// the first failure.
    async fn convert_all(&self) -> Result<(), StageError> {
        stream::iter(self.spec.items.iter().map(Ok::<_, StageError>))
            .try_for_each_concurrent(self.max_parallel, |item| self.process_item(item))
            .await
    }

    async fn process_item(&self, item: &Path) -> Result<(), StageError> {
        match self.adapter.write_mode() {
            WriteMode::Concurrent => {
                self.adapter.convert_one(&self.spec, item).await?;
                self.transition(JobStatus::Running, Some(item));
            }
            WriteMode::Serialized => {
                let _gate = self.write_gate.lock().await;
                self.adapter.convert_one(&self.spec, item).await?;
                self.transition(JobStatus::Running, Some(item));
            }
        }
        Ok(())
    }

    fn transition(&self, status: JobStatus, target: Option<&Path>) {
        let mut progress = self.lock_progress();

        match status {
            JobStatus::Start => {
                progress.processed_count = 0;
                progress.target_file_path = None;
                progress.started_at = Some(Utc::now());
                progress.finished_at = None;
            }
            JobStatus::Running => {
                progress.processed_count += 1;
                debug_assert!(progress.processed_count <= self.spec.total_count());
            }
            JobStatus::Complete | JobStatus::Failed => {
                progress.finished_at = Some(Utc::now());
            }
            JobStatus::Wait => {}
        }
        if let Some(target) = target {
            progress.target_file_path = Some(target.to_path_buf());
        }
        progress.status = status;

        debug!(
            job_id = %self.spec.id,
            stage = self.adapter.name(),
            status = %status,
            processed = progress.processed_count,
            total = self.spec.total_count(),
            "Job transition"
        );

        self.notify_locked(&progress);
    }

    fn notify_locked(&self, progress: &Progress) {
        let view = JobView::new(&self.spec, self.adapter.name(), progress);
        for observer in &self.observers {
            observer.update(&view);
        }
    }

    fn lock_progress(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
