//! Human-readable progress lines on stdout.

use std::marker::PhantomData;

use super::traits::JobObserver;
use crate::engine::{JobStatus, JobView};

/// One message per job state for a console reporter.
pub trait StageMessages: Send + Sync + 'static {
    fn wait(job: &JobView<'_>) -> String;
    fn start(job: &JobView<'_>) -> String;
    fn running(job: &JobView<'_>) -> String;
    fn complete(job: &JobView<'_>) -> String;
    fn failed(job: &JobView<'_>) -> String;
}

/// Prints one line per transition using the messages of `M`.
pub struct ConsoleObserver<M: StageMessages> {
    _messages: PhantomData<fn() -> M>,
}

impl<M: StageMessages> ConsoleObserver<M> {
    pub fn new() -> Self {
        Self {
            _messages: PhantomData,
        }
    }

    /// The line printed for the job's current state.
    pub fn message(&self, job: &JobView<'_>) -> String {
        match job.status() {
            JobStatus::Wait => M::wait(job),
            JobStatus::Start => M::start(job),
            JobStatus::Running => M::running(job),
            JobStatus::Complete => M::complete(job),
            JobStatus::Failed => M::failed(job),
        }
    }
}

impl<M: StageMessages> Default for ConsoleObserver<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: StageMessages> JobObserver for ConsoleObserver<M> {
    fn update(&self, job: &JobView<'_>) {
        println!("{}", self.message(job));
    }
}

fn target(job: &JobView<'_>) -> String {
    job.target_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

/// Messages for the transcoding stage.
pub struct TranscodeMessages;

impl StageMessages for TranscodeMessages {
    fn wait(_job: &JobView<'_>) -> String {
        "No files to convert.".to_string()
    }

    fn start(job: &JobView<'_>) -> String {
        format!(
            "\nStarting conversion. [{}] -> [{}]",
            job.source_kind(),
            job.dest_kind()
        )
    }

    fn running(job: &JobView<'_>) -> String {
        format!(
            "Converted {}. ({}/{})",
            target(job),
            job.processed_count(),
            job.total_count()
        )
    }

    fn complete(job: &JobView<'_>) -> String {
        format!("Converted files written to {}.", job.output_path().display())
    }

    fn failed(_job: &JobView<'_>) -> String {
        "Conversion failed.".to_string()
    }
}

/// Messages for the archiving stage.
pub struct ArchiveMessages;

impl StageMessages for ArchiveMessages {
    fn wait(_job: &JobView<'_>) -> String {
        "No files to compress.".to_string()
    }

    fn start(job: &JobView<'_>) -> String {
        format!(
            "\nStarting compression. [{}] -> [{}]",
            job.source_kind(),
            job.dest_kind()
        )
    }

    fn running(job: &JobView<'_>) -> String {
        format!(
            "Compressed {}. ({}/{})",
            target(job),
            job.processed_count(),
            job.total_count()
        )
    }

    fn complete(job: &JobView<'_>) -> String {
        format!("Archive written to {}.", job.output_path().display())
    }

    fn failed(_job: &JobView<'_>) -> String {
        "Compression failed.".to_string()
    }
}
