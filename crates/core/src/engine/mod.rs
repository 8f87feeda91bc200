//! Batch conversion engine.
//!
//! A [`ConversionJob`] enumerates the items of one [`FileKind`](crate::kind::FileKind)
//! under an input path, fans them out to a [`StageAdapter`], and drives a
//! [`JobStatus`] state machine whose transitions are pushed synchronously to
//! registered [`JobObserver`](crate::observer::JobObserver)s.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wavezip_core::engine::ConversionJob;
//! use wavezip_core::kind::FileKind;
//! use wavezip_core::observer::{ConsoleObserver, TranscodeMessages};
//!
//! let mut job = ConversionJob::new(adapter, FileKind::Wave, FileKind::Mp3, "/music/album", None)?;
//! job.add_observer(Arc::new(ConsoleObserver::<TranscodeMessages>::new()));
//! let summary = job.run().await?;
//! println!("{}/{} converted", summary.processed_count, summary.total_count);
//! ```

mod config;
mod error;
mod job;
mod status;
mod traits;
mod types;

pub use config::EngineConfig;
pub use error::{EngineError, StageError};
pub use job::ConversionJob;
pub use status::JobStatus;
pub use traits::{StageAdapter, WriteMode};
pub use types::{JobSpec, JobSummary, JobView, Progress};
