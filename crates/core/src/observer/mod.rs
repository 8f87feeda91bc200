//! Observers for conversion job progress.
//!
//! Every job transition is pushed to each registered [`JobObserver`] in
//! registration order. Several observers can be attached to one job:
//!
//! - [`ConsoleObserver`]: one human-readable line per transition
//! - [`TracingObserver`]: structured log events
//! - [`MetricsObserver`]: Prometheus counters

mod console;
mod metrics_observer;
mod tracing_observer;
mod traits;

pub use console::{ArchiveMessages, ConsoleObserver, StageMessages, TranscodeMessages};
pub use metrics_observer::MetricsObserver;
pub use tracing_observer::TracingObserver;
pub use traits::JobObserver;
