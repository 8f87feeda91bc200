//! Trait definitions for the observer module.

use crate::engine::JobView;

/// Receives every state transition of the jobs it is registered with.
///
/// Called synchronously while the job's progress lock is held, so an
/// implementation must not block for long and must not call back into the job.
pub trait JobObserver: Send + Sync {
    /// Called after each transition with a read-only view of the job.
    fn update(&self, job: &JobView<'_>);
}
