//! Trait definitions for the engine module.

use async_trait::async_trait;
use std::path::Path;

use super::error::StageError;
use super::types::JobSpec;

/// Whether an adapter's per-item write may overlap with other items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Items are independent; only the progress update is serialized.
    #[default]
    Concurrent,
    /// Items share one output handle; the write itself is serialized.
    Serialized,
}

/// The per-stage steps a [`ConversionJob`](super::ConversionJob) drives.
///
/// The engine owns enumeration, fan-out and state transitions. Adapters only
/// prepare their output, convert one item, and optionally finalize.
#[async_trait]
pub trait StageAdapter: Send + Sync {
    /// Stage name used in logs, metrics and errors.
    fn name(&self) -> &str;

    /// How `convert_one` calls may overlap.
    fn write_mode(&self) -> WriteMode {
        WriteMode::Concurrent
    }

    /// Idempotent setup run once after `Start`.
    async fn prepare(&self, spec: &JobSpec) -> Result<(), StageError>;

    /// Converts a single item.
    async fn convert_one(&self, spec: &JobSpec, item: &Path) -> Result<(), StageError>;

    /// Runs once after every item converted, before `Complete`.
    async fn finish(&self, _spec: &JobSpec) -> Result<(), StageError> {
        Ok(())
    }
}
