//! Configuration for the engine module.

use serde::{Deserialize, Serialize};

/// Engine tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Items converted concurrently within one job. `0` uses the available parallelism.
    #[serde(default)]
    pub max_parallel: usize,
}

impl EngineConfig {
    /// Sets the parallelism.
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel;
        self
    }

    /// Resolves `0` to the number of available CPUs.
    pub fn effective_max_parallel(&self) -> usize {
        if self.max_parallel > 0 {
            self.max_parallel
        } else {
            available_parallelism()
        }
    }
}

pub(crate) fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
