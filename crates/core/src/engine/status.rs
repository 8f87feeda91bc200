//! Lifecycle states of a conversion job.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one job.
///
/// `Wait -> Start -> Running (xN) -> Complete`, with `Failed` reachable from
/// any state. `Wait` is also terminal when there is nothing to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Not started, or nothing to do.
    #[default]
    Wait,
    /// Counters reset, about to convert.
    Start,
    /// One more item converted.
    Running,
    /// Every item converted.
    Complete,
    /// Aborted by an item or hook failure.
    Failed,
}

impl JobStatus {
    /// Returns the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wait => "wait",
            Self::Start => "start",
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    /// Whether no further transitions are expected in this run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_wait() {
        assert_eq!(JobStatus::default(), JobStatus::Wait);
    }

    #[test]
    fn test_terminal() {
        assert!(JobStatus::Complete.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Wait.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&JobStatus::Running).unwrap(), "\"running\"");
        let status: JobStatus = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(status, JobStatus::Complete);
    }
}
