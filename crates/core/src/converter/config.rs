//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where ffmpeg lives and how it is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,

    /// Limit for one ffmpeg process, in seconds.
    pub timeout_secs: u64,

    /// Bitrate for lossy output. Unset uses the format's default.
    pub bitrate_kbps: Option<u32>,

    /// Passed to `-loglevel`.
    pub log_level: String,

    /// Appended right before the output path.
    pub extra_args: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            timeout_secs: 600,
            bitrate_kbps: None,
            log_level: "error".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl ConverterConfig {
    /// Uses the binaries at `ffmpeg` and `ffprobe` instead of the ones on `PATH`.
    pub fn with_binaries(mut self, ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        self.ffmpeg = ffmpeg.into();
        self.ffprobe = ffprobe.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_bitrate(mut self, bitrate_kbps: Option<u32>) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
