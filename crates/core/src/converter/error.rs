//! Error types for the converter module.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConverterError {
    /// `ffmpeg` or `ffprobe` could not be launched.
    #[error("{tool} not found at {path}")]
    BinaryNotFound { tool: &'static str, path: PathBuf },

    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The local ffmpeg build lacks the encoder.
    #[error("ffmpeg has no '{encoder}' encoder")]
    EncoderUnavailable { encoder: String },

    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// ffmpeg exited unsuccessfully. `stderr` holds its last lines.
    #[error("ffmpeg failed on {input} ({status})")]
    Exited {
        input: PathBuf,
        status: String,
        stderr: Vec<String>,
    },

    #[error("ffmpeg wrote nothing to {path}")]
    NoOutput { path: PathBuf },

    #[error("ffmpeg timed out after {}s on {input}", after.as_secs())]
    TimedOut { input: PathBuf, after: Duration },

    #[error("Cannot probe {path}: {reason}")]
    Probe { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    pub fn exited(input: &Path, status: impl Into<String>, stderr: Vec<String>) -> Self {
        Self::Exited {
            input: input.to_path_buf(),
            status: status.into(),
            stderr,
        }
    }

    pub fn probe(path: &Path, reason: impl Into<String>) -> Self {
        Self::Probe {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Maps a failed spawn of `tool` to `BinaryNotFound` when the binary is missing.
    pub(crate) fn launch(tool: &'static str, path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::BinaryNotFound {
                tool,
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }

    /// Last line ffmpeg printed before failing.
    pub fn stderr_tail(&self) -> Option<&str> {
        match self {
            Self::Exited { stderr, .. } => stderr.last().map(String::as_str),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exited_keeps_stderr_tail() {
        let err = ConverterError::exited(
            Path::new("/a.wav"),
            "exit code 1",
            vec!["Guessed Channel Layout".into(), "Invalid data found".into()],
        );
        assert_eq!(err.stderr_tail(), Some("Invalid data found"));
        assert_eq!(err.to_string(), "ffmpeg failed on /a.wav (exit code 1)");
    }

    #[test]
    fn test_launch_maps_not_found() {
        let err = ConverterError::launch(
            "ffprobe",
            Path::new("/opt/ffprobe"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.to_string(), "ffprobe not found at /opt/ffprobe");

        let err = ConverterError::launch(
            "ffmpeg",
            Path::new("ffmpeg"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, ConverterError::Io(_)));
    }
}
