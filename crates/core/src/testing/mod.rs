//! Testing utilities for exercising jobs without ffmpeg.
//!
//! # Example
//!
//! ```rust,ignore
//! use wavezip_core::testing::{MockConverter, RecordingObserver};
//!
//! let converter = Arc::new(MockConverter::new());
//! let recorder = Arc::new(RecordingObserver::new());
//!
//! let job = Transcoder::new(converter.clone())
//!     .job(FileKind::Wave, FileKind::Mp3, dir.path(), None)?
//!     .with_observer(recorder.clone());
//! job.run().await?;
//!
//! assert_eq!(recorder.count(JobStatus::Running), 3);
//! ```

mod mock_converter;
mod recording_observer;

pub use mock_converter::{MockConverter, RecordedConversion};
pub use recording_observer::{RecordingObserver, Transition};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::io;
    use std::path::{Path, PathBuf};

    /// Creates `names` under `dir` with their own name as content.
    pub fn touch_all(dir: &Path, names: &[&str]) -> io::Result<Vec<PathBuf>> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, name.as_bytes())?;
                Ok(path)
            })
            .collect()
    }

    /// Creates a directory `name` under `parent` holding `names`.
    pub fn album(parent: &Path, name: &str, names: &[&str]) -> io::Result<PathBuf> {
        let dir = parent.join(name);
        std::fs::create_dir_all(&dir)?;
        touch_all(&dir, names)?;
        Ok(dir)
    }
}
