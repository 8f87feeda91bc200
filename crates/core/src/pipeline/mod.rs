//! Pipeline orchestrator chaining the transcode and archive stages.
//!
//! For an input `/music/album` the pipeline:
//!
//! 1. transcodes `*.wav` into `/music/album_<timestamp>/*.mp3`
//! 2. archives those into `/music/album_<timestamp>.zip`
//! 3. if both stages converted something, renames the archive to
//!    `/music/album.zip` and deletes the intermediate directory
//!
//! # Example
//!
//! ```ignore
//! use wavezip_core::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::from_config(&config, Arc::new(converter), Arc::new(FsPlacer::with_defaults()))
//!     .with_observer(Arc::new(TracingObserver::new()));
//! let outcome = pipeline.run(Path::new("/music/album")).await?;
//! if let Some(archive) = outcome.final_archive {
//!     println!("{}", archive.display());
//! }
//! ```

mod config;
mod error;
mod orchestrator;
mod types;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use orchestrator::{intermediate_dir_for, Pipeline};
pub use types::PipelineOutcome;
