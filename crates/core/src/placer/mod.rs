//! Placer module for relocating finished artifacts.
//!
//! The pipeline uses a [`Placer`] to hand the final archive over to its
//! caller-visible name and to drop the intermediate directory afterwards.
//!
//! # Features
//!
//! - Replaces whatever already exists at the target (file or directory)
//! - Atomic rename when source and target share a filesystem
//! - Copy fallback for files across filesystems, with optional SHA-256 verification
//!
//! # Example
//!
//! ```ignore
//! use wavezip_core::placer::{FsPlacer, Placer};
//!
//! let placer = FsPlacer::with_defaults();
//! let moved = placer.relocate(&staged_zip, &final_zip).await?;
//! println!("{} -> {}", moved.from.display(), moved.to.display());
//! ```

mod config;
mod error;
mod fs_placer;
mod traits;

pub use config::PlacerConfig;
pub use error::PlacerError;
pub use fs_placer::FsPlacer;
pub use traits::{Placer, Relocation};
