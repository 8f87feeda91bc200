//! Trait definitions for the placer module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::PlacerError;

/// Outcome of a successful relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    /// Where the entry used to live.
    pub from: PathBuf,
    /// Where the entry lives now.
    pub to: PathBuf,
    /// Whether the entry was renamed in place rather than copied.
    pub atomic: bool,
    /// Whether something at `to` was removed first.
    pub replaced_existing: bool,
}

/// Moves finished artifacts to their final location.
#[async_trait]
pub trait Placer: Send + Sync {
    /// Returns the name of this placer implementation.
    fn name(&self) -> &str;

    /// Renames `from` to `to`, removing any pre-existing entry at `to` first.
    ///
    /// Fails with [`PlacerError::SourceNotFound`] when `from` does not exist.
    async fn relocate(&self, from: &Path, to: &Path) -> Result<Relocation, PlacerError>;

    /// Recursively removes a directory. A missing directory is not an error.
    async fn remove_dir(&self, path: &Path) -> Result<(), PlacerError>;
}
