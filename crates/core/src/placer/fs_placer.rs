//! File system placer implementation.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use super::config::PlacerConfig;
use super::error::PlacerError;
use super::traits::{Placer, Relocation};

/// Linux `EXDEV`, for platforms that report it as an uncategorized error.
const EXDEV: i32 = 18;

/// Moves entries with `rename`, copying files when that crosses filesystems.
pub struct FsPlacer {
    config: PlacerConfig,
}

impl FsPlacer {
    pub fn new(config: PlacerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PlacerConfig::default())
    }

    /// `Ok(false)` when `from` and `to` are on different filesystems.
    async fn rename(from: &Path, to: &Path) -> Result<bool, PlacerError> {
        match fs::rename(from, to).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::CrossesDevices || e.raw_os_error() == Some(EXDEV) => {
                Ok(false)
            }
            Err(e) => Err(PlacerError::move_failed(from, to, e)),
        }
    }

    /// Deletes the file or directory at `path`, if any.
    async fn clear_target(path: &Path) -> Result<bool, PlacerError> {
        let meta = match fs::symlink_metadata(path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let removed = if meta.is_dir() {
            fs::remove_dir_all(path).await
        } else {
            fs::remove_file(path).await
        };
        removed.map_err(|source| PlacerError::ReplaceFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }

    /// Reads `reader` to the end, feeding `hasher` and `sink` when given.
    /// Returns the byte count.
    async fn pump<R: AsyncRead + Unpin>(
        &self,
        mut reader: R,
        mut hasher: Option<&mut Sha256>,
        mut sink: Option<&mut BufWriter<File>>,
    ) -> std::io::Result<u64> {
        let mut buffer = vec![0u8; self.config.copy_buffer_bytes];
        let mut total = 0u64;
        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            if let Some(hasher) = hasher.as_deref_mut() {
                hasher.update(&buffer[..n]);
            }
            if let Some(sink) = sink.as_deref_mut() {
                sink.write_all(&buffer[..n]).await?;
            }
            total += n as u64;
        }
        if let Some(sink) = sink {
            sink.flush().await?;
        }
        Ok(total)
    }

    async fn sha256_of(&self, path: &Path) -> std::io::Result<String> {
        let mut hasher = Sha256::new();
        self.pump(File::open(path).await?, Some(&mut hasher), None)
            .await?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Copies `from` to `to`, verifies the copy if configured, then deletes `from`.
    async fn move_by_copy(&self, from: &Path, to: &Path) -> Result<(), PlacerError> {
        let source = File::open(from)
            .await
            .map_err(|e| PlacerError::copy_failed(from, to, e))?;
        let target = File::create(to)
            .await
            .map_err(|e| PlacerError::copy_failed(from, to, e))?;
        let mut writer = BufWriter::with_capacity(self.config.copy_buffer_bytes, target);

        let mut hasher = self.config.verify_copies.then(Sha256::new);
        let bytes = self
            .pump(source, hasher.as_mut(), Some(&mut writer))
            .await
            .map_err(|e| PlacerError::copy_failed(from, to, e))?;

        if let Some(hasher) = hasher {
            let expected = format!("{:x}", hasher.finalize());
            let actual = self.sha256_of(to).await?;
            if actual != expected {
                if let Err(e) = fs::remove_file(to).await {
                    warn!(path = %to.display(), error = %e, "Failed to remove corrupt copy");
                }
                return Err(PlacerError::ChecksumMismatch {
                    path: to.to_path_buf(),
                    expected,
                    actual,
                });
            }
        }

        fs::remove_file(from)
            .await
            .map_err(|source| PlacerError::SourceNotRemoved {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            })?;

        debug!(from = %from.display(), to = %to.display(), bytes, "Moved by copy");
        Ok(())
    }
}

#[async_trait]
impl Placer for FsPlacer {
    fn name(&self) -> &str {
        "fs"
    }

    async fn relocate(&self, from: &Path, to: &Path) -> Result<Relocation, PlacerError> {
        let is_dir = match fs::symlink_metadata(from).await {
            Ok(meta) => meta.is_dir(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PlacerError::SourceNotFound {
                    path: from.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let replaced_existing = Self::clear_target(to).await?;

        let atomic = Self::rename(from, to).await?;
        if !atomic {
            if is_dir {
                return Err(PlacerError::CrossDeviceDirectory {
                    path: from.to_path_buf(),
                });
            }
            self.move_by_copy(from, to).await?;
        }

        debug!(
            from = %from.display(),
            to = %to.display(),
            atomic,
            replaced_existing,
            "Relocated"
        );

        Ok(Relocation {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            atomic,
            replaced_existing,
        })
    }

    async fn remove_dir(&self, path: &Path) -> Result<(), PlacerError> {
        match fs::remove_dir_all(path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
