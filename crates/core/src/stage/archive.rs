//! Archiving stage: every item becomes an entry of one zip file.

use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::engine::{ConversionJob, EngineError, JobSpec, StageAdapter, StageError, WriteMode};
use crate::kind::FileKind;
use crate::paths;

type SharedWriter = Arc<Mutex<Option<ZipWriter<File>>>>;

/// Appends items to the archive at `output_path`.
///
/// The archive handle is opened in `prepare` and shared by all items, so
/// writes are serialized.
pub struct ZipArchiver {
    writer: SharedWriter,
    compression: CompressionMethod,
}

impl ZipArchiver {
    pub fn new() -> Self {
        Self {
            writer: Arc::new(Mutex::new(None)),
            compression: CompressionMethod::Deflated,
        }
    }

    /// Sets the entry compression method.
    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    /// Builds a job archiving the `source` items under `input` into `<input>.zip`.
    pub fn job(
        self,
        source: FileKind,
        input: impl Into<PathBuf>,
    ) -> Result<ConversionJob<Self>, EngineError> {
        let input = input.into();
        let output = paths::with_appended_extension(&input, "zip");
        ConversionJob::new(self, source, FileKind::Zip, input, Some(output))
    }
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self::new()
    }
}

fn entry_name(item: &Path) -> String {
    item.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| item.to_string_lossy().into_owned())
}

#[async_trait]
impl StageAdapter for ZipArchiver {
    fn name(&self) -> &str {
        "archive"
    }

    fn write_mode(&self) -> WriteMode {
        WriteMode::Serialized
    }

    async fn prepare(&self, spec: &JobSpec) -> Result<(), StageError> {
        let output = spec.output_path.clone();
        let writer = Arc::clone(&self.writer);

        tokio::task::spawn_blocking(move || -> Result<(), StageError> {
            // A stale archive would end up with duplicate entries
            if output.exists() {
                std::fs::remove_file(&output)?;
            }
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = File::create(&output)?;
            *writer.lock().unwrap_or_else(PoisonError::into_inner) = Some(ZipWriter::new(file));
            Ok(())
        })
        .await??;

        Ok(())
    }

    async fn convert_one(&self, spec: &JobSpec, item: &Path) -> Result<(), StageError> {
        let writer = Arc::clone(&self.writer);
        let output = spec.output_path.clone();
        let source = item.to_path_buf();
        let name = entry_name(item);
        let options = SimpleFileOptions::default().compression_method(self.compression);

        let bytes = tokio::task::spawn_blocking(move || -> Result<u64, StageError> {
            let mut guard = writer.lock().unwrap_or_else(PoisonError::into_inner);
            let zip = guard
                .as_mut()
                .ok_or(StageError::ArchiveNotOpen { path: output })?;
            let mut input = File::open(&source)?;
            zip.start_file(name, options)?;
            Ok(std::io::copy(&mut input, zip)?)
        })
        .await??;

        debug!(job_id = %spec.id, item = %item.display(), bytes, "Added archive entry");
        Ok(())
    }

    async fn finish(&self, spec: &JobSpec) -> Result<(), StageError> {
        let writer = Arc::clone(&self.writer);
        let output = spec.output_path.clone();

        tokio::task::spawn_blocking(move || -> Result<(), StageError> {
            let zip = writer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
                .ok_or(StageError::ArchiveNotOpen { path: output })?;
            zip.finish()?;
            Ok(())
        })
        .await??;

        Ok(())
    }
}
