//! Two-stage pipeline: transcode into an intermediate directory, archive it,
//! hand the archive over.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::types::PipelineOutcome;
use crate::config::Config;
use crate::converter::Converter;
use crate::engine::{ConversionJob, EngineConfig, StageAdapter};
use crate::observer::JobObserver;
use crate::paths;
use crate::placer::Placer;
use crate::stage::{Transcoder, ZipArchiver};

/// Runs the transcode stage, then the archive stage over its output.
pub struct Pipeline<C: Converter, P: Placer> {
    config: PipelineConfig,
    engine: EngineConfig,
    bitrate_kbps: Option<u32>,
    converter: Arc<C>,
    placer: Arc<P>,
    transcode_observers: Vec<Arc<dyn JobObserver>>,
    archive_observers: Vec<Arc<dyn JobObserver>>,
}

/// `<dir>_<yyyyMMdd_HHmmss_fff>` next to the directory containing `input`.
pub fn intermediate_dir_for(input: &Path, at: DateTime<Local>) -> PathBuf {
    let base = paths::containing_dir(input).unwrap_or_else(|| input.to_path_buf());
    let stamp = at.format("%Y%m%d_%H%M%S_%3f").to_string();
    paths::with_appended_suffix(&base, &format!("_{}", stamp))
}

impl<C: Converter + 'static, P: Placer + 'static> Pipeline<C, P> {
    /// Creates a pipeline with default settings.
    pub fn new(converter: Arc<C>, placer: Arc<P>) -> Self {
        Self {
            config: PipelineConfig::default(),
            engine: EngineConfig::default(),
            bitrate_kbps: None,
            converter,
            placer,
            transcode_observers: Vec::new(),
            archive_observers: Vec::new(),
        }
    }

    /// Creates a pipeline from the loaded configuration.
    pub fn from_config(config: &Config, converter: Arc<C>, placer: Arc<P>) -> Self {
        Self::new(converter, placer)
            .with_config(config.pipeline.clone())
            .with_engine_config(config.engine.clone())
            .with_bitrate(config.converter.bitrate_kbps)
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_engine_config(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Sets the bitrate used by the transcode stage.
    pub fn with_bitrate(mut self, bitrate_kbps: Option<u32>) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }

    /// Attaches an observer to both stages.
    pub fn with_observer(mut self, observer: Arc<dyn JobObserver>) -> Self {
        self.transcode_observers.push(Arc::clone(&observer));
        self.archive_observers.push(observer);
        self
    }

    /// Attaches an observer to the transcode stage only.
    pub fn with_transcode_observer(mut self, observer: Arc<dyn JobObserver>) -> Self {
        self.transcode_observers.push(observer);
        self
    }

    /// Attaches an observer to the archive stage only.
    pub fn with_archive_observer(mut self, observer: Arc<dyn JobObserver>) -> Self {
        self.archive_observers.push(observer);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs both stages for `input` (a directory or a single file).
    pub async fn run(&self, input: &Path) -> Result<PipelineOutcome, PipelineError> {
        self.run_at(input, Local::now()).await
    }

    /// Like [`run`](Self::run), naming the intermediate directory after `started`.
    pub async fn run_at(
        &self,
        input: &Path,
        started: DateTime<Local>,
    ) -> Result<PipelineOutcome, PipelineError> {
        let input = &paths::resolve(input)?;
        let intermediate = intermediate_dir_for(input, started);
        debug!(
            input = %input.display(),
            intermediate = %intermediate.display(),
            "Starting pipeline"
        );

        let transcode = self.attach(
            Transcoder::new(Arc::clone(&self.converter))
                .with_bitrate(self.bitrate_kbps)
                .job(
                    self.config.source_kind,
                    self.config.intermediate_kind,
                    input,
                    Some(intermediate.clone()),
                )?,
            &self.transcode_observers,
        );
        let transcode = transcode.run().await?;

        let archive_job = self.attach(
            ZipArchiver::new().job(self.config.intermediate_kind, &intermediate)?,
            &self.archive_observers,
        );
        let staged_archive = archive_job.output_path().to_path_buf();
        let archive = archive_job.run().await?;

        if transcode.processed_count > 0 && archive.processed_count > 0 {
            let final_archive = paths::with_appended_extension(input, "zip");
            self.placer.relocate(&staged_archive, &final_archive).await?;
            self.placer.remove_dir(&intermediate).await?;

            info!(
                archive = %final_archive.display(),
                files = archive.processed_count,
                "Pipeline produced archive"
            );

            return Ok(PipelineOutcome {
                transcode,
                archive,
                intermediate_dir: intermediate,
                intermediate_removed: true,
                final_archive: Some(final_archive),
            });
        }

        let intermediate_removed = self.cleanup(&intermediate, &staged_archive).await?;
        warn!(
            input = %input.display(),
            transcoded = transcode.processed_count,
            archived = archive.processed_count,
            "Pipeline produced no archive"
        );

        Ok(PipelineOutcome {
            transcode,
            archive,
            intermediate_dir: intermediate,
            intermediate_removed,
            final_archive: None,
        })
    }

    fn attach<A: StageAdapter>(
        &self,
        job: ConversionJob<A>,
        observers: &[Arc<dyn JobObserver>],
    ) -> ConversionJob<A> {
        observers
            .iter()
            .fold(job.with_config(&self.engine), |job, observer| {
                job.with_observer(Arc::clone(observer))
            })
    }

    /// Applies the cleanup policy when no archive was handed over.
    async fn cleanup(&self, intermediate: &Path, staged_archive: &Path) -> Result<bool, PipelineError> {
        if self.config.cleanup_intermediate {
            self.placer.remove_dir(intermediate).await?;
            if staged_archive.is_file() {
                tokio::fs::remove_file(staged_archive).await?;
            }
            return Ok(true);
        }

        if self.config.remove_intermediate_files && intermediate.is_dir() {
            let removed = paths::remove_files_of_kind(intermediate, self.config.intermediate_kind)?;
            debug!(
                intermediate = %intermediate.display(),
                removed,
                "Swept intermediate files"
            );
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_intermediate_dir_for_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let album = temp.path().join("album");
        std::fs::create_dir(&album).unwrap();

        let at = Local.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap()
            + chrono::Duration::milliseconds(6);
        assert_eq!(
            intermediate_dir_for(&album, at),
            temp.path().join("album_20240102_150405_006")
        );
    }

    #[test]
    fn test_intermediate_dir_for_file_uses_parent() {
        let temp = tempfile::TempDir::new().unwrap();
        let album = temp.path().join("album");
        std::fs::create_dir(&album).unwrap();
        let file = album.join("01.wav");
        std::fs::write(&file, b"RIFF").unwrap();

        let at = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap();
        assert_eq!(
            intermediate_dir_for(&file, at),
            temp.path().join("album_20241231_235958_000")
        );
    }
}
