//! Transcoding stage: one audio file in, one audio file out.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::converter::{Converter, ConverterError, EncodeOptions, TranscodeRequest};
use crate::engine::{ConversionJob, EngineError, JobSpec, StageAdapter, StageError};
use crate::kind::FileKind;
use crate::paths;

/// Converts each item to `dest_kind` next to the other outputs in `output_path`.
pub struct Transcoder<C: Converter> {
    converter: Arc<C>,
    bitrate_kbps: Option<u32>,
}

impl<C: Converter + 'static> Transcoder<C> {
    pub fn new(converter: Arc<C>) -> Self {
        Self {
            converter,
            bitrate_kbps: None,
        }
    }

    /// Sets the bitrate used for lossy destination formats.
    pub fn with_bitrate(mut self, bitrate_kbps: Option<u32>) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }

    /// Builds a job transcoding `source` items under `input` into `dest`.
    ///
    /// `output` defaults to the directory containing `input`.
    pub fn job(
        self,
        source: FileKind,
        dest: FileKind,
        input: impl Into<PathBuf>,
        output: Option<PathBuf>,
    ) -> Result<ConversionJob<Self>, EngineError> {
        if source != dest && dest.audio_format().is_none() {
            return Err(EngineError::invalid_argument(format!(
                "cannot transcode to '{}'",
                dest
            )));
        }
        ConversionJob::new(self, source, dest, input, output)
    }

    pub fn converter(&self) -> &Arc<C> {
        &self.converter
    }
}

#[async_trait]
impl<C: Converter + 'static> StageAdapter for Transcoder<C> {
    fn name(&self) -> &str {
        "transcode"
    }

    async fn prepare(&self, spec: &JobSpec) -> Result<(), StageError> {
        tokio::fs::create_dir_all(&spec.output_path).await?;
        Ok(())
    }

    async fn convert_one(&self, spec: &JobSpec, item: &Path) -> Result<(), StageError> {
        let format = spec
            .dest_kind
            .audio_format()
            .ok_or_else(|| ConverterError::EncoderUnavailable {
                encoder: spec.dest_kind.to_string(),
            })?;

        let request = TranscodeRequest::new(
            item,
            paths::output_path_for(item, &spec.output_path, spec.dest_kind),
            EncodeOptions::new(format).with_bitrate(self.bitrate_kbps),
        );

        let done = self.converter.convert(request).await?;
        debug!(
            job_id = %spec.id,
            item = %item.display(),
            output = %done.output.display(),
            bytes = done.bytes,
            elapsed_ms = done.elapsed.as_millis() as u64,
            "Transcoded"
        );
        Ok(())
    }
}
