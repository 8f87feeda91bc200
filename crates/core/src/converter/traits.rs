//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ConverterError;
use super::types::{MediaInfo, TranscodeRequest, Transcoded};

/// Transcodes single audio files.
#[async_trait]
pub trait Converter: Send + Sync {
    fn name(&self) -> &str;

    /// Reads format and stream information from `path`.
    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError>;

    /// Encodes `request.input` into `request.output`, creating its directory.
    async fn convert(&self, request: TranscodeRequest) -> Result<Transcoded, ConverterError>;

    /// Checks that the converter can run at all.
    async fn validate(&self) -> Result<(), ConverterError>;
}
