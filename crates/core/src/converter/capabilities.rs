//! Audio encoder capability detection.

use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::process::Command;

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::types::AudioFormat;

/// Audio encoders compiled into the local ffmpeg build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncoderCapabilities {
    /// LAME MP3 encoder
    pub libmp3lame: bool,
    /// Vorbis encoder
    pub libvorbis: bool,
    /// Opus encoder
    pub libopus: bool,
    /// Native FLAC encoder
    pub flac: bool,
    /// PCM 16-bit little-endian (WAVE)
    pub pcm_s16le: bool,
}

impl EncoderCapabilities {
    /// Detect available encoders by probing `ffmpeg -encoders`.
    ///
    /// A missing or failing ffmpeg yields no capabilities.
    pub async fn detect(config: &ConverterConfig) -> Self {
        let output = Command::new(&config.ffmpeg)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await;

        match output {
            Ok(o) if o.status.success() => Self::from_listing(&String::from_utf8_lossy(&o.stdout)),
            _ => Self::default(),
        }
    }

    /// Parses an `ffmpeg -encoders` listing.
    pub fn from_listing(listing: &str) -> Self {
        let has = |name: &str| {
            listing
                .lines()
                .any(|line| line.split_whitespace().nth(1) == Some(name))
        };

        Self {
            libmp3lame: has("libmp3lame"),
            libvorbis: has("libvorbis"),
            libopus: has("libopus"),
            flac: has("flac"),
            pcm_s16le: has("pcm_s16le"),
        }
    }

    /// Whether the encoder for `format` is available.
    pub fn supports(&self, format: AudioFormat) -> bool {
        match format {
            AudioFormat::Mp3 => self.libmp3lame,
            AudioFormat::OggVorbis => self.libvorbis,
            AudioFormat::Opus => self.libopus,
            AudioFormat::Flac => self.flac,
            AudioFormat::Wav => self.pcm_s16le,
        }
    }

    /// Fails with [`ConverterError::EncoderUnavailable`] if `format` cannot be produced.
    pub fn require(&self, format: AudioFormat) -> Result<(), ConverterError> {
        if self.supports(format) {
            Ok(())
        } else {
            Err(ConverterError::EncoderUnavailable {
                encoder: format.encoder().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "Encoders:
 V..... = Video
 ------
 A....D flac                 FLAC (Free Lossless Audio Codec)
 A..... libmp3lame           libmp3lame MP3 (MPEG audio layer 3) (codec mp3)
 A..... pcm_s16le            PCM signed 16-bit little-endian
";

    #[test]
    fn test_from_listing() {
        let caps = EncoderCapabilities::from_listing(LISTING);
        assert!(caps.libmp3lame);
        assert!(caps.flac);
        assert!(caps.pcm_s16le);
        assert!(!caps.libopus);
        assert!(!caps.libvorbis);
    }

    #[test]
    fn test_require() {
        let caps = EncoderCapabilities::from_listing(LISTING);
        assert!(caps.require(AudioFormat::Mp3).is_ok());
        assert!(matches!(
            caps.require(AudioFormat::Opus),
            Err(ConverterError::EncoderUnavailable { .. })
        ));
    }

    #[test]
    fn test_default_supports_nothing() {
        let caps = EncoderCapabilities::default();
        assert!(!caps.supports(AudioFormat::Mp3));
        assert!(!caps.supports(AudioFormat::Wav));
    }
}
