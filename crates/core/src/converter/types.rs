//! Audio formats and the request/response types of a single transcode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Audio encodings the converter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    OggVorbis,
    Opus,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 5] = [
        Self::Wav,
        Self::Mp3,
        Self::Flac,
        Self::OggVorbis,
        Self::Opus,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::OggVorbis => "ogg",
            Self::Opus => "opus",
        }
    }

    /// Name of the ffmpeg encoder, as printed by `ffmpeg -encoders`.
    pub fn encoder(self) -> &'static str {
        match self {
            Self::Wav => "pcm_s16le",
            Self::Mp3 => "libmp3lame",
            Self::Flac => "flac",
            Self::OggVorbis => "libvorbis",
            Self::Opus => "libopus",
        }
    }

    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Mp3 | Self::OggVorbis | Self::Opus)
    }

    /// Bitrate used when none is configured; `None` for lossless formats.
    pub fn default_bitrate_kbps(self) -> Option<u32> {
        match self {
            Self::Mp3 => Some(320),
            Self::OggVorbis => Some(256),
            Self::Opus => Some(160),
            Self::Wav | Self::Flac => None,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// How one file is encoded. Unset sample rate and channels keep the source's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    pub format: AudioFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate_hz: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
}

impl EncodeOptions {
    /// Options for `format` at its default bitrate.
    pub fn new(format: AudioFormat) -> Self {
        Self {
            format,
            bitrate_kbps: format.default_bitrate_kbps(),
            sample_rate_hz: None,
            channels: None,
        }
    }

    /// Overrides the bitrate. `None` keeps the current one.
    pub fn with_bitrate(mut self, bitrate_kbps: Option<u32>) -> Self {
        if bitrate_kbps.is_some() {
            self.bitrate_kbps = bitrate_kbps;
        }
        self
    }

    pub fn with_sample_rate(mut self, hz: u32) -> Self {
        self.sample_rate_hz = Some(hz);
        self
    }

    pub fn with_channels(mut self, channels: u8) -> Self {
        self.channels = Some(channels);
        self
    }

    /// The bitrate passed to the encoder; lossless formats ignore it.
    pub fn effective_bitrate_kbps(&self) -> Option<u32> {
        if self.format.is_lossy() {
            self.bitrate_kbps
        } else {
            None
        }
    }
}

/// One file to transcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: EncodeOptions,
}

impl TranscodeRequest {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, options: EncodeOptions) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            options,
        }
    }
}

/// A finished transcode.
#[derive(Debug, Clone)]
pub struct Transcoded {
    pub output: PathBuf,
    /// Size of the written file.
    pub bytes: u64,
    pub elapsed: Duration,
}

/// The first audio stream of a probed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStream {
    pub codec: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate_hz: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
}

/// What ffprobe reports about a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub path: PathBuf,
    /// Container name, e.g. `wav` or `mp3`.
    pub container: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioStream>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoders() {
        assert_eq!(AudioFormat::Mp3.encoder(), "libmp3lame");
        assert_eq!(AudioFormat::OggVorbis.encoder(), "libvorbis");
        assert_eq!(AudioFormat::Wav.encoder(), "pcm_s16le");
        assert_eq!(AudioFormat::OggVorbis.to_string(), "ogg");
    }

    #[test]
    fn test_only_lossy_formats_have_a_bitrate() {
        for format in AudioFormat::ALL {
            assert_eq!(format.is_lossy(), format.default_bitrate_kbps().is_some());
        }
    }

    #[test]
    fn test_bitrate_override() {
        let options = EncodeOptions::new(AudioFormat::Mp3);
        assert_eq!(options.effective_bitrate_kbps(), Some(320));

        let options = options.with_bitrate(Some(192)).with_bitrate(None);
        assert_eq!(options.effective_bitrate_kbps(), Some(192));
    }

    #[test]
    fn test_lossless_ignores_bitrate() {
        let options = EncodeOptions::new(AudioFormat::Flac).with_bitrate(Some(320));
        assert_eq!(options.bitrate_kbps, Some(320));
        assert_eq!(options.effective_bitrate_kbps(), None);
    }
}
