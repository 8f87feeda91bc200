//! File kinds handled by the conversion stages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::converter::AudioFormat;

/// Classifies a file by its format, based on its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Every file (`*.*`). Only valid as a source kind.
    All,
    /// WAVE audio (`*.wav`)
    #[serde(alias = "wav")]
    Wave,
    /// MPEG Audio Layer III (`*.mp3`)
    Mp3,
    /// Free Lossless Audio Codec (`*.flac`)
    Flac,
    /// Ogg Vorbis (`*.ogg`)
    Ogg,
    /// Opus (`*.opus`)
    Opus,
    /// ZIP archive (`*.zip`)
    Zip,
}

impl FileKind {
    /// Returns the extension without the leading period, or `None` for [`FileKind::All`].
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Wave => Some("wav"),
            Self::Mp3 => Some("mp3"),
            Self::Flac => Some("flac"),
            Self::Ogg => Some("ogg"),
            Self::Opus => Some("opus"),
            Self::Zip => Some("zip"),
        }
    }

    /// Whether `path` belongs to this kind.
    ///
    /// The comparison is exact: `track.WAV` is not a [`FileKind::Wave`].
    pub fn matches(&self, path: &Path) -> bool {
        match self.extension() {
            None => true,
            Some(ext) => path.extension().and_then(|e| e.to_str()) == Some(ext),
        }
    }

    /// The ffmpeg audio format producing this kind, if it is an audio kind.
    pub fn audio_format(&self) -> Option<AudioFormat> {
        match self {
            Self::Wave => Some(AudioFormat::Wav),
            Self::Mp3 => Some(AudioFormat::Mp3),
            Self::Flac => Some(AudioFormat::Flac),
            Self::Ogg => Some(AudioFormat::OggVorbis),
            Self::Opus => Some(AudioFormat::Opus),
            Self::All | Self::Zip => None,
        }
    }

    /// Whether this kind can be produced by a stage.
    pub fn is_concrete(&self) -> bool {
        !matches!(self, Self::All)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension().unwrap_or("*"))
    }
}

/// Error returned when a kind name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown file kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for FileKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "all" | "*" => Ok(Self::All),
            "wave" | "wav" => Ok(Self::Wave),
            "mp3" => Ok(Self::Mp3),
            "flac" => Ok(Self::Flac),
            "ogg" | "vorbis" => Ok(Self::Ogg),
            "opus" => Ok(Self::Opus),
            "zip" => Ok(Self::Zip),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}
