//! Converter module for transcoding audio files.
//!
//! This module provides the `Converter` trait and an implementation that
//! drives the `ffmpeg`/`ffprobe` binaries as external processes. The
//! transcoding stage calls it once per item; the engine never sees it.
//!
//! # Example
//!
//! ```ignore
//! use wavezip_core::converter::{AudioFormat, Converter, EncodeOptions, FfmpegConverter, TranscodeRequest};
//!
//! let converter = FfmpegConverter::with_defaults();
//! converter.validate().await?;
//!
//! let done = converter
//!     .convert(TranscodeRequest::new(
//!         "/music/album/01.wav",
//!         "/music/album_tmp/01.mp3",
//!         EncodeOptions::new(AudioFormat::Mp3).with_bitrate(Some(256)),
//!     ))
//!     .await?;
//! println!("{} bytes in {:?}", done.bytes, done.elapsed);
//! ```

mod capabilities;
mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use capabilities::EncoderCapabilities;
pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::Converter;
pub use types::{AudioFormat, AudioStream, EncodeOptions, MediaInfo, TranscodeRequest, Transcoded};
