//! Stage adapters plugged into the conversion engine.
//!
//! - [`Transcoder`]: audio kind to audio kind through a [`Converter`](crate::converter::Converter)
//! - [`ZipArchiver`]: any kind into a single zip archive

mod archive;
mod transcode;

pub use archive::ZipArchiver;
pub use transcode::Transcoder;
