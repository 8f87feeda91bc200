//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use wavezip_core::{Config, FileKind};

/// Convert the WAVE files of a directory to MP3 and pack them into `<dir>.zip`.
#[derive(Debug, Parser)]
#[command(name = "wavezip", version)]
pub struct Args {
    /// Directory (or single file) holding the source audio.
    pub input: PathBuf,

    /// Configuration file. Falls back to $WAVEZIP_CONFIG, then ./wavezip.toml.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Kind picked up from the input (wav, flac, ...).
    #[arg(long, value_name = "KIND")]
    pub source_kind: Option<FileKind>,

    /// Kind written to the intermediate directory and archived (mp3, ogg, ...).
    #[arg(long, value_name = "KIND")]
    pub intermediate_kind: Option<FileKind>,

    /// Files converted at the same time (0 = one per CPU).
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Target bitrate for lossy formats, in kbps.
    #[arg(short, long, value_name = "KBPS")]
    pub bitrate: Option<u32>,

    /// Keep the intermediate directory when no archive is produced.
    #[arg(long)]
    pub keep_intermediate: bool,

    /// Log as JSON lines.
    #[arg(long)]
    pub json_logs: bool,

    /// Print the run outcome as JSON.
    #[arg(long)]
    pub json: bool,

    /// Print Prometheus metrics after the run.
    #[arg(long)]
    pub metrics: bool,
}

impl Args {
    /// Overrides configuration values given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(kind) = self.source_kind {
            config.pipeline.source_kind = kind;
        }
        if let Some(kind) = self.intermediate_kind {
            config.pipeline.intermediate_kind = kind;
        }
        if let Some(jobs) = self.jobs {
            config.engine.max_parallel = jobs;
        }
        if self.bitrate.is_some() {
            config.converter.bitrate_kbps = self.bitrate;
        }
        if self.keep_intermediate {
            config.pipeline.cleanup_intermediate = false;
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["wavezip", "/music/album"]).unwrap();
        assert_eq!(args.input, PathBuf::from("/music/album"));
        assert!(args.config.is_none());
        assert!(!args.metrics);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["wavezip"]).is_err());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Args::try_parse_from(["wavezip", "--source-kind", "aiff", "/x"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let args = Args::try_parse_from([
            "wavezip",
            "--source-kind",
            "flac",
            "--intermediate-kind",
            "ogg",
            "-j",
            "3",
            "-b",
            "256",
            "--keep-intermediate",
            "/music/album",
        ])
        .unwrap();

        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.pipeline.source_kind, FileKind::Flac);
        assert_eq!(config.pipeline.intermediate_kind, FileKind::Ogg);
        assert_eq!(config.engine.max_parallel, 3);
        assert_eq!(config.converter.bitrate_kbps, Some(256));
        assert!(!config.pipeline.cleanup_intermediate);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_apply_keeps_config_without_flags() {
        let args = Args::try_parse_from(["wavezip", "/music/album"]).unwrap();
        let mut config = Config::default();
        config.engine.max_parallel = 2;
        config.converter.bitrate_kbps = Some(128);

        args.apply(&mut config);

        assert_eq!(config.engine.max_parallel, 2);
        assert_eq!(config.converter.bitrate_kbps, Some(128));
        assert!(config.pipeline.cleanup_intermediate);
    }
}
