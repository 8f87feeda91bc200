//! Converter backed by the `ffmpeg` and `ffprobe` binaries.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{AudioStream, MediaInfo, TranscodeRequest, Transcoded};

/// ffmpeg stderr lines kept for error reports.
const STDERR_TAIL_LINES: usize = 20;

static VERSION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:ffmpeg|ffprobe) version (\S+)").unwrap());

/// Runs one ffmpeg process per transcode.
pub struct FfmpegConverter {
    config: ConverterConfig,
}

impl FfmpegConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Command line for one request, without the program name.
    fn encode_args(&self, request: &TranscodeRequest) -> Vec<String> {
        let options = &request.options;
        let mut args: Vec<String> = [
            "-hide_banner",
            "-nostdin",
            "-loglevel",
            self.config.log_level.as_str(),
            "-y",
            "-i",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.push(request.input.display().to_string());

        // First audio stream only; drops embedded cover art.
        args.extend(["-map", "0:a:0", "-c:a", options.format.encoder()].map(String::from));

        if let Some(kbps) = options.effective_bitrate_kbps() {
            args.push("-b:a".into());
            args.push(format!("{}k", kbps));
        }
        if let Some(hz) = options.sample_rate_hz {
            args.push("-ar".into());
            args.push(hz.to_string());
        }
        if let Some(channels) = options.channels {
            args.push("-ac".into());
            args.push(channels.to_string());
        }

        args.extend(self.config.extra_args.iter().cloned());
        args.push(request.output.display().to_string());
        args
    }

    /// Spawns ffmpeg and waits for it under the configured timeout.
    async fn run_ffmpeg(&self, request: &TranscodeRequest) -> Result<(), ConverterError> {
        let args = self.encode_args(request);
        debug!(ffmpeg = %self.config.ffmpeg.display(), ?args, "Spawning ffmpeg");

        let mut child = Command::new(&self.config.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ConverterError::launch("ffmpeg", &self.config.ffmpeg, e))?;

        let stderr = child.stderr.take();
        let tail = tokio::spawn(async move {
            let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
            }
            Vec::from(tail)
        });

        let limit = self.config.timeout();
        let status = match timeout(limit, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!(input = %request.input.display(), error = %e, "Failed to kill ffmpeg");
                }
                tail.abort();
                return Err(ConverterError::TimedOut {
                    input: request.input.clone(),
                    after: limit,
                });
            }
        };

        let stderr = tail.await.unwrap_or_default();
        if !status.success() {
            return Err(ConverterError::exited(
                &request.input,
                describe(status),
                stderr,
            ));
        }
        if !stderr.is_empty() {
            trace!(input = %request.input.display(), ?stderr, "ffmpeg diagnostics");
        }
        Ok(())
    }

    fn parse_probe(path: &Path, json: &str) -> Result<MediaInfo, ConverterError> {
        #[derive(Deserialize)]
        struct Probe {
            format: Format,
            #[serde(default)]
            streams: Vec<Stream>,
        }

        #[derive(Deserialize)]
        struct Format {
            format_name: String,
            duration: Option<String>,
            size: Option<String>,
        }

        #[derive(Deserialize)]
        struct Stream {
            codec_type: String,
            codec_name: Option<String>,
            bit_rate: Option<String>,
            sample_rate: Option<String>,
            channels: Option<u8>,
        }

        let probe: Probe =
            serde_json::from_str(json).map_err(|e| ConverterError::probe(path, e.to_string()))?;

        let duration = probe
            .format
            .duration
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64);

        let audio = probe
            .streams
            .into_iter()
            .find(|s| s.codec_type == "audio")
            .map(|s| AudioStream {
                codec: s.codec_name.unwrap_or_else(|| "unknown".to_string()),
                bitrate_kbps: s
                    .bit_rate
                    .and_then(|b| b.parse::<u32>().ok())
                    .map(|bps| bps / 1000),
                sample_rate_hz: s.sample_rate.and_then(|r| r.parse().ok()),
                channels: s.channels,
            });

        // format_name can list aliases: "mov,mp4,m4a"
        let container = probe
            .format
            .format_name
            .split(',')
            .next()
            .unwrap_or_default()
            .to_string();

        Ok(MediaInfo {
            path: path.to_path_buf(),
            container,
            size_bytes: probe.format.size.and_then(|s| s.parse().ok()).unwrap_or(0),
            duration,
            audio,
        })
    }

    fn parse_version(output: &str) -> Option<String> {
        VERSION_LINE
            .captures(output)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Runs `<binary> -version` and extracts the version.
    async fn version_of(tool: &'static str, binary: &Path) -> Result<Option<String>, ConverterError> {
        let output = Command::new(binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ConverterError::launch(tool, binary, e))?;
        Ok(Self::parse_version(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn describe(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[async_trait]
impl Converter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError> {
        if !path.is_file() {
            return Err(ConverterError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new(&self.config.ffprobe)
            .args(["-v", "error", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ConverterError::launch("ffprobe", &self.config.ffprobe, e))?;

        if !output.status.success() {
            return Err(ConverterError::probe(
                path,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Self::parse_probe(path, &String::from_utf8_lossy(&output.stdout))
    }

    async fn convert(&self, request: TranscodeRequest) -> Result<Transcoded, ConverterError> {
        let started = Instant::now();

        if !request.input.is_file() {
            return Err(ConverterError::InputNotFound {
                path: request.input.clone(),
            });
        }
        if let Some(dir) = request.output.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| ConverterError::OutputDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        self.run_ffmpeg(&request).await?;

        let bytes = match tokio::fs::metadata(&request.output).await {
            Ok(meta) if meta.len() > 0 => meta.len(),
            _ => {
                return Err(ConverterError::NoOutput {
                    path: request.output.clone(),
                })
            }
        };

        Ok(Transcoded {
            output: request.output,
            bytes,
            elapsed: started.elapsed(),
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        let ffmpeg = Self::version_of("ffmpeg", &self.config.ffmpeg).await?;
        let ffprobe = Self::version_of("ffprobe", &self.config.ffprobe).await?;
        debug!(?ffmpeg, ?ffprobe, "ffmpeg toolchain available");
        Ok(())
    }
}
