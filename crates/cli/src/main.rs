mod cli;
mod metrics;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wavezip_core::{
    load_config, resolve_config_path, validate_config, ArchiveMessages, Config, ConsoleObserver,
    Converter, EncoderCapabilities, FfmpegConverter, FsPlacer, MetricsObserver, Pipeline,
    PipelineOutcome, TracingObserver, TranscodeMessages,
};

use cli::Args;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(config.logging.json);

    if let Err(e) = run(&args, config).await {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load(args: &Args) -> Result<Config> {
    let config_path = resolve_config_path(args.config.clone());
    let mut config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config from {:?}", path),
        None => "Failed to load config".to_string(),
    })?;

    args.apply(&mut config);
    validate_config(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Logs go to stderr so they never interleave with the progress lines.
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(args: &Args, config: Config) -> Result<()> {
    println!("#### wavezip Ver.{} ####", VERSION);

    let converter = FfmpegConverter::new(config.converter.clone());
    converter
        .validate()
        .await
        .context("ffmpeg is not available")?;

    let capabilities = EncoderCapabilities::detect(&config.converter).await;
    if let Some(format) = config.pipeline.intermediate_kind.audio_format() {
        capabilities
            .require(format)
            .context("ffmpeg cannot produce the intermediate kind")?;
    }

    info!(
        input = %args.input.display(),
        source_kind = %config.pipeline.source_kind,
        intermediate_kind = %config.pipeline.intermediate_kind,
        max_parallel = config.engine.effective_max_parallel(),
        "Starting wavezip"
    );

    let pipeline = Pipeline::from_config(
        &config,
        Arc::new(converter),
        Arc::new(FsPlacer::new(config.placer.clone())),
    )
    .with_transcode_observer(Arc::new(ConsoleObserver::<TranscodeMessages>::new()))
    .with_archive_observer(Arc::new(ConsoleObserver::<ArchiveMessages>::new()))
    .with_observer(Arc::new(TracingObserver::new()))
    .with_observer(Arc::new(MetricsObserver::new()));

    let result = pipeline.run(&args.input).await;
    let outcome = match result {
        Ok(outcome) => {
            metrics::record_run(if outcome.produced_archive() {
                "archived"
            } else {
                "empty"
            });
            outcome
        }
        Err(e) => {
            metrics::record_run("failed");
            print_metrics(args.metrics);
            return Err(e).with_context(|| format!("Conversion of {:?} failed", args.input));
        }
    };

    report(&outcome, args.json)?;
    print_metrics(args.metrics);
    Ok(())
}

fn report(outcome: &PipelineOutcome, json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(outcome).context("Failed to serialize outcome")?;
        println!("{}", rendered);
        return Ok(());
    }

    match &outcome.final_archive {
        Some(path) => print_final_archive(path),
        None => println!("\nNo archive was produced."),
    }
    println!(
        "Converted {}/{} file(s), archived {}/{}.",
        outcome.transcode.processed_count,
        outcome.transcode.total_count,
        outcome.archive.processed_count,
        outcome.archive.total_count,
    );
    if !outcome.intermediate_removed {
        println!("Intermediate files kept in {}", outcome.intermediate_dir.display());
    }
    Ok(())
}

fn print_final_archive(path: &Path) {
    println!("\n>> Final archive:\n>> {}\n", path.display());
}

fn print_metrics(enabled: bool) {
    if !enabled {
        return;
    }
    match metrics::encode_metrics() {
        Ok(text) => print!("{}", text),
        Err(e) => error!(error = %e, "Failed to encode metrics"),
    }
}
