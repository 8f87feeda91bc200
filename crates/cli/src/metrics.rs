//! Prometheus registry for a wavezip run.
//!
//! Holds the per-job metrics from `wavezip_core::metrics` plus a counter of
//! whole pipeline runs.

use once_cell::sync::Lazy;
use prometheus::{self, Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Pipeline runs, by result.
pub static PIPELINE_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("wavezip_pipeline_runs_total", "Total pipeline runs"),
        &["result"], // result: "archived", "empty", "failed"
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry.register(Box::new(PIPELINE_RUNS.clone())).unwrap();

    for metric in wavezip_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Records the result of one pipeline run.
pub fn record_run(result: &str) {
    PIPELINE_RUNS.with_label_values(&[result]).inc();
}

/// Encodes all registered metrics in the Prometheus text format.
pub fn encode_metrics() -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
