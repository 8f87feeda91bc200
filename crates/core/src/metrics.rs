//! Prometheus metrics for conversion jobs.
//!
//! Updated by [`MetricsObserver`](crate::observer::MetricsObserver) only; the
//! engine itself does not touch them.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Items converted, by stage.
pub static ITEMS_CONVERTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "wavezip_items_converted_total",
            "Total items converted by a stage",
        ),
        &["stage"],
    )
    .unwrap()
});

/// Finished jobs, by stage and result.
pub static JOBS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("wavezip_jobs_total", "Total jobs finished"),
        &["stage", "result"], // result: "complete", "failed", "empty"
    )
    .unwrap()
});

/// Wall time from `Start` to `Complete`/`Failed`.
pub static JOB_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("wavezip_job_duration_seconds", "Duration of a job")
            .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 300.0, 900.0, 3600.0]),
        &["stage"],
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(ITEMS_CONVERTED.clone()),
        Box::new(JOBS_TOTAL.clone()),
        Box::new(JOB_DURATION.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }

        ITEMS_CONVERTED.with_label_values(&["unit"]).inc();
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|mf| mf.get_name().to_string())
            .collect();
        assert!(names.contains(&"wavezip_items_converted_total".to_string()));
    }
}
