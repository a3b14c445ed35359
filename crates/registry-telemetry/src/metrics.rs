//! Prometheus metrics for registry subsystems.
//!
//! All metrics follow the naming convention: `rg_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SUBMISSION
    // =========================================================================

    /// Transactions accepted by `SendTransactions`
    pub static ref TRANSACTIONS_SUBMITTED: Counter = Counter::new(
        "rg_registry_transactions_submitted_total",
        "Total transactions accepted for processing"
    ).expect("metric creation failed");

    // =========================================================================
    // TRANSACTION PROCESSOR (Subsystem 5)
    // =========================================================================

    /// Transactions verified and appended to their stream
    pub static ref TRANSACTIONS_COMMITTED: Counter = Counter::new(
        "rg_processor_transactions_committed_total",
        "Total transactions committed to their stream"
    ).expect("metric creation failed");

    /// Transactions rejected by ownership or verifier checks
    pub static ref TRANSACTIONS_FAILED: Counter = Counter::new(
        "rg_processor_transactions_failed_total",
        "Total transactions rejected"
    ).expect("metric creation failed");

    /// Deliveries republished to another queue after a topology change
    pub static ref TRANSACTIONS_REROUTED: Counter = Counter::new(
        "rg_processor_transactions_rerouted_total",
        "Total misrouted deliveries republished"
    ).expect("metric creation failed");

    // =========================================================================
    // BLOCK FINALIZER (Subsystem 6)
    // =========================================================================

    /// Blocks published and finalized
    pub static ref BLOCKS_PROCESSED: Counter = Counter::new(
        "rg_finalizer_blocks_processed_total",
        "Total blocks published and finalized"
    ).expect("metric creation failed");

    /// Transactions moved to Finalized
    pub static ref BLOCK_TRANSACTIONS_PROCESSED: Counter = Counter::new(
        "rg_finalizer_transactions_processed_total",
        "Total transactions finalized"
    ).expect("metric creation failed");

    /// Time from block creation to finalization
    pub static ref BLOCK_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "rg_finalizer_block_duration_seconds",
            "Time spent creating, publishing and finalizing a block"
        ).buckets(exponential_buckets(0.001, 2.0, 15).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // QUEUE CLEANUP (Subsystem 1)
    // =========================================================================

    /// Inactive queues deleted
    pub static ref QUEUES_REMOVED: Counter = Counter::new(
        "rg_cleanup_queues_removed_total",
        "Total inactive queues deleted"
    ).expect("metric creation failed");

    /// Messages moved out of inactive queues
    pub static ref MESSAGES_MOVED: Counter = Counter::new(
        "rg_cleanup_messages_moved_total",
        "Total messages republished from inactive queues"
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Subsystem errors by type
    pub static ref SUBSYSTEM_ERRORS: CounterVec = CounterVec::new(
        Opts::new("rg_subsystem_errors_total", "Errors by subsystem and type"),
        &["subsystem", "error_type"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling it more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Submission
        Box::new(TRANSACTIONS_SUBMITTED.clone()),
        // Processor
        Box::new(TRANSACTIONS_COMMITTED.clone()),
        Box::new(TRANSACTIONS_FAILED.clone()),
        Box::new(TRANSACTIONS_REROUTED.clone()),
        // Finalizer
        Box::new(BLOCKS_PROCESSED.clone()),
        Box::new(BLOCK_TRANSACTIONS_PROCESSED.clone()),
        Box::new(BLOCK_DURATION.clone()),
        // Cleanup
        Box::new(QUEUES_REMOVED.clone()),
        Box::new(MESSAGES_MOVED.clone()),
        // Errors
        Box::new(SUBSYSTEM_ERRORS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics_twice() {
        register_metrics().unwrap();
        register_metrics().unwrap();
    }

    #[test]
    fn test_encoded_output_names_metrics() {
        register_metrics().unwrap();
        TRANSACTIONS_SUBMITTED.inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("rg_registry_transactions_submitted_total"));
    }

    #[test]
    fn test_histogram_timer_observes_on_drop() {
        let before = BLOCK_DURATION.get_sample_count();
        {
            let _timer = HistogramTimer::new(&BLOCK_DURATION);
        }
        assert!(BLOCK_DURATION.get_sample_count() > before);
    }
}
