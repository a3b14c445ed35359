//! # Registry Telemetry
//!
//! Observability for the registry ledger.
//!
//! ## Components
//!
//! - **Logs**: `tracing` subscriber with env filter and pretty or JSON output
//! - **Metrics**: Prometheus counters and histograms, rendered at `GET /metrics`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registry_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("telemetry");
//!     // Logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RG_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `RG_JSON_LOGS` | `true` in containers | JSON formatted logs |
//! | `RG_SERVICE_NAME` | `registry` | Service name attached to start-up log |

#![warn(missing_docs)]

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, BLOCKS_PROCESSED, BLOCK_DURATION,
    BLOCK_TRANSACTIONS_PROCESSED, MESSAGES_MOVED, QUEUES_REMOVED, REGISTRY, SUBSYSTEM_ERRORS,
    TRANSACTIONS_COMMITTED, TRANSACTIONS_FAILED, TRANSACTIONS_REROUTED, TRANSACTIONS_SUBMITTED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Register metrics and install the log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)?;
    Ok(())
}

/// Count an error against a subsystem.
///
/// ```rust,ignore
/// record_error!("rg-05", "out_of_order");
/// ```
#[macro_export]
macro_rules! record_error {
    ($subsystem:expr, $error_type:expr) => {
        $crate::SUBSYSTEM_ERRORS
            .with_label_values(&[$subsystem, $error_type])
            .inc()
    };
}
