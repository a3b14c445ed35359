//! # Periodic Finalization

use registry_telemetry::record_error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, trace};

use crate::domain::Result;
use crate::ports::BlockFinalizer;

/// Default pause between finalization runs.
pub const DEFAULT_BLOCK_INTERVAL: Duration = Duration::from_secs(1);

/// Runs a `BlockFinalizer` every `interval`.
pub struct BlockFinalizerService {
    finalizer: Arc<dyn BlockFinalizer>,
    interval: Duration,
}

impl BlockFinalizerService {
    /// Create the periodic runner.
    pub fn new(finalizer: Arc<dyn BlockFinalizer>, interval: Duration) -> Self {
        Self {
            finalizer,
            interval,
        }
    }

    /// Tick, run, repeat until `shutdown` flips to `true`.
    ///
    /// A failing run is logged as critical and ends the loop with its error.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(interval_ms = self.interval.as_millis() as u64, "[rg-06] Block finalizer started");
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    info!("[rg-06] Shutdown signal received");
                    return Ok(());
                }
            }

            trace!("[rg-06] Executing block finalizer");
            if let Err(e) = self.finalizer.execute().await {
                error!(error = %e, critical = true, "[rg-06] Error executing block finalizer");
                record_error!("rg-06", if e.is_fatal() { "fatal" } else { "finalization" });
                return Err(e);
            }
        }
    }
}
