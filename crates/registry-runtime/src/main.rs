//! # Registry Node
//!
//! Entry point of one registry instance.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (`RG_LOG_LEVEL`, `RG_JSON_LOGS`)
//! 2. Load configuration (defaults, `RG_CONFIG` file, `RG_*` overrides)
//! 3. Open backends and wire the subsystems
//! 4. Start processors, cleanup, finalizer (server 0) and the HTTP surface
//! 5. Run until Ctrl+C or until a task fails

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use registry_runtime::{RegistryConfig, RegistryContainer, RegistryRuntime};
use registry_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry).context("Failed to initialize telemetry")?;

    let config = RegistryConfig::load().context("Failed to load configuration")?;
    let container = RegistryContainer::open(config).context("Failed to initialize subsystems")?;

    let mut runtime = RegistryRuntime::new(Arc::new(container));
    runtime.start().await.context("Failed to start registry")?;
    info!("Registry is running. Press Ctrl+C to stop.");

    let outcome = tokio::select! {
        result = runtime.wait() => result.context("Registry task failed"),
        signal = tokio::signal::ctrl_c() => {
            info!("Ctrl+C received");
            signal.context("Failed to listen for Ctrl+C")
        }
    };
    if let Err(e) = &outcome {
        error!(error = %format!("{e:#}"), "Registry stopping after failure");
    }

    runtime.shutdown().await.context("Shutdown failed")?;
    outcome
}
