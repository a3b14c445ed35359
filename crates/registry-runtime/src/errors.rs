//! # Runtime Errors

use rg_01_queue_routing::RoutingError;
use rg_02_transaction_store::KVStoreError;
use rg_05_transaction_processor::ProcessorError;
use rg_06_block_finalizer::FinalizerError;
use thiserror::Error;

use crate::container::ConfigError;

/// Errors that stop the registry instance.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Queue routing or cleanup failed.
    #[error("[rg-01] {0}")]
    Routing(#[from] RoutingError),

    /// Storage backend could not be opened.
    #[error("[rg-02] storage backend: {0}")]
    Storage(#[from] KVStoreError),

    /// A transaction processor worker failed.
    #[error("[rg-05] {0}")]
    Processor(#[from] ProcessorError),

    /// The block finalizer failed.
    #[error("[rg-06] {0}")]
    Finalizer(#[from] FinalizerError),

    /// HTTP listener failed.
    #[error("api server: {0}")]
    Server(String),

    /// A background task panicked or was aborted.
    #[error("task terminated: {0}")]
    TaskTerminated(String),

    /// A subsystem returned without being asked to stop.
    #[error("{0} stopped unexpectedly")]
    Stopped(&'static str),
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
