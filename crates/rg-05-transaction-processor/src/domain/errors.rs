//! # Processor Errors
//!
//! A rejected transaction is not an error: it ends as a `Failed` status.
//! Everything here stops the worker that hit it, after the delivery was
//! returned to its queue.

use rg_02_transaction_store::StoreError;
use rg_03_verifier_dispatch::DispatchError;
use rg_04_status_cache::CacheError;
use shared_bus::BrokerError;
use shared_types::CodecError;
use thiserror::Error;

/// Transaction processing error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorError {
    /// Transaction store failed or refused the append.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Verifier dispatch failed.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Status cache failed.
    #[error("Status cache error: {0}")]
    Cache(#[from] CacheError),

    /// Broker operation failed.
    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    /// Stored transaction could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Worker task panicked or was aborted.
    #[error("Worker terminated abnormally: {0}")]
    WorkerTerminated(String),
}

impl ProcessorError {
    /// Check if error is recoverable (worker restart may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_recoverable(),
            Self::Dispatch(e) => e.is_recoverable(),
            Self::Cache(e) => e.is_recoverable(),
            Self::Broker(e) => matches!(e, BrokerError::Unavailable(_)),
            Self::Codec(_) | Self::WorkerTerminated(_) => false,
        }
    }

    /// Check if error signals a routing or configuration bug
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Store(e) => e.is_fatal(),
            Self::Dispatch(e) => e.is_fatal(),
            Self::Codec(_) => true,
            _ => false,
        }
    }

    /// Short label used for the error metric.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Store(StoreError::OutOfOrder { .. }) => "out_of_order",
            Self::Store(_) => "store",
            Self::Dispatch(DispatchError::UnknownFamily(_)) => "unknown_family",
            Self::Dispatch(_) => "verifier",
            Self::Cache(_) => "cache",
            Self::Broker(_) => "broker",
            Self::Codec(_) => "codec",
            Self::WorkerTerminated(_) => "worker_terminated",
        }
    }
}

/// Processor result type.
pub type Result<T> = std::result::Result<T, ProcessorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_out_of_order_is_fatal() {
        let err: ProcessorError = StoreError::OutOfOrder {
            stream_id: Uuid::nil(),
            stream_index: 3,
            expected: 1,
        }
        .into();
        assert!(err.is_fatal());
        assert!(!err.is_recoverable());
        assert_eq!(err.kind(), "out_of_order");
    }

    #[test]
    fn test_unknown_family_is_fatal() {
        let err: ProcessorError = DispatchError::UnknownFamily("chat".to_string()).into();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("chat"));
    }

    #[test]
    fn test_broker_outage_is_recoverable() {
        let err: ProcessorError = BrokerError::Unavailable("down".to_string()).into();
        assert!(err.is_recoverable());
        assert!(!err.is_fatal());
    }
}
