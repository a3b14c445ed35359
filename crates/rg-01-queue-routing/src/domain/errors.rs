//! # Domain Errors
//!
//! Error types for the Queue Routing subsystem.

use shared_bus::BrokerError;
use thiserror::Error;

/// Queue routing error types.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Topology option outside its allowed range.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// Broker operation failed.
    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),
}

impl RoutingError {
    /// Check if error is recoverable (should retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Broker(BrokerError::Unavailable(_)))
    }

    /// Check if error is fatal (configuration must change)
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidTopology(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_topology_error() {
        let err = RoutingError::InvalidTopology("threads must be 1..=128, got 0".to_string());
        assert!(err.to_string().contains("threads"));
    }

    #[test]
    fn test_broker_error_conversion() {
        let err: RoutingError = BrokerError::Unavailable("connection refused".to_string()).into();
        assert!(err.to_string().contains("connection refused"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_classification() {
        assert!(RoutingError::InvalidTopology("weight".to_string()).is_fatal());
        assert!(!RoutingError::InvalidTopology("weight".to_string()).is_recoverable());
        let missing: RoutingError = BrokerError::QueueNotFound("q".to_string()).into();
        assert!(!missing.is_recoverable());
        assert!(!missing.is_fatal());
    }
}
