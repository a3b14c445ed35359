//! # Broker Errors

use thiserror::Error;

/// Errors raised by a message broker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// Queue does not exist (never declared, or deleted).
    #[error("Queue not found: {0}")]
    QueueNotFound(String),

    /// Delivery tag is not outstanding on this broker.
    #[error("Unknown delivery tag: {0}")]
    UnknownDeliveryTag(u64),

    /// Broker connection failed.
    #[error("Broker unavailable: {0}")]
    Unavailable(String),
}
