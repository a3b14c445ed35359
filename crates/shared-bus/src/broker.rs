//! # Message Broker Port
//!
//! The contract the registry needs from a durable work-queue broker.

use crate::errors::BrokerError;
use async_trait::async_trait;

/// A message handed to a consumer, outstanding until acked or nacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Queue the message was taken from.
    pub queue: String,
    /// Broker-assigned tag used to ack/nack this delivery.
    pub delivery_tag: u64,
    /// True when the message was requeued at least once.
    pub redelivered: bool,
    /// Opaque message body.
    pub body: Vec<u8>,
}

/// A physical queue and its ready-message count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueInfo {
    /// Queue name.
    pub name: String,
    /// Messages waiting for delivery.
    pub messages: usize,
}

/// Durable work-queue broker.
///
/// Implementations must deliver every published message at least once
/// and must not lose unacknowledged messages.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Create `queue` if it does not exist yet.
    async fn declare_queue(&self, queue: &str) -> Result<(), BrokerError>;

    /// Append `body` to `queue`, declaring the queue when needed.
    async fn publish(&self, queue: &str, body: Vec<u8>) -> Result<(), BrokerError>;

    /// Wait for the next message on a declared queue.
    async fn consume(&self, queue: &str) -> Result<Delivery, BrokerError>;

    /// Take the next message without waiting; `None` when the queue is empty.
    async fn basic_get(&self, queue: &str) -> Result<Option<Delivery>, BrokerError>;

    /// Acknowledge a delivery, removing the message permanently.
    async fn ack(&self, delivery_tag: u64) -> Result<(), BrokerError>;

    /// Reject a delivery; with `requeue` the message goes back to the head of its queue.
    async fn nack(&self, delivery_tag: u64, requeue: bool) -> Result<(), BrokerError>;

    /// All physical queues with their ready counts.
    async fn list_queues(&self) -> Result<Vec<QueueInfo>, BrokerError>;

    /// Remove `queue` together with any message still in it.
    async fn delete_queue(&self, queue: &str) -> Result<(), BrokerError>;
}
