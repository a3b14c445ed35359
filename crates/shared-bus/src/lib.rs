//! # Shared Bus - Work Queues Between Registry Components
//!
//! The registry moves transactions between its front door, its verification
//! workers and the queue cleanup reconciler exclusively through named,
//! durable work queues.
//!
//! ## Queue Semantics
//!
//! ```text
//! publish(queue, bytes) ──→ [ready] ──consume/basic_get──→ [unacked] ──ack──→ gone
//!                              ↑                               │
//!                              └────────nack(requeue)──────────┘
//! ```
//!
//! - Delivery is at-least-once: an unacknowledged message is redelivered
//!   after a `nack` with requeue.
//! - Message bodies are opaque bytes; the registry sends encoded transactions.
//! - Queues are listed with their ready-message counts so stale queues can be
//!   drained after a topology change.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod broker;
pub mod errors;
pub mod memory;

// Re-export main types
pub use broker::{Delivery, MessageBroker, QueueInfo};
pub use errors::BrokerError;
pub use memory::InMemoryMessageBroker;
