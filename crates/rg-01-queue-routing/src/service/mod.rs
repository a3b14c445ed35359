//! # Service Layer
//!
//! - `resolver`: ring-backed [`QueueResolver`](crate::ports::QueueResolver)
//! - `cleanup`: background reconciler for queues orphaned by a rescale

mod cleanup;
mod resolver;

pub use cleanup::{CleanupReport, QueueCleanupService, DEFAULT_CLEANUP_INTERVAL};
pub use resolver::ConsistentHashRingQueueResolver;
