//! # RG-01 Queue Routing
//!
//! Work sharding across verification workers.
//!
//! **Subsystem ID:** 01  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Map every stream to exactly one of `servers × threads` logical queues so
//! that a stream's transactions are always verified by the same worker:
//! - Consistent hash ring with `weight` virtual nodes per queue
//! - Minimal remapping when the topology shrinks or grows
//! - Stale queue detection and draining after a rescale
//!
//! ## Queue Naming
//!
//! | Slot | Queue |
//! |------|-------|
//! | server 0, thread 0 | `registry_0.verifier_0` |
//! | server 2, thread 5 | `registry_2.verifier_5` |
//!
//! ## Module Structure
//!
//! ```text
//! rg-01-queue-routing/
//! ├── domain/          # TopologyOptions, QueueSlot, RoutingError
//! ├── algorithms/      # Consistent hash ring
//! ├── ports/           # QueueResolver trait
//! └── service/         # Ring-backed resolver, QueueCleanupService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use algorithms::{ring_position, ConsistentHashRing};
pub use domain::{QueueSlot, RoutingError, TopologyOptions, MAX_SERVERS, MAX_THREADS, MAX_WEIGHT};
pub use ports::QueueResolver;
pub use service::{
    CleanupReport, ConsistentHashRingQueueResolver, QueueCleanupService, DEFAULT_CLEANUP_INTERVAL,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
