//! # RG-04 Status Cache
//!
//! Transaction status records shared by every registry instance.
//!
//! **Subsystem ID:** 04
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Rules
//!
//! - Reads hit the cache first and fall back to the transaction store
//!   (`Committed` when stored, `Finalized` once its block is published).
//! - Writes never lower the status rank and are a compare-and-set against
//!   the value read; a lost race is logged and the write dropped.
//!
//! ## Module Structure
//!
//! ```text
//! rg-04-status-cache/
//! ├── domain/          # CacheError, key format
//! ├── ports/           # TransactionStatusApi (inbound), DistributedCache (outbound)
//! ├── adapters/        # LruDistributedCache
//! └── service.rs       # TransactionStatusService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{LruDistributedCache, DEFAULT_CACHE_CAPACITY};
pub use domain::{status_key, CacheError, Result};
pub use ports::{DistributedCache, TransactionStatusApi};
pub use service::TransactionStatusService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
