//! # RG-06 Block Finalizer
//!
//! Anchors blocks in an external immutable log.
//!
//! **Subsystem ID:** 06
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Every interval: take the unpublished block (or cut the next one), hand its
//! header to the [`BlockPublisher`], record the publication and move the
//! covered transactions to `Finalized`. Only server 0 of a registry runs it.
//!
//! Any failure stops the loop. Until the block is published no new block can
//! be created, so a stuck finalizer must surface rather than retry silently.
//!
//! ## Module Structure
//!
//! ```text
//! rg-06-block-finalizer/
//! ├── domain/          # FinalizedBlock, FinalizerError
//! ├── ports/           # BlockFinalizer (inbound), BlockPublisher (outbound)
//! ├── adapters/        # LogPublisher
//! └── service/         # BlockFinalizerJob, BlockFinalizerService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::LogPublisher;
pub use domain::{FinalizedBlock, FinalizerError, Result};
pub use ports::{BlockFinalizer, BlockPublisher};
pub use service::{BlockFinalizerJob, BlockFinalizerService, DEFAULT_BLOCK_INTERVAL};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
