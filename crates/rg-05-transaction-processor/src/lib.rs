//! # RG-05 Transaction Processor
//!
//! Queue workers that turn submitted transactions into stream entries.
//!
//! **Subsystem ID:** 05
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Delivery Handling
//!
//! | Delivery | Action | Ack |
//! |----------|--------|-----|
//! | stream owned by this queue | verify procedure | after completion |
//! | stream owned by another queue | republish there | after publish |
//! | not a transaction | status `Failed` | after status write |
//! | any error | requeue, worker stops | nack |
//!
//! Redelivered transactions that are already on their stream are
//! recognised by hash and only get their `Committed` status re-applied.
//!
//! ## Module Structure
//!
//! ```text
//! rg-05-transaction-processor/
//! ├── domain/          # VerifyOutcome, DeliveryOutcome, ProcessorError
//! ├── ports/           # TransactionProcessor
//! └── service/         # Dispatcher, Worker, Manager
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use domain::{DeliveryOutcome, ProcessorError, Result, VerifyOutcome};
pub use ports::TransactionProcessor;
pub use service::{
    TransactionProcessorDispatcher, TransactionProcessorManager, TransactionProcessorWorker,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
