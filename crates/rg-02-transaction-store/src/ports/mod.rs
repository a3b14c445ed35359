//! # Ports Layer
//!
//! - `inbound`: `TransactionStore`, the API this crate provides
//! - `outbound`: `KeyValueStore`, the backend the durable store requires

pub mod inbound;
pub mod outbound;

pub use inbound::TransactionStore;
pub use outbound::{BatchOperation, KeyValueStore, ScanResult};
