//! # Ports Layer
//!
//! - `inbound`: `TransactionStatusApi`
//! - `outbound`: `DistributedCache`

pub mod inbound;
pub mod outbound;

pub use inbound::TransactionStatusApi;
pub use outbound::DistributedCache;
