//! # Ports Layer
//!
//! - `inbound`: `TransactionVerifier`, what the processor calls
//! - `outbound`: `Verifier`, one implementation per payload family

pub mod inbound;
pub mod outbound;

pub use inbound::TransactionVerifier;
pub use outbound::Verifier;
