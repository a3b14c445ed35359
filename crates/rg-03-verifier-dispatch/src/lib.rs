//! # RG-03 Verifier Dispatch
//!
//! Routes each transaction to the verifier of its payload family.
//!
//! **Subsystem ID:** 03
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Families
//!
//! The family of a payload type is its namespace prefix:
//!
//! | Payload type | Family |
//! |--------------|--------|
//! | `project_origin.electricity.v1.IssuedEvent` | `project_origin.electricity.v1` |
//! | `chat.Message` | `chat` |
//!
//! Families are registered explicitly in a [`VerifierRegistry`] at start-up,
//! usually as a [`RemoteVerifier`] posting to the family's verifier service.
//! A family without a verifier is a configuration error
//! ([`DispatchError::UnknownFamily`]), never a rejected transaction.
//!
//! ## Module Structure
//!
//! ```text
//! rg-03-verifier-dispatch/
//! ├── domain/          # VerificationResult, payload_family, DispatchError
//! ├── ports/           # TransactionVerifier (inbound), Verifier (outbound)
//! ├── adapters/        # HashIntegrityVerifier, RemoteVerifier, VerifierKind
//! └── service.rs       # VerifierRegistry
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{HashIntegrityVerifier, RemoteVerifier, VerifierKind, VerifyTransactionRequest};
pub use domain::{payload_family, DispatchError, Result, VerificationResult};
pub use ports::{TransactionVerifier, Verifier};
pub use service::VerifierRegistry;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
