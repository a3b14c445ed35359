//! # Shared Types Crate
//!
//! This crate contains the registry data model shared by every subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Canonical Encoding**: Transactions, headers and publications are
//!   hashed over their bincode encoding, so every component derives the same
//!   `TransactionHash`/`BlockHash` from the same value.
//! - **Opaque Payloads**: The registry never interprets `Transaction::payload`;
//!   only verifiers do.

pub mod entities;
pub mod errors;
pub mod hashes;
pub mod status;

pub use entities::*;
pub use errors::*;
pub use hashes::*;
pub use status::*;
