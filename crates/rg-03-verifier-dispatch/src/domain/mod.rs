//! # Domain Layer
//!
//! - `entities`: `VerificationResult`, payload family parsing
//! - `errors`: `DispatchError`

pub mod entities;
pub mod errors;

pub use entities::{payload_family, VerificationResult};
pub use errors::DispatchError;

/// Dispatch result type.
pub type Result<T> = std::result::Result<T, DispatchError>;
