//! # Dispatch Errors

use thiserror::Error;

/// Errors raised while dispatching a transaction to its verifier.
///
/// A rejected transaction is not an error; it is a `VerificationResult`
/// with `valid == false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No verifier is registered for the payload family.
    #[error("No verifier found for transaction family {0}")]
    UnknownFamily(String),

    /// A verifier entry cannot be built, e.g. a malformed URL.
    #[error("Invalid verifier for family {family}: {message}")]
    InvalidVerifier {
        /// Family whose entry is invalid.
        family: String,
        /// What is wrong with it.
        message: String,
    },

    /// The verifier could not be reached or failed internally.
    #[error("Verifier for family {family} failed: {message}")]
    Verifier {
        /// Family whose verifier failed.
        family: String,
        /// Failure description.
        message: String,
    },
}

impl DispatchError {
    /// Check if error is recoverable (should retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Verifier { .. })
    }

    /// Check if error is fatal (configuration must change)
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnknownFamily(_) | Self::InvalidVerifier { .. })
    }
}
