//! # Error Types
//!
//! Defines error types shared across subsystems.

use thiserror::Error;

/// Errors raised while encoding or decoding registry entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Value could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Bytes did not decode into the expected entity.
    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    /// Hash string was not 32 bytes of hex.
    #[error("Invalid hash encoding: {0}")]
    InvalidHash(String),
}

impl From<bincode::Error> for CodecError {
    fn from(err: bincode::Error) -> Self {
        CodecError::Deserialization(err.to_string())
    }
}
