//! # Cache Errors

use rg_02_transaction_store::StoreError;
use thiserror::Error;

/// Status cache error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Cache backend unreachable or failed.
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// Cached value is not a status record.
    #[error("Invalid cached status record: {0}")]
    Serialization(String),

    /// Store fallback failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

impl CacheError {
    /// Check if error is recoverable (should retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Backend(_) => true,
            Self::Store(err) => err.is_recoverable(),
            Self::Serialization(_) => false,
        }
    }
}

/// Status cache result type.
pub type Result<T> = std::result::Result<T, CacheError>;
