//! # Finalizer Errors
//!
//! Every error ends the periodic loop. A block left unpublished by a failed
//! iteration is picked up again on restart.

use rg_02_transaction_store::StoreError;
use rg_04_status_cache::CacheError;
use shared_types::CodecError;
use thiserror::Error;

/// Block finalization error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinalizerError {
    /// Block creation, lookup or finalization failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Status update failed.
    #[error("Status cache error: {0}")]
    Cache(#[from] CacheError),

    /// External log refused or failed the publication.
    #[error("Block publication failed: {0}")]
    Publish(String),

    /// Header could not be hashed.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

impl FinalizerError {
    /// Check if error is recoverable (next run may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_recoverable(),
            Self::Cache(e) => e.is_recoverable(),
            Self::Publish(_) => true,
            Self::Codec(_) => false,
        }
    }

    /// Check if error signals a broken chain invariant
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Store(e) => e.is_fatal(),
            Self::Codec(_) => true,
            _ => false,
        }
    }
}

/// Finalizer result type.
pub type Result<T> = std::result::Result<T, FinalizerError>;
