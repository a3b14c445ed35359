//! # Domain Layer

pub mod errors;

pub use errors::{FinalizerError, Result};

use shared_types::BlockHash;

/// A block that was published and finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedBlock {
    /// Hash of the finalized header.
    pub block_hash: BlockHash,
    /// Transactions moved to `Finalized`.
    pub transaction_count: usize,
}
