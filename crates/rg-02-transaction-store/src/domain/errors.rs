//! # Domain Errors
//!
//! Error types for the Transaction Store subsystem.
//!
//! | Error | Class |
//! |-------|-------|
//! | `OutOfOrder` | ordering/concurrency, fatal for the worker |
//! | `PreviousBlockUnpublished`, `BlockAlreadyFinalized` | invariant violation |
//! | `Database`, `Codec` | infrastructure |

use shared_types::{BlockHash, CodecError, TransactionHash};
use thiserror::Error;
use uuid::Uuid;

/// Transaction store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `stream_index` was not the current length of the stream.
    #[error("The transaction on stream {stream_id} has an invalid stream index {stream_index}, expected {expected}")]
    OutOfOrder {
        /// Stream written to.
        stream_id: Uuid,
        /// Index supplied by the caller.
        stream_index: u64,
        /// Current stream length.
        expected: u64,
    },

    /// A transaction with this hash is already stored.
    #[error("Transaction {0} is already stored")]
    DuplicateTransaction(TransactionHash),

    /// The latest block has no publication yet.
    #[error("Previous block has not been published")]
    PreviousBlockUnpublished,

    /// The block already carries a different publication.
    #[error("Block {0} is already finalized with a different publication")]
    BlockAlreadyFinalized(BlockHash),

    /// Block construction was asked to cover no transactions.
    #[error("Cannot build a block without transactions")]
    EmptyBlock,

    /// No block with this hash.
    #[error("Block {0} not found")]
    BlockNotFound(BlockHash),

    /// Stored bytes did not decode.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Backing key-value store failed.
    #[error("Database error: {0}")]
    Database(#[from] KVStoreError),
}

impl StoreError {
    /// Transient failure; the operation may succeed when retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Database(KVStoreError::IOError { .. }))
    }

    /// Signals a routing or concurrency bug rather than a bad transaction.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::OutOfOrder { .. } | Self::BlockAlreadyFinalized(_) | Self::Codec(_)
        )
    }
}

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError {
        /// Backend message.
        message: String,
    },

    /// Stored value is malformed.
    #[error("KV store corruption: {message}")]
    CorruptionError {
        /// What was malformed.
        message: String,
    },
}

impl From<bincode::Error> for KVStoreError {
    fn from(err: bincode::Error) -> Self {
        KVStoreError::CorruptionError {
            message: err.to_string(),
        }
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Database(err.into())
    }
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
