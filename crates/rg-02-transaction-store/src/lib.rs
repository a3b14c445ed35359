//! # RG-02 Transaction Store
//!
//! Append-only stream log, block creation and finalization.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - Append verified transactions to their stream, enforcing contiguous
//!   `stream_index` values per stream
//! - Cut the backlog into blocks with a Merkle root over the encoded
//!   transactions, chained to the previous header and publication
//! - Record block publications and answer status, block and proof queries
//!
//! ## Chain Rules
//!
//! | Rule | Enforced by |
//! |------|-------------|
//! | `stream_index` = stream length | `store` (`OutOfOrder`) |
//! | one row per transaction hash | `store` (`DuplicateTransaction`) |
//! | no new block before the previous is published | `create_next_block` (`PreviousBlockUnpublished`) |
//! | a publication is recorded once | `finalize_block` (`BlockAlreadyFinalized`) |
//!
//! Block length for `n` pending transactions is
//! `min(2^min(ceil(log2 n), 20), n)`.
//!
//! ## Module Structure
//!
//! ```text
//! rg-02-transaction-store/
//! ├── domain/          # BlockRecord, MerkleTree, StoreError
//! ├── algorithms/      # BlockBuilder
//! ├── ports/           # TransactionStore (inbound), KeyValueStore (outbound)
//! ├── adapters/        # In-memory store, KV-backed store, KV backends
//! └── service/         # MerkleProofService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::storage::{FileBackedKVStore, InMemoryKVStore};
#[cfg(feature = "rocksdb")]
pub use adapters::storage::{RocksDbConfig, RocksDbStore};
pub use adapters::{InMemoryTransactionStore, KvTransactionStore};
pub use algorithms::BlockBuilder;
pub use domain::{
    block_length, BlockRecord, KVStoreError, MerkleProof, MerkleTree, ProofNode, Result,
    SiblingPosition, StoreError, MAX_BLOCK_EXPONENT,
};
pub use ports::{BatchOperation, KeyValueStore, ScanResult, TransactionStore};
pub use service::{MerkleProofService, TransactionProof};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
