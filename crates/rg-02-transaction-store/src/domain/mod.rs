//! # Domain Layer
//!
//! Pure domain logic for the Transaction Store subsystem.
//!
//! - `block`: stored block rows and the block size policy
//! - `merkle`: Merkle tree and inclusion proofs
//! - `errors`: store and key-value errors

pub mod block;
pub mod errors;
pub mod merkle;

pub use block::{block_length, BlockRecord, MAX_BLOCK_EXPONENT};
pub use errors::{KVStoreError, Result, StoreError};
pub use merkle::{MerkleProof, MerkleTree, ProofNode, SiblingPosition};
