//! # Service Layer
//!
//! - `proof`: Merkle inclusion proofs over stored blocks

mod proof;

pub use proof::{MerkleProofService, TransactionProof};
