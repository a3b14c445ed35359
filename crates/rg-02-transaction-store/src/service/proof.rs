//! # Merkle Proof Service
//!
//! Inclusion proofs for transactions that are already in a block.

use serde::{Deserialize, Serialize};
use shared_types::{BlockHash, TransactionHash};
use std::sync::Arc;
use tracing::debug;

use crate::domain::{MerkleProof, MerkleTree, Result, StoreError};
use crate::ports::TransactionStore;

/// A transaction together with the proof tying it to its block's Merkle root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionProof {
    /// Proven transaction.
    pub transaction_hash: TransactionHash,
    /// Encoded transaction, the Merkle leaf preimage.
    pub payload: Vec<u8>,
    /// Block containing the transaction.
    pub block_hash: BlockHash,
    /// One-based height of that block.
    pub block_height: u64,
    /// Authentication path against `merkle_root_hash` of the block header.
    pub proof: MerkleProof,
}

/// Builds inclusion proofs from the store.
pub struct MerkleProofService {
    store: Arc<dyn TransactionStore>,
}

impl MerkleProofService {
    /// Create a service reading from `store`.
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// Proof for `hash`, or `None` while the transaction is not in a block.
    pub async fn get_merkle_proof(&self, hash: &TransactionHash) -> Result<Option<TransactionProof>> {
        let Some(block) = self.store.get_block(hash).await? else {
            return Ok(None);
        };
        let block_hash = block.header.hash()?;

        let transactions = self.store.get_stream_transactions_for_block(&block_hash).await?;
        let Some(leaf_index) = transactions.iter().position(|t| t.transaction_hash == *hash) else {
            return Ok(None);
        };

        let tree = MerkleTree::from_payloads(transactions.iter().map(|t| t.payload.as_slice()))
            .ok_or(StoreError::EmptyBlock)?;
        let proof = tree.proof(leaf_index).ok_or(StoreError::EmptyBlock)?;
        debug!(
            transaction = %hash,
            height = block.height,
            leaf_index,
            "[rg-02] Merkle proof generated"
        );

        Ok(Some(TransactionProof {
            transaction_hash: *hash,
            payload: transactions[leaf_index].payload.clone(),
            block_hash,
            block_height: block.height,
            proof,
        }))
    }
}
