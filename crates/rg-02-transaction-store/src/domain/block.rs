//! # Block Records
//!
//! Stored form of a block and the block size policy.

use serde::{Deserialize, Serialize};
use shared_types::{Block, BlockHash, BlockHeader, BlockPublication, NewBlock, Transaction, TransactionHash};

use super::errors::Result;

/// Largest block is `2^MAX_BLOCK_EXPONENT` transactions.
pub const MAX_BLOCK_EXPONENT: u32 = 20;

/// Number of transactions the next block takes from a backlog of `available`.
///
/// `min(2^min(ceil(log2 n), 20), n)`: the whole backlog, capped at 2^20.
pub fn block_length(available: u64) -> u64 {
    if available == 0 {
        return 0;
    }
    // ceil(log2 n)
    let exponent = (u64::BITS - (available - 1).leading_zeros()).min(MAX_BLOCK_EXPONENT);
    (1u64 << exponent).min(available)
}

/// A block row: header, the inclusive id range it covers and its publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// One-based position in the chain.
    pub height: u64,
    /// Hash of `header`.
    pub block_hash: BlockHash,
    /// Chained header.
    pub header: BlockHeader,
    /// First covered transaction id.
    pub from_transaction: u64,
    /// Last covered transaction id.
    pub to_transaction: u64,
    /// Present once finalized.
    pub publication: Option<BlockPublication>,
}

impl BlockRecord {
    /// True when `id` falls inside this block.
    pub fn covers(&self, id: u64) -> bool {
        self.from_transaction <= id && id <= self.to_transaction
    }

    /// True once a publication has been recorded.
    pub fn is_published(&self) -> bool {
        self.publication.is_some()
    }

    /// Query form of this block.
    pub fn to_block(&self, transactions: Vec<Transaction>) -> Block {
        Block {
            header: self.header.clone(),
            publication: self.publication.clone(),
            height: self.height,
            transactions,
        }
    }

    /// Finalizer hand-off form of this block.
    pub fn to_new_block(&self, transaction_hashes: Vec<TransactionHash>) -> NewBlock {
        NewBlock {
            header: self.header.clone(),
            transaction_hashes,
        }
    }

    /// Apply `publication`, allowing only a first write or an identical repeat.
    pub fn finalize(&mut self, publication: &BlockPublication) -> Result<()> {
        match &self.publication {
            None => {
                self.publication = Some(publication.clone());
                Ok(())
            }
            Some(existing) if existing == publication => Ok(()),
            Some(_) => Err(super::errors::StoreError::BlockAlreadyFinalized(self.block_hash)),
        }
    }
}
