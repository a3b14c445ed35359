//! # Block Builder
//!
//! Stateless construction of the next block from the unblocked backlog.
//!
//! ```text
//! previous block ──(header hash, publication hash)──┐
//!                                                    ├──→ BlockHeader
//! backlog [from..=to] ──payloads──→ Merkle root ─────┘
//! ```

use shared_types::{block_timestamp, BlockHeader, StreamTransaction, ZERO_HASH};

use crate::domain::{block_length, BlockRecord, MerkleTree, Result, StoreError};

/// Builds chained, Merkle-rooted block records.
pub struct BlockBuilder;

impl BlockBuilder {
    /// Inclusive id range of the next block.
    ///
    /// `Ok(None)` when every stored transaction is already in a block.
    /// Fails while `previous` is unpublished.
    pub fn next_range(
        previous: Option<&BlockRecord>,
        last_transaction_id: u64,
    ) -> Result<Option<(u64, u64)>> {
        let from = match previous {
            Some(block) if !block.is_published() => return Err(StoreError::PreviousBlockUnpublished),
            Some(block) => block.to_transaction + 1,
            None => 1,
        };
        if last_transaction_id < from {
            return Ok(None);
        }
        let length = block_length(last_transaction_id - from + 1);
        Ok(Some((from, from + length - 1)))
    }

    /// Build the block row covering `transactions`, ids `from..=to`.
    ///
    /// `transactions` must be that range in id order and non-empty.
    pub fn build(
        previous: Option<&BlockRecord>,
        from: u64,
        to: u64,
        transactions: &[StreamTransaction],
    ) -> Result<BlockRecord> {
        let tree = MerkleTree::from_payloads(transactions.iter().map(|t| t.payload.as_slice()))
            .ok_or(StoreError::EmptyBlock)?;

        let (previous_header_hash, previous_publication_hash, height) = match previous {
            Some(block) => {
                let publication = block
                    .publication
                    .as_ref()
                    .ok_or(StoreError::PreviousBlockUnpublished)?;
                (block.block_hash.0, publication.hash()?, block.height + 1)
            }
            None => (ZERO_HASH, ZERO_HASH, 1),
        };

        let header = BlockHeader {
            previous_header_hash,
            previous_publication_hash,
            merkle_root_hash: tree.root(),
            created_at: block_timestamp(),
        };

        Ok(BlockRecord {
            height,
            block_hash: header.hash()?,
            header,
            from_transaction: from,
            to_transaction: to,
            publication: None,
        })
    }
}
