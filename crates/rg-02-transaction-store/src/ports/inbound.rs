//! # Inbound Ports (Driving Ports)
//!
//! The transaction store API used by workers, the finalizer and queries.

use async_trait::async_trait;
use shared_types::{Block, BlockHash, BlockPublication, NewBlock, StreamTransaction, TransactionHash, TransactionStatus};
use uuid::Uuid;

use crate::domain::Result;

/// Append-only per-stream log with block ranging.
///
/// ## Invariants
///
/// - `stream_index` values of one stream are exactly `0, 1, 2, …`
/// - Blocks cover contiguous, non-overlapping id ranges and form a hash chain
/// - No block is created while the latest block is unpublished
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Append `transaction` to its stream.
    ///
    /// Fails with `OutOfOrder` unless `stream_index` equals the stream's
    /// current length.
    async fn store(&self, transaction: StreamTransaction) -> Result<()>;

    /// All transactions of `stream_id` in stream order.
    async fn get_stream_transactions_for_stream(
        &self,
        stream_id: Uuid,
    ) -> Result<Vec<StreamTransaction>>;

    /// Transactions covered by a block, in id order.
    async fn get_stream_transactions_for_block(
        &self,
        block_hash: &BlockHash,
    ) -> Result<Vec<StreamTransaction>>;

    /// `Committed` once stored, `Finalized` once its block is published,
    /// otherwise `Unknown`.
    async fn get_transaction_status(&self, hash: &TransactionHash) -> Result<TransactionStatus>;

    /// Block containing the transaction, published or not.
    async fn get_block(&self, hash: &TransactionHash) -> Result<Option<Block>>;

    /// Create, persist and return the next block.
    ///
    /// `None` when nothing is waiting; fails while the latest block is unpublished.
    async fn create_next_block(&self) -> Result<Option<NewBlock>>;

    /// The latest block when it still lacks a publication.
    async fn pending_block(&self) -> Result<Option<NewBlock>>;

    /// Record `publication` for a block. Repeating the same publication succeeds.
    async fn finalize_block(
        &self,
        block_hash: &BlockHash,
        publication: &BlockPublication,
    ) -> Result<()>;

    /// A page of blocks in chain order.
    async fn get_blocks(
        &self,
        skip: usize,
        take: usize,
        include_transactions: bool,
    ) -> Result<Vec<Block>>;
}
