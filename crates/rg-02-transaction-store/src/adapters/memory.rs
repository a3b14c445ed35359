//! # In-Memory Transaction Store
//!
//! Single-process backend. One mutex guards the whole log, which gives
//! store and block creation the required mutual exclusion.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{
    Block, BlockHash, BlockPublication, NewBlock, StreamTransaction, TransactionHash,
    TransactionStatus,
};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::algorithms::BlockBuilder;
use crate::domain::{BlockRecord, Result, StoreError};
use crate::ports::TransactionStore;

#[derive(Default)]
struct State {
    // Position i holds transaction id i + 1.
    transactions: Vec<StreamTransaction>,
    ids_by_hash: HashMap<TransactionHash, u64>,
    streams: HashMap<Uuid, Vec<u64>>,
    blocks: Vec<BlockRecord>,
}

impl State {
    fn transaction(&self, id: u64) -> &StreamTransaction {
        &self.transactions[(id - 1) as usize]
    }

    fn range(&self, block: &BlockRecord) -> &[StreamTransaction] {
        &self.transactions[(block.from_transaction - 1) as usize..block.to_transaction as usize]
    }

    fn block_by_hash(&self, hash: &BlockHash) -> Option<usize> {
        self.blocks.iter().position(|b| b.block_hash == *hash)
    }

    fn block_for(&self, hash: &TransactionHash) -> Option<&BlockRecord> {
        let id = *self.ids_by_hash.get(hash)?;
        self.blocks.iter().find(|b| b.covers(id))
    }
}

/// In-memory `TransactionStore`.
#[derive(Default)]
pub struct InMemoryTransactionStore {
    state: Mutex<State>,
}

impl InMemoryTransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn store(&self, transaction: StreamTransaction) -> Result<()> {
        let mut state = self.state.lock();

        let expected = state
            .streams
            .get(&transaction.stream_id)
            .map_or(0, |ids| ids.len() as u64);
        if transaction.stream_index != expected {
            return Err(StoreError::OutOfOrder {
                stream_id: transaction.stream_id,
                stream_index: transaction.stream_index,
                expected,
            });
        }
        if state.ids_by_hash.contains_key(&transaction.transaction_hash) {
            return Err(StoreError::DuplicateTransaction(transaction.transaction_hash));
        }

        let id = state.transactions.len() as u64 + 1;
        state.ids_by_hash.insert(transaction.transaction_hash, id);
        state.streams.entry(transaction.stream_id).or_default().push(id);
        debug!(id, stream_id = %transaction.stream_id, "[rg-02] Transaction stored");
        state.transactions.push(transaction);
        Ok(())
    }

    async fn get_stream_transactions_for_stream(
        &self,
        stream_id: Uuid,
    ) -> Result<Vec<StreamTransaction>> {
        let state = self.state.lock();
        Ok(state
            .streams
            .get(&stream_id)
            .map(|ids| ids.iter().map(|id| state.transaction(*id).clone()).collect())
            .unwrap_or_default())
    }

    async fn get_stream_transactions_for_block(
        &self,
        block_hash: &BlockHash,
    ) -> Result<Vec<StreamTransaction>> {
        let state = self.state.lock();
        let index = state
            .block_by_hash(block_hash)
            .ok_or(StoreError::BlockNotFound(*block_hash))?;
        Ok(state.range(&state.blocks[index]).to_vec())
    }

    async fn get_transaction_status(&self, hash: &TransactionHash) -> Result<TransactionStatus> {
        let state = self.state.lock();
        if !state.ids_by_hash.contains_key(hash) {
            return Ok(TransactionStatus::Unknown);
        }
        Ok(match state.block_for(hash) {
            Some(block) if block.is_published() => TransactionStatus::Finalized,
            _ => TransactionStatus::Committed,
        })
    }

    async fn get_block(&self, hash: &TransactionHash) -> Result<Option<Block>> {
        let state = self.state.lock();
        Ok(state.block_for(hash).map(|block| block.to_block(Vec::new())))
    }

    async fn create_next_block(&self) -> Result<Option<NewBlock>> {
        let mut state = self.state.lock();
        let previous = state.blocks.last();
        let Some((from, to)) = BlockBuilder::next_range(previous, state.transactions.len() as u64)?
        else {
            return Ok(None);
        };

        let covered = &state.transactions[(from - 1) as usize..to as usize];
        let block = BlockBuilder::build(previous, from, to, covered)?;
        let new_block = block.to_new_block(covered.iter().map(|t| t.transaction_hash).collect());

        debug!(height = block.height, from, to, "[rg-02] Block created");
        state.blocks.push(block);
        Ok(Some(new_block))
    }

    async fn pending_block(&self) -> Result<Option<NewBlock>> {
        let state = self.state.lock();
        Ok(state
            .blocks
            .last()
            .filter(|block| !block.is_published())
            .map(|block| {
                block.to_new_block(state.range(block).iter().map(|t| t.transaction_hash).collect())
            }))
    }

    async fn finalize_block(
        &self,
        block_hash: &BlockHash,
        publication: &BlockPublication,
    ) -> Result<()> {
        let mut state = self.state.lock();
        let index = state
            .block_by_hash(block_hash)
            .ok_or(StoreError::BlockNotFound(*block_hash))?;
        state.blocks[index].finalize(publication)
    }

    async fn get_blocks(
        &self,
        skip: usize,
        take: usize,
        include_transactions: bool,
    ) -> Result<Vec<Block>> {
        let state = self.state.lock();
        state
            .blocks
            .iter()
            .skip(skip)
            .take(take)
            .map(|block| {
                let transactions = if include_transactions {
                    state
                        .range(block)
                        .iter()
                        .map(|t| t.transaction().map_err(StoreError::from))
                        .collect::<Result<Vec<_>>>()?
                } else {
                    Vec::new()
                };
                Ok(block.to_block(transactions))
            })
            .collect()
    }
}
