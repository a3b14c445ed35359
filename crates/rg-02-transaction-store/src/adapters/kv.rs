//! # Durable Transaction Store
//!
//! `TransactionStore` over any `KeyValueStore`, keeping the relational
//! layout as key spaces:
//!
//! | Key | Value |
//! |-----|-------|
//! | `tx/<id>` | bincode `StreamTransaction` |
//! | `tx_hash/<hash>` | id |
//! | `stream/<stream_id>/<index>` | id |
//! | `stream_len/<stream_id>` | stream length |
//! | `block/<height>` | bincode `BlockRecord` |
//! | `block_hash/<hash>` | height |
//! | `meta/next_tx_id` | last assigned id |
//! | `meta/block_count` | number of blocks |
//!
//! Integers are big-endian so prefix scans return them in order. Each
//! append and each block row is one atomic batch.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    Block, BlockHash, BlockPublication, NewBlock, StreamTransaction, TransactionHash,
    TransactionStatus,
};
use tracing::debug;
use uuid::Uuid;

use crate::algorithms::BlockBuilder;
use crate::domain::{BlockRecord, KVStoreError, Result, StoreError};
use crate::ports::{BatchOperation, KeyValueStore, TransactionStore};

mod keys {
    use shared_types::{BlockHash, TransactionHash};
    use uuid::Uuid;

    pub const NEXT_TX_ID: &[u8] = b"meta/next_tx_id";
    pub const BLOCK_COUNT: &[u8] = b"meta/block_count";

    fn join(prefix: &[u8], parts: &[&[u8]]) -> Vec<u8> {
        let mut key = prefix.to_vec();
        for part in parts {
            key.extend_from_slice(part);
        }
        key
    }

    pub fn tx(id: u64) -> Vec<u8> {
        join(b"tx/", &[&id.to_be_bytes()])
    }

    pub fn tx_hash(hash: &TransactionHash) -> Vec<u8> {
        join(b"tx_hash/", &[hash.as_bytes()])
    }

    pub fn stream_prefix(stream_id: &Uuid) -> Vec<u8> {
        join(b"stream/", &[stream_id.as_bytes(), b"/"])
    }

    pub fn stream(stream_id: &Uuid, index: u64) -> Vec<u8> {
        join(&stream_prefix(stream_id), &[&index.to_be_bytes()])
    }

    pub fn stream_len(stream_id: &Uuid) -> Vec<u8> {
        join(b"stream_len/", &[stream_id.as_bytes()])
    }

    pub fn block(height: u64) -> Vec<u8> {
        join(b"block/", &[&height.to_be_bytes()])
    }

    pub fn block_hash(hash: &BlockHash) -> Vec<u8> {
        join(b"block_hash/", &[hash.as_bytes()])
    }
}

fn encode_u64(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

fn decode_u64(bytes: &[u8]) -> std::result::Result<u64, KVStoreError> {
    bytes
        .try_into()
        .map(u64::from_be_bytes)
        .map_err(|_| KVStoreError::CorruptionError {
            message: format!("expected 8-byte integer, got {} bytes", bytes.len()),
        })
}

/// Read helpers over a borrowed key-value store.
struct Reader<'a, S: KeyValueStore>(&'a S);

impl<S: KeyValueStore> Reader<'_, S> {
    fn counter(&self, key: &[u8]) -> Result<u64> {
        match self.0.get(key)? {
            Some(bytes) => Ok(decode_u64(&bytes)?),
            None => Ok(0),
        }
    }

    fn transaction(&self, id: u64) -> Result<StreamTransaction> {
        let bytes = self.0.get(&keys::tx(id))?.ok_or_else(|| KVStoreError::CorruptionError {
            message: format!("missing transaction {}", id),
        })?;
        Ok(bincode::deserialize(&bytes)?)
    }

    fn transactions(&self, from: u64, to: u64) -> Result<Vec<StreamTransaction>> {
        (from..=to).map(|id| self.transaction(id)).collect()
    }

    fn transaction_id(&self, hash: &TransactionHash) -> Result<Option<u64>> {
        match self.0.get(&keys::tx_hash(hash))? {
            Some(bytes) => Ok(Some(decode_u64(&bytes)?)),
            None => Ok(None),
        }
    }

    fn block(&self, height: u64) -> Result<BlockRecord> {
        let bytes = self.0.get(&keys::block(height))?.ok_or_else(|| {
            KVStoreError::CorruptionError {
                message: format!("missing block {}", height),
            }
        })?;
        Ok(bincode::deserialize(&bytes)?)
    }

    fn latest_block(&self) -> Result<Option<BlockRecord>> {
        match self.counter(keys::BLOCK_COUNT)? {
            0 => Ok(None),
            count => self.block(count).map(Some),
        }
    }

    fn block_by_hash(&self, hash: &BlockHash) -> Result<BlockRecord> {
        let bytes = self
            .0
            .get(&keys::block_hash(hash))?
            .ok_or(StoreError::BlockNotFound(*hash))?;
        self.block(decode_u64(&bytes)?)
    }

    /// Binary search over block ranges.
    fn block_covering(&self, id: u64) -> Result<Option<BlockRecord>> {
        let (mut low, mut high) = (1, self.counter(keys::BLOCK_COUNT)?);
        while low <= high {
            let mid = low + (high - low) / 2;
            let block = self.block(mid)?;
            if block.covers(id) {
                return Ok(Some(block));
            }
            if id < block.from_transaction {
                high = mid - 1;
            } else {
                low = mid + 1;
            }
        }
        Ok(None)
    }

    fn block_for(&self, hash: &TransactionHash) -> Result<Option<BlockRecord>> {
        match self.transaction_id(hash)? {
            Some(id) => self.block_covering(id),
            None => Ok(None),
        }
    }
}

/// `TransactionStore` persisted in a `KeyValueStore`.
pub struct KvTransactionStore<S: KeyValueStore> {
    kv: RwLock<S>,
}

impl<S: KeyValueStore> KvTransactionStore<S> {
    /// Wrap `kv`. Existing contents are used as-is.
    pub fn new(kv: S) -> Self {
        Self { kv: RwLock::new(kv) }
    }
}

#[async_trait]
impl<S: KeyValueStore> TransactionStore for KvTransactionStore<S> {
    async fn store(&self, transaction: StreamTransaction) -> Result<()> {
        let mut kv = self.kv.write();
        let reader = Reader(&*kv);

        let expected = reader.counter(&keys::stream_len(&transaction.stream_id))?;
        if transaction.stream_index != expected {
            return Err(StoreError::OutOfOrder {
                stream_id: transaction.stream_id,
                stream_index: transaction.stream_index,
                expected,
            });
        }
        if reader.transaction_id(&transaction.transaction_hash)?.is_some() {
            return Err(StoreError::DuplicateTransaction(transaction.transaction_hash));
        }

        let id = reader.counter(keys::NEXT_TX_ID)? + 1;
        let stream_id = transaction.stream_id;
        let operations = vec![
            BatchOperation::put(keys::tx(id), bincode::serialize(&transaction)?),
            BatchOperation::put(keys::tx_hash(&transaction.transaction_hash), encode_u64(id)),
            BatchOperation::put(keys::stream(&stream_id, expected), encode_u64(id)),
            BatchOperation::put(keys::stream_len(&stream_id), encode_u64(expected + 1)),
            BatchOperation::put(keys::NEXT_TX_ID, encode_u64(id)),
        ];
        kv.atomic_batch_write(operations)?;

        debug!(id, stream_id = %stream_id, "[rg-02] Transaction stored");
        Ok(())
    }

    async fn get_stream_transactions_for_stream(
        &self,
        stream_id: Uuid,
    ) -> Result<Vec<StreamTransaction>> {
        let kv = self.kv.read();
        let reader = Reader(&*kv);
        kv.prefix_scan(&keys::stream_prefix(&stream_id))?
            .into_iter()
            .map(|(_, id)| reader.transaction(decode_u64(&id)?))
            .collect()
    }

    async fn get_stream_transactions_for_block(
        &self,
        block_hash: &BlockHash,
    ) -> Result<Vec<StreamTransaction>> {
        let kv = self.kv.read();
        let reader = Reader(&*kv);
        let block = reader.block_by_hash(block_hash)?;
        reader.transactions(block.from_transaction, block.to_transaction)
    }

    async fn get_transaction_status(&self, hash: &TransactionHash) -> Result<TransactionStatus> {
        let kv = self.kv.read();
        let reader = Reader(&*kv);
        let Some(id) = reader.transaction_id(hash)? else {
            return Ok(TransactionStatus::Unknown);
        };
        Ok(match reader.block_covering(id)? {
            Some(block) if block.is_published() => TransactionStatus::Finalized,
            _ => TransactionStatus::Committed,
        })
    }

    async fn get_block(&self, hash: &TransactionHash) -> Result<Option<Block>> {
        let kv = self.kv.read();
        Ok(Reader(&*kv)
            .block_for(hash)?
            .map(|block| block.to_block(Vec::new())))
    }

    async fn create_next_block(&self) -> Result<Option<NewBlock>> {
        let mut kv = self.kv.write();
        let reader = Reader(&*kv);

        let previous = reader.latest_block()?;
        let last_id = reader.counter(keys::NEXT_TX_ID)?;
        let Some((from, to)) = BlockBuilder::next_range(previous.as_ref(), last_id)? else {
            return Ok(None);
        };

        let covered = reader.transactions(from, to)?;
        let block = BlockBuilder::build(previous.as_ref(), from, to, &covered)?;
        let operations = vec![
            BatchOperation::put(keys::block(block.height), bincode::serialize(&block)?),
            BatchOperation::put(keys::block_hash(&block.block_hash), encode_u64(block.height)),
            BatchOperation::put(keys::BLOCK_COUNT, encode_u64(block.height)),
        ];
        kv.atomic_batch_write(operations)?;

        debug!(height = block.height, from, to, "[rg-02] Block created");
        Ok(Some(block.to_new_block(
            covered.iter().map(|t| t.transaction_hash).collect(),
        )))
    }

    async fn pending_block(&self) -> Result<Option<NewBlock>> {
        let kv = self.kv.read();
        let reader = Reader(&*kv);
        match reader.latest_block()? {
            Some(block) if !block.is_published() => {
                let covered = reader.transactions(block.from_transaction, block.to_transaction)?;
                Ok(Some(block.to_new_block(
                    covered.iter().map(|t| t.transaction_hash).collect(),
                )))
            }
            _ => Ok(None),
        }
    }

    async fn finalize_block(
        &self,
        block_hash: &BlockHash,
        publication: &BlockPublication,
    ) -> Result<()> {
        let mut kv = self.kv.write();
        let mut block = Reader(&*kv).block_by_hash(block_hash)?;
        if block.publication.as_ref() == Some(publication) {
            return Ok(());
        }
        block.finalize(publication)?;
        kv.put(&keys::block(block.height), &bincode::serialize(&block)?)?;
        Ok(())
    }

    async fn get_blocks(
        &self,
        skip: usize,
        take: usize,
        include_transactions: bool,
    ) -> Result<Vec<Block>> {
        let kv = self.kv.read();
        let reader = Reader(&*kv);
        let count = reader.counter(keys::BLOCK_COUNT)?;
        let first = (skip as u64).saturating_add(1);
        let last = count.min((skip as u64).saturating_add(take as u64));
        if first > last {
            return Ok(Vec::new());
        }

        (first..=last)
            .map(|height| {
                let block = reader.block(height)?;
                let transactions = if include_transactions {
                    reader
                        .transactions(block.from_transaction, block.to_transaction)?
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
