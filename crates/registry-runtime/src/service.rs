//! # Registry Service
//!
//! The RPC operations of a registry instance, independent of transport.
//!
//! | Operation | Backing |
//! |-----------|---------|
//! | `send_transactions` | status `Pending`, publish to resolved queue |
//! | `get_transaction_status` | status cache, store fallback |
//! | `get_stream_transactions` | store, stream order |
//! | `get_blocks` | store, chain order |
//! | `get_block` | store, block containing a transaction |
//! | `get_merkle_proof` | proof service |

use std::sync::Arc;

use registry_telemetry::TRANSACTIONS_SUBMITTED;
use rg_01_queue_routing::QueueResolver;
use rg_02_transaction_store::{MerkleProofService, StoreError, TransactionProof, TransactionStore};
use rg_04_status_cache::{CacheError, TransactionStatusApi};
use shared_bus::{BrokerError, MessageBroker};
use shared_types::{
    Block, CodecError, StreamTransaction, Transaction, TransactionHash, TransactionStatus,
    TransactionStatusRecord,
};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Failures of the RPC operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Store query failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Status cache failed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Broker refused the publication.
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// Transaction could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ServiceError {
    /// True when retrying the same call may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ServiceError::Store(e) => e.is_recoverable(),
            ServiceError::Cache(e) => e.is_recoverable(),
            ServiceError::Broker(e) => matches!(e, BrokerError::Unavailable(_)),
            ServiceError::Codec(_) => false,
        }
    }
}

/// Result type for RPC operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Transport-independent RPC surface.
pub struct RegistryService {
    broker: Arc<dyn MessageBroker>,
    resolver: Arc<dyn QueueResolver>,
    store: Arc<dyn TransactionStore>,
    status: Arc<dyn TransactionStatusApi>,
    proofs: MerkleProofService,
}

impl RegistryService {
    /// Create the service.
    pub fn new(
        broker: Arc<dyn MessageBroker>,
        resolver: Arc<dyn QueueResolver>,
        store: Arc<dyn TransactionStore>,
        status: Arc<dyn TransactionStatusApi>,
        proofs: MerkleProofService,
    ) -> Self {
        Self {
            broker,
            resolver,
            store,
            status,
            proofs,
        }
    }

    /// Mark each transaction `Pending` and publish it to its queue.
    ///
    /// Returns the transaction hashes in input order. Processing happens
    /// asynchronously; poll [`get_transaction_status`](Self::get_transaction_status).
    pub async fn send_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<TransactionHash>> {
        let mut hashes = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            let body = transaction.to_bytes()?;
            let hash = TransactionHash::of_bytes(&body);
            self.status
                .set_transaction_status(&hash, TransactionStatusRecord::new(TransactionStatus::Pending))
                .await?;

            let queue = self.resolver.queue_for_transaction(&transaction);
            self.broker.publish(&queue, body).await?;
            TRANSACTIONS_SUBMITTED.inc();
            debug!(transaction = %hash, queue = %queue, "[runtime] Transaction submitted");
            hashes.push(hash);
        }
        Ok(hashes)
    }

    /// Current status of a transaction; `Unknown` when never seen.
    pub async fn get_transaction_status(
        &self,
        hash: &TransactionHash,
    ) -> Result<TransactionStatusRecord> {
        Ok(self.status.get_transaction_status(hash).await?)
    }

    /// Committed transactions of a stream, in stream order.
    pub async fn get_stream_transactions(&self, stream_id: Uuid) -> Result<Vec<StreamTransaction>> {
        Ok(self.store.get_stream_transactions_for_stream(stream_id).await?)
    }

    /// A page of blocks in chain order.
    pub async fn get_blocks(
        &self,
        skip: usize,
        take: usize,
        include_transactions: bool,
    ) -> Result<Vec<Block>> {
        Ok(self.store.get_blocks(skip, take, include_transactions).await?)
    }

    /// Block containing the transaction, published or not.
    pub async fn get_block(&self, hash: &TransactionHash) -> Result<Option<Block>> {
        Ok(self.store.get_block(hash).await?)
    }

    /// Inclusion proof; `None` until the transaction is in a block.
    pub async fn get_merkle_proof(&self, hash: &TransactionHash) -> Result<Option<TransactionProof>> {
        Ok(self.proofs.get_merkle_proof(hash).await?)
    }
}
