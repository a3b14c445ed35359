//! Finalizer tests over the in-memory store and status cache.

use super::*;
use crate::adapters::LogPublisher;
use crate::domain::{FinalizerError, Result};
use crate::ports::{BlockFinalizer, BlockPublisher};
use async_trait::async_trait;
use rg_02_transaction_store::{InMemoryTransactionStore, StoreError, TransactionStore};
use rg_04_status_cache::{LruDistributedCache, TransactionStatusApi, TransactionStatusService};
use shared_types::{
    sha256, BlockHeader, BlockPublication, FederatedStreamId, StreamTransaction, Transaction,
    TransactionHash, TransactionHeader, TransactionStatus, TransactionStatusRecord, ZERO_HASH,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

/// Fails while `down` is set, otherwise behaves like `LogPublisher`.
#[derive(Default)]
struct FlakyPublisher {
    down: AtomicBool,
    calls: AtomicUsize,
}

#[async_trait]
impl BlockPublisher for FlakyPublisher {
    async fn publish_block(&self, header: &BlockHeader) -> Result<BlockPublication> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(FinalizerError::Publish("log unavailable".to_string()));
        }
        LogPublisher.publish_block(header).await
    }
}

struct Harness {
    store: Arc<InMemoryTransactionStore>,
    status: Arc<TransactionStatusService>,
    publisher: Arc<FlakyPublisher>,
    job: Arc<BlockFinalizerJob>,
    stream: Uuid,
    next_index: AtomicUsize,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryTransactionStore::new());
    let status = Arc::new(TransactionStatusService::new(
        Arc::new(LruDistributedCache::default()),
        store.clone(),
    ));
    let publisher = Arc::new(FlakyPublisher::default());
    let job = Arc::new(BlockFinalizerJob::new(
        publisher.clone(),
        store.clone(),
        status.clone(),
    ));
    Harness {
        store,
        status,
        publisher,
        job,
        stream: Uuid::new_v4(),
        next_index: AtomicUsize::new(0),
    }
}

impl Harness {
    /// Append a committed transaction, as a worker would.
    async fn commit(&self) -> TransactionHash {
        let index = self.next_index.fetch_add(1, Ordering::SeqCst) as u64;
        let tx = Transaction {
            header: TransactionHeader {
                federated_stream_id: FederatedStreamId::new("registry", self.stream),
                payload_type: "dev.Event".to_string(),
                payload_hash: sha256(&index.to_be_bytes()).to_vec(),
                nonce: index.to_string(),
            },
            header_signature: vec![],
            payload: index.to_be_bytes().to_vec(),
        };
        let record = StreamTransaction::from_transaction(&tx, index).unwrap();
        let hash = record.transaction_hash;
        self.store.store(record).await.unwrap();
        self.status
            .set_transaction_status(&hash, TransactionStatusRecord::new(TransactionStatus::Committed))
            .await
            .unwrap();
        hash
    }

    async fn status_of(&self, hash: &TransactionHash) -> TransactionStatus {
        self.status.get_transaction_status(hash).await.unwrap().status
    }
}

#[tokio::test]
async fn test_nothing_to_finalize() {
    let h = harness();
    assert_eq!(h.job.execute().await.unwrap(), None);
    assert_eq!(h.publisher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_finalizes_committed_transactions() {
    let h = harness();
    let hashes = vec![h.commit().await, h.commit().await, h.commit().await];

    let finalized = h.job.execute().await.unwrap().unwrap();
    assert_eq!(finalized.transaction_count, 3);
    for hash in &hashes {
        assert_eq!(h.status_of(hash).await, TransactionStatus::Finalized);
    }

    let blocks = h.store.get_blocks(0, 10, false).await.unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].header.hash().unwrap(), finalized.block_hash);
    assert_eq!(
        blocks[0].publication,
        Some(BlockPublication::LogEntry {
            block_header_hash: finalized.block_hash.0
        })
    );
    assert_eq!(blocks[0].header.previous_header_hash, ZERO_HASH);
}

#[tokio::test]
async fn test_consecutive_blocks_chain() {
    let h = harness();
    h.commit().await;
    let first = h.job.execute().await.unwrap().unwrap();
    h.commit().await;
    h.job.execute().await.unwrap().unwrap();

    let blocks = h.store.get_blocks(0, 10, false).await.unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1].header.previous_header_hash, first.block_hash.0);
    let publication = blocks[0].publication.as_ref().unwrap();
    assert_eq!(
        blocks[1].header.previous_publication_hash,
        publication.hash().unwrap()
    );
}

#[tokio::test]
async fn test_publish_failure_leaves_block_for_retry() {
    let h = harness();
    let hash = h.commit().await;

    h.publisher.down.store(true, Ordering::SeqCst);
    let err = h.job.execute().await.unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(h.status_of(&hash).await, TransactionStatus::Committed);
    assert!(h.store.pending_block().await.unwrap().is_some());

    // New transactions must wait behind the unpublished block.
    h.commit().await;
    let err = h.store.create_next_block().await.unwrap_err();
    assert_eq!(err, StoreError::PreviousBlockUnpublished);

    h.publisher.down.store(false, Ordering::SeqCst);
    let recovered = h.job.execute().await.unwrap().unwrap();
    assert_eq!(recovered.transaction_count, 1);
    assert_eq!(h.status_of(&hash).await, TransactionStatus::Finalized);

    let next = h.job.execute().await.unwrap().unwrap();
    assert_eq!(next.transaction_count, 1);
    assert_eq!(h.store.get_blocks(0, 10, false).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_service_runs_until_shutdown() {
    let h = harness();
    let hash = h.commit().await;
    let service = BlockFinalizerService::new(h.job.clone(), Duration::from_millis(10));
    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(async move { service.run(rx).await });

    for _ in 0..200 {
        if h.status_of(&hash).await == TransactionStatus::Finalized {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(h.status_of(&hash).await, TransactionStatus::Finalized);

    tx.send(true).unwrap();
    assert!(handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_service_stops_on_error() {
    let h = harness();
    h.commit().await;
    h.publisher.down.store(true, Ordering::SeqCst);

    let service = BlockFinalizerService::new(h.job.clone(), Duration::from_millis(5));
    let (_tx, rx) = watch::channel(false);
    let err = service.run(rx).await.unwrap_err();
    assert_eq!(err, FinalizerError::Publish("log unavailable".to_string()));
    assert_eq!(h.publisher.calls.load(Ordering::SeqCst), 1);
}
