//! Worker and manager tests over the in-memory broker and store.

use super::*;
use crate::domain::{DeliveryOutcome, ProcessorError, Result, VerifyOutcome};
use crate::ports::TransactionProcessor;
use async_trait::async_trait;
use rg_01_queue_routing::{ConsistentHashRingQueueResolver, QueueResolver, TopologyOptions};
use rg_02_transaction_store::{InMemoryTransactionStore, StoreError, TransactionStore};
use rg_03_verifier_dispatch::{DispatchError, HashIntegrityVerifier, VerifierRegistry};
use rg_04_status_cache::{LruDistributedCache, TransactionStatusApi, TransactionStatusService};
use shared_bus::{InMemoryMessageBroker, MessageBroker};
use shared_types::{
    sha256, FederatedStreamId, Transaction, TransactionHash, TransactionHeader, TransactionStatus,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

struct Harness {
    broker: Arc<InMemoryMessageBroker>,
    resolver: Arc<ConsistentHashRingQueueResolver>,
    store: Arc<InMemoryTransactionStore>,
    status: Arc<TransactionStatusService>,
    processor: Arc<TransactionProcessorDispatcher>,
}

fn harness(threads: u32) -> Harness {
    let broker = Arc::new(InMemoryMessageBroker::new());
    let resolver =
        Arc::new(ConsistentHashRingQueueResolver::new(TopologyOptions::new(0, 1, threads)).unwrap());
    let store = Arc::new(InMemoryTransactionStore::new());
    let status = Arc::new(TransactionStatusService::new(
        Arc::new(LruDistributedCache::default()),
        store.clone(),
    ));
    let verifier = VerifierRegistry::new().with_verifier("dev", Arc::new(HashIntegrityVerifier));
    let processor = Arc::new(TransactionProcessorDispatcher::new(
        "registry",
        store.clone(),
        Arc::new(verifier),
        status.clone(),
    ));
    Harness {
        broker,
        resolver,
        store,
        status,
        processor,
    }
}

impl Harness {
    fn worker(&self, queue: &str) -> TransactionProcessorWorker {
        self.worker_with(queue, self.processor.clone())
    }

    fn worker_with(
        &self,
        queue: &str,
        processor: Arc<dyn TransactionProcessor>,
    ) -> TransactionProcessorWorker {
        TransactionProcessorWorker::new(
            queue,
            self.broker.clone(),
            self.resolver.clone(),
            processor,
            self.status.clone(),
        )
    }

    fn manager(&self, threads: u32) -> TransactionProcessorManager {
        TransactionProcessorManager::new(
            TopologyOptions::new(0, 1, threads),
            self.broker.clone(),
            self.resolver.clone(),
            self.processor.clone(),
            self.status.clone(),
        )
    }

    /// A transaction whose stream the ring assigns to `queue`.
    fn transaction_for(&self, queue: &str, payload_type: &str) -> Transaction {
        loop {
            let tx = transaction(Uuid::new_v4(), "n", payload_type);
            if self.resolver.queue_for_transaction(&tx) == queue {
                return tx;
            }
        }
    }

    async fn status_of(&self, tx: &Transaction) -> TransactionStatus {
        self.status
            .get_transaction_status(&tx.hash().unwrap())
            .await
            .unwrap()
            .status
    }

    async fn wait_for(&self, tx: &Transaction, expected: TransactionStatus) {
        for _ in 0..200 {
            if self.status_of(tx).await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("transaction never reached {expected}");
    }
}

fn transaction(stream: Uuid, nonce: &str, payload_type: &str) -> Transaction {
    Transaction {
        header: TransactionHeader {
            federated_stream_id: FederatedStreamId::new("registry", stream),
            payload_type: payload_type.to_string(),
            payload_hash: sha256(nonce.as_bytes()).to_vec(),
            nonce: nonce.to_string(),
        },
        header_signature: vec![],
        payload: nonce.as_bytes().to_vec(),
    }
}

struct FailingProcessor;

#[async_trait]
impl TransactionProcessor for FailingProcessor {
    async fn verify(&self, _transaction: &Transaction) -> Result<VerifyOutcome> {
        Err(StoreError::OutOfOrder {
            stream_id: Uuid::nil(),
            stream_index: 1,
            expected: 0,
        }
        .into())
    }
}

const QUEUE_0: &str = "registry_0.verifier_0";
const QUEUE_1: &str = "registry_0.verifier_1";

#[tokio::test]
async fn test_worker_processes_own_transaction() {
    let h = harness(2);
    let tx = h.transaction_for(QUEUE_0, "dev.Event");
    h.broker.publish(QUEUE_0, tx.to_bytes().unwrap()).await.unwrap();

    let delivery = h.broker.basic_get(QUEUE_0).await.unwrap().unwrap();
    let outcome = h.worker(QUEUE_0).handle(&delivery).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::Processed(VerifyOutcome::Committed));
    assert_eq!(h.broker.unacked_count(), 0);
    assert_eq!(h.status_of(&tx).await, TransactionStatus::Committed);
    assert_eq!(
        h.store
            .get_stream_transactions_for_stream(tx.stream_id())
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_worker_reroutes_misdelivered_transaction() {
    let h = harness(2);
    let tx = h.transaction_for(QUEUE_1, "dev.Event");
    h.broker.publish(QUEUE_0, tx.to_bytes().unwrap()).await.unwrap();

    let delivery = h.broker.basic_get(QUEUE_0).await.unwrap().unwrap();
    let outcome = h.worker(QUEUE_0).handle(&delivery).await.unwrap();

    assert_eq!(
        outcome,
        DeliveryOutcome::Rerouted {
            queue: QUEUE_1.to_string()
        }
    );
    assert_eq!(h.broker.unacked_count(), 0);
    let moved = h.broker.basic_get(QUEUE_1).await.unwrap().unwrap();
    assert_eq!(moved.body, tx.to_bytes().unwrap());
    assert_eq!(h.status_of(&tx).await, TransactionStatus::Unknown);
}

#[tokio::test]
async fn test_worker_fails_undecodable_message() {
    let h = harness(1);
    let body = vec![0xff, 0xfe, 0xfd];
    h.broker.publish(QUEUE_0, body.clone()).await.unwrap();

    let delivery = h.broker.basic_get(QUEUE_0).await.unwrap().unwrap();
    let outcome = h.worker(QUEUE_0).handle(&delivery).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::Undecodable);
    assert_eq!(h.broker.unacked_count(), 0);
    let record = h
        .status
        .get_transaction_status(&TransactionHash::of_bytes(&body))
        .await
        .unwrap();
    assert_eq!(record.status, TransactionStatus::Failed);
}

#[tokio::test]
async fn test_worker_requeues_and_stops_on_error() {
    let h = harness(1);
    let tx = h.transaction_for(QUEUE_0, "dev.Event");
    h.broker.publish(QUEUE_0, tx.to_bytes().unwrap()).await.unwrap();

    let (_tx, rx) = watch::channel(false);
    let err = h
        .worker_with(QUEUE_0, Arc::new(FailingProcessor))
        .run(rx)
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert_eq!(h.broker.unacked_count(), 0);
    let queues = h.broker.list_queues().await.unwrap();
    assert_eq!(queues[0].messages, 1);
}

#[tokio::test]
async fn test_worker_stops_on_shutdown() {
    let h = harness(1);
    let (tx, rx) = watch::channel(false);
    let worker = h.worker(QUEUE_0);
    let handle = tokio::spawn(async move { worker.run(rx).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    tx.send(true).unwrap();
    assert!(handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_manager_processes_every_queue() {
    let h = harness(3);
    let mut manager = h.manager(3);
    assert_eq!(
        manager.queues(),
        vec![
            "registry_0.verifier_0".to_string(),
            "registry_0.verifier_1".to_string(),
            "registry_0.verifier_2".to_string(),
        ]
    );
    manager.start();
    assert_eq!(manager.running(), 3);

    let mut submitted = Vec::new();
    for _ in 0..12 {
        let tx = transaction(Uuid::new_v4(), "n", "dev.Event");
        let queue = h.resolver.queue_for_transaction(&tx);
        h.broker.publish(&queue, tx.to_bytes().unwrap()).await.unwrap();
        submitted.push(tx);
    }
    for tx in &submitted {
        h.wait_for(tx, TransactionStatus::Committed).await;
    }

    manager.stop().await.unwrap();
    assert_eq!(manager.running(), 0);
    assert_eq!(h.broker.unacked_count(), 0);
}

#[tokio::test]
async fn test_manager_reports_failed_worker() {
    let h = harness(1);
    let mut manager = h.manager(1);
    manager.start();

    let tx = h.transaction_for(QUEUE_0, "chat.Message");
    h.broker.publish(QUEUE_0, tx.to_bytes().unwrap()).await.unwrap();

    let err = manager.join_next().await.unwrap().unwrap_err();
    assert_eq!(
        err,
        ProcessorError::Dispatch(DispatchError::UnknownFamily("chat".to_string()))
    );
    assert!(manager.stop().await.is_ok());
}
