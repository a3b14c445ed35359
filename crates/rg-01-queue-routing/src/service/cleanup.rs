//! # Queue Cleanup Service
//!
//! Periodic reconciler that makes rescaling safe. After `servers` or
//! `threads` shrink, queues of removed slots are drained message by message,
//! each message is republished to the queue the current ring assigns, and
//! the emptied queue is deleted.

use crate::domain::RoutingError;
use crate::ports::QueueResolver;
use registry_telemetry::{MESSAGES_MOVED, QUEUES_REMOVED};
use shared_bus::{MessageBroker, QueueInfo};
use shared_types::Transaction;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Default pause between reconciliation passes.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Queues deleted in this pass.
    pub queues_removed: Vec<String>,
    /// Messages republished to active queues.
    pub messages_moved: usize,
}

/// Drains and deletes queues orphaned by a topology change.
pub struct QueueCleanupService {
    broker: Arc<dyn MessageBroker>,
    resolver: Arc<dyn QueueResolver>,
    interval: Duration,
}

impl QueueCleanupService {
    /// Create a service running every `interval`.
    pub fn new(
        broker: Arc<dyn MessageBroker>,
        resolver: Arc<dyn QueueResolver>,
        interval: Duration,
    ) -> Self {
        Self {
            broker,
            resolver,
            interval,
        }
    }

    /// Run passes until `shutdown` flips to `true`.
    ///
    /// A failing pass ends the loop with the error.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), RoutingError> {
        info!(interval_ms = self.interval.as_millis() as u64, "[rg-01] Queue cleanup started");
        loop {
            if let Err(e) = self.run_once().await {
                error!(error = %e, "[rg-01] Queue cleanup failed");
                return Err(e);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    info!("[rg-01] Shutdown signal received");
                    return Ok(());
                }
            }
        }
    }

    /// One reconciliation pass.
    pub async fn run_once(&self) -> Result<CleanupReport, RoutingError> {
        let queues = self.broker.list_queues().await?;
        let names: Vec<String> = queues.iter().map(|q| q.name.clone()).collect();
        let inactive = self.resolver.inactive_queues(&names);

        let mut report = CleanupReport::default();
        for queue in queues.iter().filter(|q| inactive.contains(&q.name)) {
            report.messages_moved += self.flush_and_remove(queue).await?;
            report.queues_removed.push(queue.name.clone());
        }
        Ok(report)
    }

    async fn flush_and_remove(&self, queue: &QueueInfo) -> Result<usize, RoutingError> {
        info!(queue = %queue.name, "[rg-01] Removing unused queue");

        let moved = if queue.messages > 0 {
            info!(
                queue = %queue.name,
                messages = queue.messages,
                "[rg-01] Flushing queue"
            );
            self.flush(&queue.name).await?
        } else {
            0
        };

        info!(queue = %queue.name, "[rg-01] Deleting queue");
        self.broker.delete_queue(&queue.name).await?;
        QUEUES_REMOVED.inc();
        Ok(moved)
    }

    async fn flush(&self, queue: &str) -> Result<usize, RoutingError> {
        let mut moved = 0;
        while let Some(delivery) = self.broker.basic_get(queue).await? {
            let target = match Transaction::from_bytes(&delivery.body) {
                Ok(transaction) => self.resolver.queue_for_transaction(&transaction),
                Err(e) => {
                    // Still rehomed; the receiving worker records it as failed.
                    warn!(queue, error = %e, "[rg-01] Undecodable message during flush");
                    self.resolver.queue_for_key(&delivery.body)
                }
            };

            self.broker.publish(&target, delivery.body).await?;
            self.broker.ack(delivery.delivery_tag).await?;
            MESSAGES_MOVED.inc();
            moved += 1;
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TopologyOptions;
    use crate::service::ConsistentHashRingQueueResolver;
    use shared_bus::InMemoryMessageBroker;
    use shared_types::{FederatedStreamId, TransactionHeader};
    use uuid::Uuid;

    fn transaction(stream_id: Uuid) -> Transaction {
        Transaction {
            header: TransactionHeader {
                federated_stream_id: FederatedStreamId::new("registry", stream_id),
                payload_type: "family.Type".to_string(),
                payload_hash: vec![],
                nonce: stream_id.to_string(),
            },
            header_signature: vec![],
            payload: vec![1, 2, 3],
        }
    }

    fn service(
        broker: &Arc<InMemoryMessageBroker>,
        servers: u32,
        threads: u32,
    ) -> (QueueCleanupService, Arc<ConsistentHashRingQueueResolver>) {
        let resolver = Arc::new(
            ConsistentHashRingQueueResolver::new(TopologyOptions::new(0, servers, threads)).unwrap(),
        );
        let service = QueueCleanupService::new(
            Arc::clone(broker) as Arc<dyn MessageBroker>,
            Arc::clone(&resolver) as Arc<dyn QueueResolver>,
            Duration::from_millis(10),
        );
        (service, resolver)
    }

    #[tokio::test]
    async fn test_nothing_to_do_for_current_topology() {
        let broker = Arc::new(InMemoryMessageBroker::new());
        broker.declare_queue("registry_0.verifier_0").await.unwrap();
        broker.declare_queue("registry_1.verifier_0").await.unwrap();

        let (service, _) = service(&broker, 2, 1);
        assert_eq!(service.run_once().await.unwrap(), CleanupReport::default());
        assert_eq!(broker.list_queues().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_drains_and_deletes_removed_server_queue() {
        let broker = Arc::new(InMemoryMessageBroker::new());
        let stale = "registry_2.verifier_0";
        let streams: Vec<Uuid> = (0..25).map(|_| Uuid::new_v4()).collect();
        for stream in &streams {
            broker
                .publish(stale, transaction(*stream).to_bytes().unwrap())
                .await
                .unwrap();
        }

        let (service, resolver) = service(&broker, 2, 1);
        let report = service.run_once().await.unwrap();

        assert_eq!(report.queues_removed, vec![stale.to_string()]);
        assert_eq!(report.messages_moved, 25);
        assert_eq!(broker.unacked_count(), 0);

        let queues = broker.list_queues().await.unwrap();
        assert!(queues.iter().all(|q| q.name != stale));
        assert_eq!(queues.iter().map(|q| q.messages).sum::<usize>(), 25);

        // Every message landed on the queue its stream now maps to.
        for queue in queues {
            while let Some(d) = broker.basic_get(&queue.name).await.unwrap() {
                let tx = Transaction::from_bytes(&d.body).unwrap();
                assert_eq!(resolver.queue_for_transaction(&tx), queue.name);
                broker.ack(d.delivery_tag).await.unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_empty_stale_queue_is_deleted() {
        let broker = Arc::new(InMemoryMessageBroker::new());
        broker.declare_queue("registry_0.verifier_5").await.unwrap();

        let (service, _) = service(&broker, 1, 2);
        let report = service.run_once().await.unwrap();
        assert_eq!(report.queues_removed, vec!["registry_0.verifier_5".to_string()]);
        assert_eq!(report.messages_moved, 0);
        assert!(broker.list_queues().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_queues_are_left_alone() {
        let broker = Arc::new(InMemoryMessageBroker::new());
        broker.publish("audit.events", b"x".to_vec()).await.unwrap();

        let (service, _) = service(&broker, 1, 1);
        service.run_once().await.unwrap();
        let queues = broker.list_queues().await.unwrap();
        assert_eq!(queues.len(), 1);
        assert_eq!(queues[0].messages, 1);
    }

    #[tokio::test]
    async fn test_undecodable_message_is_rehomed() {
        let broker = Arc::new(InMemoryMessageBroker::new());
        broker.publish("registry_4.verifier_0", vec![0xff]).await.unwrap();

        let (service, _) = service(&broker, 1, 1);
        let report = service.run_once().await.unwrap();
        assert_eq!(report.messages_moved, 1);

        let delivery = broker.basic_get("registry_0.verifier_0").await.unwrap().unwrap();
        assert_eq!(delivery.body, vec![0xff]);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let broker = Arc::new(InMemoryMessageBroker::new());
        let (service, _) = service(&broker, 1, 1);
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { service.run(rx).await });
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
