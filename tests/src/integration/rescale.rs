//! # Topology Changes
//!
//! - Scale in: queues of removed servers are flushed onto the new ring and
//!   deleted by the cleanup loop.
//! - Scale out: messages already queued under the old ring are rerouted by
//!   the worker that receives them.
//!
//! Either way every transaction is processed exactly once.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use registry_runtime::Backends;
    use rg_01_queue_routing::QueueSlot;
    use shared_bus::MessageBroker;
    use shared_types::TransactionStatus;
    use uuid::Uuid;

    use crate::integration::support::{config, container, start, transaction, wait_for_status};

    const LIMIT: Duration = Duration::from_secs(5);

    async fn queue_names(backends: &Backends) -> Vec<String> {
        backends
            .broker
            .list_queues()
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.name)
            .collect()
    }

    #[tokio::test]
    async fn test_scale_in_flushes_removed_queues() {
        let backends = Backends::in_memory();

        // Submitted while two servers were configured; nothing consumed yet.
        let old = container(config(0, 2, 2), &backends).registry_service();
        let batch: Vec<_> = (0..40).map(|_| transaction(Uuid::new_v4(), 0)).collect();
        let hashes = old.send_transactions(batch).await.unwrap();
        let before = queue_names(&backends).await;
        assert!(before
            .iter()
            .any(|q| QueueSlot::parse(q).is_some_and(|slot| slot.server == 1)));

        let mut runtime = start(config(0, 1, 2), &backends).await;
        let service = runtime.container().registry_service();
        for hash in &hashes {
            wait_for_status(&service, hash, TransactionStatus::Finalized, LIMIT).await;
        }

        let after = queue_names(&backends).await;
        assert!(after
            .iter()
            .all(|q| QueueSlot::parse(q).is_some_and(|slot| slot.server == 0)));

        let blocks = service.get_blocks(0, 100, true).await.unwrap();
        let total: usize = blocks.iter().map(|b| b.transactions.len()).sum();
        assert_eq!(total, hashes.len());

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_scale_out_reroutes_queued_messages() {
        let backends = Backends::in_memory();

        // Everything queued for the single-server ring.
        let old = container(config(0, 1, 2), &backends).registry_service();
        let batch: Vec<_> = (0..40).map(|_| transaction(Uuid::new_v4(), 0)).collect();
        let hashes = old.send_transactions(batch).await.unwrap();

        let mut first = start(config(0, 2, 2), &backends).await;
        let mut second = start(config(1, 2, 2), &backends).await;
        let service = first.container().registry_service();
        for hash in &hashes {
            wait_for_status(&service, hash, TransactionStatus::Finalized, LIMIT).await;
        }

        let blocks = service.get_blocks(0, 100, true).await.unwrap();
        let total: usize = blocks.iter().map(|b| b.transactions.len()).sum();
        assert_eq!(total, hashes.len());

        second.shutdown().await.unwrap();
        first.shutdown().await.unwrap();
    }
}
