//! # Transaction Lifecycle
//!
//! ```text
//! submit ─→ Pending ─→ worker verifies and appends ─→ Committed
//!                                                         │
//!                        finalizer publishes block ─→ Finalized
//! ```

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use registry_runtime::Backends;
    use shared_types::TransactionStatus;
    use uuid::Uuid;

    use crate::integration::support::{config, container, start, transaction, wait_for_status};

    const LIMIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_status_walks_unknown_pending_committed_finalized() {
        let backends = Backends::in_memory();
        let mut config = config(0, 1, 2);
        // Long enough that Committed is observable before the first block.
        config.finalizer.interval = Duration::from_millis(400);

        let service = container(config.clone(), &backends).registry_service();
        let stream = Uuid::new_v4();
        let tx = transaction(stream, 1);
        let hash = tx.hash().unwrap();

        let record = service.get_transaction_status(&hash).await.unwrap();
        assert_eq!(record.status, TransactionStatus::Unknown);

        service.send_transactions(vec![tx.clone()]).await.unwrap();
        let record = service.get_transaction_status(&hash).await.unwrap();
        assert_eq!(record.status, TransactionStatus::Pending);

        let mut runtime = start(config, &backends).await;
        wait_for_status(&service, &hash, TransactionStatus::Committed, LIMIT).await;
        assert!(service.get_block(&hash).await.unwrap().is_none());

        wait_for_status(&service, &hash, TransactionStatus::Finalized, LIMIT).await;
        let stream_transactions = service.get_stream_transactions(stream).await.unwrap();
        assert_eq!(stream_transactions.len(), 1);
        assert_eq!(stream_transactions[0].transaction().unwrap(), tx);

        let block = service.get_block(&hash).await.unwrap().unwrap();
        assert_eq!(block.height, 1);
        assert!(block.publication.is_some());

        let proof = service.get_merkle_proof(&hash).await.unwrap().unwrap();
        assert!(proof.proof.verify(&block.header.merkle_root_hash));

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_many_streams_end_finalized_in_chained_blocks() {
        let backends = Backends::in_memory();
        let mut runtime = start(config(0, 1, 4), &backends).await;
        let service = runtime.container().registry_service();

        let mut hashes = Vec::new();
        for round in 0..3 {
            let batch: Vec<_> = (0..10).map(|_| transaction(Uuid::new_v4(), round)).collect();
            hashes.extend(service.send_transactions(batch).await.unwrap());
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        for hash in &hashes {
            wait_for_status(&service, hash, TransactionStatus::Finalized, LIMIT).await;
        }

        let blocks = service.get_blocks(0, 100, true).await.unwrap();
        let total: usize = blocks.iter().map(|b| b.transactions.len()).sum();
        assert_eq!(total, hashes.len());
        for pair in blocks.windows(2) {
            assert_eq!(pair[1].header.previous_header_hash, pair[0].header.hash().unwrap().0);
            let publication = pair[0].publication.as_ref().unwrap();
            assert_eq!(pair[1].header.previous_publication_hash, publication.hash().unwrap());
        }

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_instances_share_one_ledger() {
        let backends = Backends::in_memory();
        let mut first = start(config(0, 2, 2), &backends).await;
        let mut second = start(config(1, 2, 2), &backends).await;

        // Submissions through server 1 land on whichever server owns the stream.
        let service = second.container().registry_service();
        let batch: Vec<_> = (0..20).map(|_| transaction(Uuid::new_v4(), 0)).collect();
        let hashes = service.send_transactions(batch).await.unwrap();
        for hash in &hashes {
            wait_for_status(&service, hash, TransactionStatus::Finalized, LIMIT).await;
        }

        second.shutdown().await.unwrap();
        first.shutdown().await.unwrap();
    }
}
