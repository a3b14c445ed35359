//! # Rejection and Ordering
//!
//! Rejected transactions end `Failed` with a reason and never reach a
//! stream; accepted ones keep submission order per stream. A payload type
//! with no registered verifier family stops the instance.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use registry_runtime::{Backends, RuntimeError};
    use rg_05_transaction_processor::ProcessorError;
    use shared_types::TransactionStatus;
    use uuid::Uuid;

    use crate::integration::support::{
        config, start, transaction, transaction_with, wait_for_status,
    };

    const LIMIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_rejected_transactions_are_failed_with_reason() {
        let backends = Backends::in_memory();
        let mut runtime = start(config(0, 1, 2), &backends).await;
        let service = runtime.container().registry_service();
        let stream = Uuid::new_v4();

        let foreign = transaction_with("elsewhere", "dev.Event", stream, 1);
        let mut tampered = transaction(stream, 2);
        tampered.payload.push(b'!');
        let unqualified = transaction_with("registry", "Event", stream, 3);

        let hashes = service
            .send_transactions(vec![foreign, tampered, unqualified])
            .await
            .unwrap();
        for hash in &hashes {
            wait_for_status(&service, hash, TransactionStatus::Failed, LIMIT).await;
        }

        let messages: Vec<String> = {
            let mut out = Vec::new();
            for hash in &hashes {
                out.push(service.get_transaction_status(hash).await.unwrap().message);
            }
            out
        };
        assert_eq!(messages[0], "Invalid registry for transaction");
        assert_eq!(messages[1], "Payload hash does not match payload");
        assert!(messages[2].contains("Invalid payload type"));

        assert!(service.get_stream_transactions(stream).await.unwrap().is_empty());
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_stream_keeps_submission_order() {
        let backends = Backends::in_memory();
        let mut runtime = start(config(0, 1, 4), &backends).await;
        let service = runtime.container().registry_service();
        let stream = Uuid::new_v4();

        let mut hashes = Vec::new();
        for nonce in 0..25 {
            hashes.extend(service.send_transactions(vec![transaction(stream, nonce)]).await.unwrap());
        }
        // A replayed nonce is rejected by the verifier.
        let replay = transaction_with("registry", "dev.Retry", stream, 3);
        let replay_hash = service.send_transactions(vec![replay]).await.unwrap()[0];

        for hash in &hashes {
            wait_for_status(&service, hash, TransactionStatus::Committed, LIMIT).await;
        }
        wait_for_status(&service, &replay_hash, TransactionStatus::Failed, LIMIT).await;

        let stored = service.get_stream_transactions(stream).await.unwrap();
        assert_eq!(stored.len(), 25);
        for (index, record) in stored.iter().enumerate() {
            assert_eq!(record.stream_index, index as u64);
            assert_eq!(record.transaction_hash, hashes[index]);
        }
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_verifier_family_stops_instance() {
        let backends = Backends::in_memory();
        let mut runtime = start(config(0, 1, 1), &backends).await;
        let service = runtime.container().registry_service();

        let tx = transaction_with("registry", "com.unregistered.Event", Uuid::new_v4(), 1);
        service.send_transactions(vec![tx]).await.unwrap();

        let err = tokio::time::timeout(LIMIT, runtime.wait())
            .await
            .expect("instance should stop")
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Processor(ProcessorError::Dispatch(_))
        ));
        let _ = runtime.shutdown().await;
    }
}
