//! # Verify Procedure
//!
//! ```text
//! registry check ──→ load stream ──→ redelivery? ──→ verifier ──→ append ──→ Committed
//!       │                                │              │
//!       └──────── Failed(message) ←──────┼──── invalid ─┘
//!                                        └──→ Committed (no append)
//! ```

use async_trait::async_trait;
use registry_telemetry::{TRANSACTIONS_COMMITTED, TRANSACTIONS_FAILED};
use rg_02_transaction_store::{StoreError, TransactionStore};
use rg_03_verifier_dispatch::TransactionVerifier;
use rg_04_status_cache::TransactionStatusApi;
use shared_types::{
    StreamTransaction, Transaction, TransactionHash, TransactionStatus, TransactionStatusRecord,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{Result, VerifyOutcome};
use crate::ports::TransactionProcessor;

/// Verifies transactions and appends accepted ones to their stream.
pub struct TransactionProcessorDispatcher {
    registry_name: String,
    store: Arc<dyn TransactionStore>,
    verifier: Arc<dyn TransactionVerifier>,
    status: Arc<dyn TransactionStatusApi>,
}

impl TransactionProcessorDispatcher {
    /// Create a dispatcher for the registry named `registry_name`.
    pub fn new(
        registry_name: impl Into<String>,
        store: Arc<dyn TransactionStore>,
        verifier: Arc<dyn TransactionVerifier>,
        status: Arc<dyn TransactionStatusApi>,
    ) -> Self {
        Self {
            registry_name: registry_name.into(),
            store,
            verifier,
            status,
        }
    }

    async fn reject(&self, hash: &TransactionHash, message: String) -> Result<VerifyOutcome> {
        warn!(transaction = %hash, reason = %message, "[rg-05] Invalid transaction");
        self.status
            .set_transaction_status(hash, TransactionStatusRecord::failed(message.clone()))
            .await?;
        TRANSACTIONS_FAILED.inc();
        Ok(VerifyOutcome::Rejected(message))
    }

    async fn committed(&self, hash: &TransactionHash) -> Result<()> {
        self.status
            .set_transaction_status(hash, TransactionStatusRecord::new(TransactionStatus::Committed))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TransactionProcessor for TransactionProcessorDispatcher {
    async fn verify(&self, transaction: &Transaction) -> Result<VerifyOutcome> {
        let hash = transaction.hash()?;
        debug!(transaction = %hash, "[rg-05] Processing transaction");

        if transaction.registry() != self.registry_name {
            return self
                .reject(&hash, "Invalid registry for transaction".to_string())
                .await;
        }

        let stored = self
            .store
            .get_stream_transactions_for_stream(transaction.stream_id())
            .await?;
        if stored.iter().any(|t| t.transaction_hash == hash) {
            debug!(transaction = %hash, "[rg-05] Transaction already on stream");
            self.committed(&hash).await?;
            return Ok(VerifyOutcome::AlreadyCommitted);
        }

        let stream = stored
            .iter()
            .map(StreamTransaction::transaction)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let result = self.verifier.verify_transaction(transaction, &stream).await?;
        if !result.valid {
            return self.reject(&hash, result.error_message).await;
        }

        let record = StreamTransaction::from_transaction(transaction, stream.len() as u64)?;
        match self.store.store(record).await {
            Ok(()) => {}
            Err(StoreError::DuplicateTransaction(_)) => {
                self.committed(&hash).await?;
                return Ok(VerifyOutcome::AlreadyCommitted);
            }
            Err(e) => return Err(e.into()),
        }
        self.committed(&hash).await?;
        TRANSACTIONS_COMMITTED.inc();

        debug!(transaction = %hash, index = stream.len(), "[rg-05] Transaction processed");
        Ok(VerifyOutcome::Committed)
    }
}
