//! # Transaction Status Service
//!
//! Status records live in the `DistributedCache` as JSON. Reads fall back
//! to the transaction store on a miss. Writes are a compare-and-set against
//! the value read and never lower the status rank:
//!
//! ```text
//! Unknown < Pending < Failed < Committed < Finalized
//! ```

use async_trait::async_trait;
use registry_telemetry::record_error;
use rg_02_transaction_store::TransactionStore;
use shared_types::{TransactionHash, TransactionStatus, TransactionStatusRecord};
use std::sync::Arc;
use tracing::{error, trace, warn};

use crate::domain::{status_key, Result};
use crate::ports::{DistributedCache, TransactionStatusApi};

/// Status records backed by a cache with store fallback.
pub struct TransactionStatusService {
    cache: Arc<dyn DistributedCache>,
    store: Arc<dyn TransactionStore>,
}

impl TransactionStatusService {
    /// Create the service.
    pub fn new(cache: Arc<dyn DistributedCache>, store: Arc<dyn TransactionStore>) -> Self {
        Self { cache, store }
    }

    fn decode(bytes: &[u8]) -> Result<TransactionStatusRecord> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[async_trait]
impl TransactionStatusApi for TransactionStatusService {
    async fn get_transaction_status(
        &self,
        hash: &TransactionHash,
    ) -> Result<TransactionStatusRecord> {
        let key = status_key(hash);
        if let Some(bytes) = self.cache.get(&key).await? {
            return Self::decode(&bytes);
        }

        let record = TransactionStatusRecord::new(self.store.get_transaction_status(hash).await?);
        if record.status != TransactionStatus::Unknown {
            // A concurrent writer wins; its record is at least as fresh.
            self.cache
                .compare_and_set(&key, None, serde_json::to_vec(&record)?)
                .await?;
        }
        Ok(record)
    }

    async fn set_transaction_status(
        &self,
        hash: &TransactionHash,
        record: TransactionStatusRecord,
    ) -> Result<()> {
        let key = status_key(hash);
        trace!(transaction = %hash, status = %record.status, "[rg-04] Setting status");

        let current_bytes = self.cache.get(&key).await?;
        if let Some(bytes) = &current_bytes {
            let current = Self::decode(bytes)?;
            if current.status.is_downgrade_to(record.status) {
                warn!(
                    transaction = %hash,
                    current = %current.status,
                    requested = %record.status,
                    "[rg-04] Status downgrade prevented"
                );
                return Ok(());
            }
        }

        let written = self
            .cache
            .compare_and_set(&key, current_bytes.as_deref(), serde_json::to_vec(&record)?)
            .await?;
        if !written {
            record_error!("rg-04", "concurrent_modification");
            let latest = match self.cache.get(&key).await? {
                Some(bytes) => Self::decode(&bytes)?.status,
                None => TransactionStatus::Unknown,
            };
            error!(
                transaction = %hash,
                existing = %latest,
                "[rg-04] Concurrent modification detected, update aborted"
            );
        }
        Ok(())
    }
}
