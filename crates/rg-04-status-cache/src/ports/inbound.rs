//! # Inbound Ports

use async_trait::async_trait;
use shared_types::{TransactionHash, TransactionStatusRecord};

use crate::domain::Result;

/// Read and write transaction status records.
///
/// This is the only writer of status records.
#[async_trait]
pub trait TransactionStatusApi: Send + Sync {
    /// Current record, `Unknown` when the transaction was never seen.
    async fn get_transaction_status(&self, hash: &TransactionHash)
        -> Result<TransactionStatusRecord>;

    /// Move the transaction to `record`. Downgrades are dropped.
    async fn set_transaction_status(
        &self,
        hash: &TransactionHash,
        record: TransactionStatusRecord,
    ) -> Result<()>;
}
