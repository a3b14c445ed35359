//! # Block Finalizer Job
//!
//! ```text
//! pending_block ─┐
//!                ├─→ publish header ─→ finalize_block ─→ status Finalized (each tx)
//! create_next_block ─┘
//! ```
//!
//! An unpublished block left by an earlier failed run is republished before
//! a new block is cut.

use async_trait::async_trait;
use registry_telemetry::{
    HistogramTimer, BLOCKS_PROCESSED, BLOCK_DURATION, BLOCK_TRANSACTIONS_PROCESSED,
};
use rg_02_transaction_store::TransactionStore;
use rg_04_status_cache::TransactionStatusApi;
use shared_types::{TransactionStatus, TransactionStatusRecord};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::{FinalizedBlock, Result};
use crate::ports::{BlockFinalizer, BlockPublisher};

/// Publishes blocks and finalizes their transactions.
pub struct BlockFinalizerJob {
    publisher: Arc<dyn BlockPublisher>,
    store: Arc<dyn TransactionStore>,
    status: Arc<dyn TransactionStatusApi>,
}

impl BlockFinalizerJob {
    /// Create the job.
    pub fn new(
        publisher: Arc<dyn BlockPublisher>,
        store: Arc<dyn TransactionStore>,
        status: Arc<dyn TransactionStatusApi>,
    ) -> Self {
        Self {
            publisher,
            store,
            status,
        }
    }
}

#[async_trait]
impl BlockFinalizer for BlockFinalizerJob {
    async fn execute(&self) -> Result<Option<FinalizedBlock>> {
        let started = Instant::now();

        let block = match self.store.pending_block().await? {
            Some(pending) => {
                info!("[rg-06] Republishing unpublished block");
                pending
            }
            None => match self.store.create_next_block().await? {
                Some(block) => block,
                None => {
                    debug!("[rg-06] No transactions to put in block");
                    return Ok(None);
                }
            },
        };
        let _timer = HistogramTimer::new(&BLOCK_DURATION);

        let block_hash = block.header.hash()?;
        let publication = self.publisher.publish_block(&block.header).await?;
        self.store.finalize_block(&block_hash, &publication).await?;

        for hash in &block.transaction_hashes {
            self.status
                .set_transaction_status(hash, TransactionStatusRecord::new(TransactionStatus::Finalized))
                .await?;
        }

        let transaction_count = block.transaction_hashes.len();
        info!(
            block_hash = %block_hash,
            transactions = transaction_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "[rg-06] Published new block"
        );
        BLOCKS_PROCESSED.inc();
        BLOCK_TRANSACTIONS_PROCESSED.inc_by(transaction_count as f64);

        Ok(Some(FinalizedBlock {
            block_hash,
            transaction_count,
        }))
    }
}
