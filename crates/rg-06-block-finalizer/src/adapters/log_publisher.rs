//! # Log Publisher
//!
//! Writes the block hash to the process log. Useful locally; the log is not
//! tamper evident, so this gives no immutability guarantee.

use async_trait::async_trait;
use shared_types::{BlockHeader, BlockPublication};
use tracing::info;

use crate::domain::Result;
use crate::ports::BlockPublisher;

/// `BlockPublisher` backed by `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

#[async_trait]
impl BlockPublisher for LogPublisher {
    async fn publish_block(&self, header: &BlockHeader) -> Result<BlockPublication> {
        let hash = header.hash()?;
        info!(block_hash = %hash, "[rg-06] Block published");
        Ok(BlockPublication::LogEntry {
            block_header_hash: hash.0,
        })
    }
}
