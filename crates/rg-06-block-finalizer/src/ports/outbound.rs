//! # Outbound Ports

use async_trait::async_trait;
use shared_types::{BlockHeader, BlockPublication};

use crate::domain::Result;

/// External immutable log that anchors block headers.
#[async_trait]
pub trait BlockPublisher: Send + Sync {
    /// Anchor `header` and return the proof of publication.
    ///
    /// Publishing the same header twice must be harmless.
    async fn publish_block(&self, header: &BlockHeader) -> Result<BlockPublication>;
}
