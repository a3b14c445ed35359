//! # Inbound Ports

use async_trait::async_trait;

use crate::domain::{FinalizedBlock, Result};

/// One finalization step.
#[async_trait]
pub trait BlockFinalizer: Send + Sync {
    /// Publish and finalize the next block. `None` when nothing is pending.
    async fn execute(&self) -> Result<Option<FinalizedBlock>>;
}
