//! # Outbound Ports

use async_trait::async_trait;

use crate::domain::Result;

/// Shared key-value cache reachable by every registry instance.
#[async_trait]
pub trait DistributedCache: Send + Sync {
    /// Value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key` unconditionally.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Store `value` only if the current value equals `expected`
    /// (`None` meaning absent). Returns whether the write happened.
    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<bool>;
}
