//! # LRU Cache Adapter
//!
//! Bounded in-process cache. Evicted entries are rebuilt from the store on
//! the next read, so eviction only costs a lookup.

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

use crate::domain::Result;
use crate::ports::DistributedCache;

/// Default number of cached records.
pub const DEFAULT_CACHE_CAPACITY: usize = 100_000;

/// `DistributedCache` for a single registry instance.
pub struct LruDistributedCache {
    entries: Mutex<LruCache<String, Vec<u8>>>,
}

impl LruDistributedCache {
    /// Cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LruDistributedCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[async_trait]
impl DistributedCache for LruDistributedCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.lock().put(key.to_string(), value);
        Ok(())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<bool> {
        let mut entries = self.entries.lock();
        if entries.get(key).map(Vec::as_slice) != expected {
            return Ok(false);
        }
        entries.put(key.to_string(), value);
        Ok(true)
    }
}
