//! # Adapters
//!
//! - `lru_cache`: in-process `DistributedCache`

mod lru_cache;

pub use lru_cache::{LruDistributedCache, DEFAULT_CACHE_CAPACITY};
