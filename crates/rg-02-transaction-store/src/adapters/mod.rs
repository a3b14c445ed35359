//! # Adapters
//!
//! - `memory`: in-process `TransactionStore`
//! - `kv`: durable `TransactionStore` over a `KeyValueStore`
//! - `storage`: `KeyValueStore` backends (memory, single file, RocksDB)

pub mod kv;
pub mod memory;
pub mod storage;

pub use kv::KvTransactionStore;
pub use memory::InMemoryTransactionStore;
