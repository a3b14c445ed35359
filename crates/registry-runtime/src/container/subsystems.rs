//! # Subsystem Container
//!
//! Builds every subsystem of one registry instance from [`RegistryConfig`].
//!
//! ## Wiring
//!
//! ```text
//! Backends: TransactionStore ── MessageBroker ── DistributedCache
//!              │                    │                  │
//!              │                    │        TransactionStatusService (rg-04)
//!              │                    │                  │
//! VerifierRegistry (rg-03) ─→ TransactionProcessorDispatcher (rg-05)
//!                                   │
//! ConsistentHashRingQueueResolver (rg-01) ─→ workers, cleanup, submissions
//!
//! BlockFinalizerJob (rg-06): server 0 only
//! ```
//!
//! The backends are separate from the container so several instances of one
//! registry (different `server_number`) can share a store, broker and cache.

use std::sync::Arc;

use tracing::info;

use rg_01_queue_routing::{ConsistentHashRingQueueResolver, QueueCleanupService, QueueResolver};
use rg_02_transaction_store::{
    FileBackedKVStore, InMemoryTransactionStore, KvTransactionStore, MerkleProofService,
    TransactionStore,
};
use rg_03_verifier_dispatch::VerifierRegistry;
use rg_04_status_cache::{DistributedCache, LruDistributedCache, TransactionStatusService};
use rg_05_transaction_processor::{TransactionProcessorDispatcher, TransactionProcessorManager};
use rg_06_block_finalizer::{BlockFinalizerJob, BlockFinalizerService, LogPublisher};
use shared_bus::{InMemoryMessageBroker, MessageBroker};

use crate::container::config::{ConfigError, RegistryConfig, StorageBackend, StorageConfig};
use crate::errors::Result;
use crate::service::RegistryService;

/// File name of the single-file store inside the data directory.
pub const STORE_FILE_NAME: &str = "registry.db";

/// Shared infrastructure: durable state and messaging.
#[derive(Clone)]
pub struct Backends {
    /// Transaction store.
    pub store: Arc<dyn TransactionStore>,
    /// Message broker carrying transactions to workers.
    pub broker: Arc<dyn MessageBroker>,
    /// Status cache.
    pub cache: Arc<dyn DistributedCache>,
}

impl Backends {
    /// Open the configured store with an in-process broker and cache.
    pub fn open(storage: &StorageConfig) -> Result<Self> {
        Ok(Self {
            store: open_store(storage)?,
            broker: Arc::new(InMemoryMessageBroker::new()),
            cache: Arc::new(LruDistributedCache::default()),
        })
    }

    /// In-memory store, broker and cache.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemoryTransactionStore::new()),
            broker: Arc::new(InMemoryMessageBroker::new()),
            cache: Arc::new(LruDistributedCache::default()),
        }
    }
}

fn open_store(storage: &StorageConfig) -> Result<Arc<dyn TransactionStore>> {
    let store: Arc<dyn TransactionStore> = match storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryTransactionStore::new()),
        StorageBackend::File => {
            std::fs::create_dir_all(&storage.path).map_err(|e| ConfigError::Read {
                path: storage.path.display().to_string(),
                message: e.to_string(),
            })?;
            let kv = FileBackedKVStore::open(storage.path.join(STORE_FILE_NAME))?;
            Arc::new(KvTransactionStore::new(kv))
        }
        StorageBackend::RocksDb => open_rocksdb(storage)?,
    };
    info!(backend = %storage.backend, path = %storage.path.display(), "[rg-02] Transaction store opened");
    Ok(store)
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(storage: &StorageConfig) -> Result<Arc<dyn TransactionStore>> {
    let kv = rg_02_transaction_store::RocksDbStore::open_default(&storage.path)?;
    Ok(Arc::new(KvTransactionStore::new(kv)))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_storage: &StorageConfig) -> Result<Arc<dyn TransactionStore>> {
    Err(ConfigError::Invalid("rocksdb storage requires the `rocksdb` feature".into()).into())
}

/// Every subsystem instance of one registry server.
pub struct RegistryContainer {
    /// Validated configuration.
    pub config: RegistryConfig,
    /// Shared infrastructure.
    pub backends: Backends,
    /// Queue resolver for the configured topology (rg-01).
    pub resolver: Arc<dyn QueueResolver>,
    /// Transaction status service (rg-04).
    pub status: Arc<TransactionStatusService>,
    /// Verify procedure run by the workers (rg-05).
    pub processor: Arc<TransactionProcessorDispatcher>,
}

impl std::fmt::Debug for RegistryContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryContainer").finish_non_exhaustive()
    }
}

impl RegistryContainer {
    /// Validate `config` and wire the subsystems over `backends`.
    pub fn new(config: RegistryConfig, backends: Backends) -> Result<Self> {
        config.validate()?;

        let resolver: Arc<dyn QueueResolver> =
            Arc::new(ConsistentHashRingQueueResolver::new(config.processor.clone())?);
        let status = Arc::new(TransactionStatusService::new(
            Arc::clone(&backends.cache),
            Arc::clone(&backends.store),
        ));

        let mut verifiers = VerifierRegistry::new();
        for (family, kind) in &config.verifiers {
            let verifier = kind
                .build(family)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            verifiers.register(family.clone(), verifier);
        }
        info!(families = ?verifiers.families(), "[rg-03] Verifiers registered");

        let processor = Arc::new(TransactionProcessorDispatcher::new(
            config.registry_name.clone(),
            Arc::clone(&backends.store),
            Arc::new(verifiers),
            status.clone(),
        ));

        info!(
            registry = %config.registry_name,
            server = config.processor.server_number,
            servers = config.processor.servers,
            threads = config.processor.threads,
            "Registry subsystems initialized"
        );

        Ok(Self {
            config,
            backends,
            resolver,
            status,
            processor,
        })
    }

    /// Open the configured backends and wire the subsystems.
    pub fn open(config: RegistryConfig) -> Result<Self> {
        let backends = Backends::open(&config.storage)?;
        Self::new(config, backends)
    }

    /// Worker pool for this server's queues.
    pub fn processor_manager(&self) -> TransactionProcessorManager {
        TransactionProcessorManager::new(
            self.config.processor.clone(),
            Arc::clone(&self.backends.broker),
            Arc::clone(&self.resolver),
            self.processor.clone(),
            self.status.clone(),
        )
    }

    /// Cleanup of queues outside the current topology.
    pub fn cleanup_service(&self) -> QueueCleanupService {
        QueueCleanupService::new(
            Arc::clone(&self.backends.broker),
            Arc::clone(&self.resolver),
            self.config.cleanup.interval,
        )
    }

    /// True when this server runs the block finalizer.
    pub fn runs_finalizer(&self) -> bool {
        self.config.processor.server_number == 0
    }

    /// Block finalizer loop, or `None` on servers other than 0.
    pub fn finalizer_service(&self) -> Option<BlockFinalizerService> {
        if !self.runs_finalizer() {
            return None;
        }
        let job = BlockFinalizerJob::new(
            Arc::new(LogPublisher),
            Arc::clone(&self.backends.store),
            self.status.clone(),
        );
        Some(BlockFinalizerService::new(
            Arc::new(job),
            self.config.finalizer.interval,
        ))
    }

    /// RPC operations over this instance.
    pub fn registry_service(&self) -> RegistryService {
        RegistryService::new(
            Arc::clone(&self.backends.broker),
            Arc::clone(&self.resolver),
            Arc::clone(&self.backends.store),
            self.status.clone(),
            MerkleProofService::new(Arc::clone(&self.backends.store)),
        )
    }
}
