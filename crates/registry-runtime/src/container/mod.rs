//! # Subsystem Container
//!
//! Configuration and dependency wiring for one registry instance.
//!
//! - Subsystems are built in dependency order: store, status, verifiers, processor
//! - Background loops are handed out unstarted; the runtime owns their tasks

pub mod config;
pub mod subsystems;

pub use config::{
    ApiConfig, CleanupConfig, ConfigError, FinalizerConfig, RegistryConfig, StorageBackend,
    StorageConfig,
};
pub use subsystems::{Backends, RegistryContainer};
