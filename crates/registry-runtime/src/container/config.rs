//! # Registry Configuration
//!
//! Unified configuration for one registry instance.
//!
//! ## Loading Order
//!
//! 1. Built-in defaults
//! 2. JSON file named by `RG_CONFIG` (optional, partial files allowed)
//! 3. Environment overrides (`RG_REGISTRY_NAME`, `RG_SERVER_NUMBER`, ...)
//!
//! `RG_VERIFIERS` adds remote verifiers on top of the file's table:
//! `family=url` pairs separated by commas, e.g.
//! `chat=http://chat-verifier:5000/verify,energy.v1=http://energy:5000/verify`.
//!
//! The result is validated before anything is started.

use rg_01_queue_routing::{RoutingError, TopologyOptions};
use rg_03_verifier_dispatch::VerifierKind;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Environment variable naming the JSON configuration file.
pub const CONFIG_FILE_VAR: &str = "RG_CONFIG";

/// Complete registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry this instance owns; transactions for other registries are rejected.
    pub registry_name: String,
    /// Ring topology and the slot of this instance.
    pub processor: TopologyOptions,
    /// Block finalizer configuration.
    pub finalizer: FinalizerConfig,
    /// Orphaned queue cleanup configuration.
    pub cleanup: CleanupConfig,
    /// Transaction store backend.
    pub storage: StorageConfig,
    /// HTTP surface.
    pub api: ApiConfig,
    /// Payload type family to verifier.
    pub verifiers: BTreeMap<String, VerifierKind>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_name: "registry".to_string(),
            processor: TopologyOptions::default(),
            finalizer: FinalizerConfig::default(),
            cleanup: CleanupConfig::default(),
            storage: StorageConfig::default(),
            api: ApiConfig::default(),
            verifiers: BTreeMap::from([("dev".to_string(), VerifierKind::HashIntegrity)]),
        }
    }
}

impl RegistryConfig {
    /// Small, fast configuration for tests: in-memory storage, ephemeral
    /// port, short intervals.
    pub fn for_testing() -> Self {
        Self {
            processor: TopologyOptions::new(0, 1, 2),
            finalizer: FinalizerConfig {
                interval: Duration::from_millis(20),
            },
            cleanup: CleanupConfig {
                interval: Duration::from_millis(50),
            },
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            ..Self::default()
        }
    }

    /// Defaults, then the `RG_CONFIG` file, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_FILE_VAR) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration file. Missing fields keep their defaults.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_json(&raw)?;
        info!(path, "[runtime] Configuration file loaded");
        Ok(config)
    }

    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `RG_*` overrides resolved through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("RG_REGISTRY_NAME") {
            self.registry_name = name;
        }
        if let Some(value) = parse_var(&lookup, "RG_SERVER_NUMBER")? {
            self.processor.server_number = value;
        }
        if let Some(value) = parse_var(&lookup, "RG_SERVERS")? {
            self.processor.servers = value;
        }
        if let Some(value) = parse_var(&lookup, "RG_THREADS")? {
            self.processor.threads = value;
        }
        if let Some(value) = parse_var(&lookup, "RG_WEIGHT")? {
            self.processor.weight = value;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "RG_BLOCK_INTERVAL_MS")? {
            self.finalizer.interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "RG_CLEANUP_INTERVAL_MS")? {
            self.cleanup.interval = Duration::from_millis(ms);
        }
        if let Some(backend) = parse_var(&lookup, "RG_STORAGE_BACKEND")? {
            self.storage.backend = backend;
        }
        if let Some(dir) = lookup("RG_DATA_DIR") {
            self.storage.path = PathBuf::from(dir);
        }
        if let Some(port) = parse_var(&lookup, "RG_API_PORT")? {
            self.api.port = port;
        }
        if let Some(table) = lookup("RG_VERIFIERS") {
            self.verifiers.extend(parse_verifier_table(&table)?);
        }
        Ok(())
    }

    /// Reject configurations the runtime cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry_name.trim().is_empty() {
            return Err(ConfigError::Invalid("registry_name cannot be empty".into()));
        }
        self.processor.validate()?;
        if self.finalizer.interval.is_zero() {
            return Err(ConfigError::Invalid("finalizer interval cannot be 0".into()));
        }
        if self.cleanup.interval.is_zero() {
            return Err(ConfigError::Invalid("cleanup interval cannot be 0".into()));
        }
        if self.storage.backend != StorageBackend::Memory
            && self.storage.path.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid(format!(
                "{} storage needs a path",
                self.storage.backend
            )));
        }
        for (family, kind) in &self.verifiers {
            if family.is_empty() {
                return Err(ConfigError::Invalid("verifier family cannot be empty".into()));
            }
            kind.validate(family).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        self.api.socket_addr()?;
        Ok(())
    }
}

fn parse_verifier_table(table: &str) -> Result<Vec<(String, VerifierKind)>, ConfigError> {
    table
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((family, url)) if !family.trim().is_empty() && !url.trim().is_empty() => {
                Ok((family.trim().to_string(), VerifierKind::remote(url.trim())))
            }
            _ => Err(ConfigError::InvalidValue {
                key: "RG_VERIFIERS",
                value: entry.to_string(),
            }),
        })
        .collect()
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(None),
    }
}

/// Block finalizer configuration.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalizerConfig {
    /// Pause between runs.
    #[serde(rename = "interval_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub interval: Duration,
}

impl Default for FinalizerConfig {
    fn default() -> Self {
        Self {
            interval: rg_06_block_finalizer::DEFAULT_BLOCK_INTERVAL,
        }
    }
}

/// Queue cleanup configuration.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Pause between passes.
    #[serde(rename = "interval_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub interval: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval: rg_01_queue_routing::DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

/// Transaction store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; lost on restart.
    #[default]
    Memory,
    /// Single file under `path`.
    File,
    /// RocksDB directory under `path` (feature `rocksdb`).
    RocksDb,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StorageBackend::Memory => "memory",
            StorageBackend::File => "file",
            StorageBackend::RocksDb => "rocksdb",
        };
        f.write_str(name)
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            other => Err(ConfigError::Invalid(format!("unknown storage backend {other:?}"))),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend kind.
    pub backend: StorageBackend,
    /// Data directory for durable backends.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::from("./data"),
        }
    }
}

/// HTTP surface configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Listen address.
    pub host: String,
    /// Listen port; 0 picks a free one.
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ApiConfig {
    /// Parsed listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid api host {:?}", self.host)))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read config file {path}: {message}")]
    Read {
        /// File path.
        path: String,
        /// I/O error text.
        message: String,
    },

    /// Configuration file is not valid JSON for `RegistryConfig`.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Environment override did not parse.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },

    /// Topology outside its allowed ranges.
    #[error(transparent)]
    Topology(#[from] RoutingError),

    /// Any other rejected setting.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
