//! # Registry Runtime Library
//!
//! Wires one registry instance and exposes it for the binary and for tests.
//! The entry point is the `main.rs` binary.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and subsystem wiring
//! - `service` - RPC operations, transport independent
//! - `api/` - HTTP/JSON surface over the service
//! - `runtime` - Task ownership, startup and shutdown
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: every subsystem is reached through its ports
//! - **Shared backends**: instances of one registry share store, broker and cache
//! - **Fail fast**: any background task ending stops the instance

#![warn(clippy::all)]

pub mod api;
pub mod container;
pub mod errors;
pub mod runtime;
pub mod service;

pub use container::{Backends, ConfigError, RegistryConfig, RegistryContainer};
pub use errors::RuntimeError;
pub use runtime::RegistryRuntime;
pub use service::{RegistryService, ServiceError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
