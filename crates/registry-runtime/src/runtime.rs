//! # Registry Runtime
//!
//! Owns the running tasks of one registry instance.
//!
//! ## Startup Sequence
//!
//! 1. Bind the HTTP listener (fails fast on a taken port)
//! 2. Start one transaction processor per thread
//! 3. Start the queue cleanup loop
//! 4. Start the block finalizer loop (server 0 only)
//! 5. Serve the HTTP surface
//!
//! Any task that ends on its own ends the instance: [`RegistryRuntime::wait`]
//! returns so the process exits and is restarted by its supervisor.

use std::net::SocketAddr;
use std::sync::Arc;

use rg_05_transaction_processor::TransactionProcessorManager;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

use crate::api;
use crate::container::RegistryContainer;
use crate::errors::{Result, RuntimeError};

/// The running registry instance.
pub struct RegistryRuntime {
    container: Arc<RegistryContainer>,
    processors: TransactionProcessorManager,
    tasks: JoinSet<Result<()>>,
    shutdown_tx: watch::Sender<bool>,
    local_addr: Option<SocketAddr>,
}

impl RegistryRuntime {
    /// Create a runtime; nothing runs until [`start`](Self::start).
    pub fn new(container: Arc<RegistryContainer>) -> Self {
        let processors = container.processor_manager();
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            container,
            processors,
            tasks: JoinSet::new(),
            shutdown_tx,
            local_addr: None,
        }
    }

    /// Start every task of this instance.
    pub async fn start(&mut self) -> Result<()> {
        let config = &self.container.config;
        info!("===========================================");
        info!("  Registry Runtime v{}", crate::VERSION);
        info!("  Registry: {}", config.registry_name);
        info!(
            "  Server {} of {}, {} threads",
            config.processor.server_number, config.processor.servers, config.processor.threads
        );
        info!("===========================================");

        let addr = config.api.socket_addr()?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| RuntimeError::Server(format!("bind {addr}: {e}")))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| RuntimeError::Server(e.to_string()))?;

        self.processors.start();

        let cleanup = self.container.cleanup_service();
        let shutdown = self.shutdown_tx.subscribe();
        self.tasks
            .spawn(async move { cleanup.run(shutdown).await.map_err(RuntimeError::from) });

        match self.container.finalizer_service() {
            Some(finalizer) => {
                let shutdown = self.shutdown_tx.subscribe();
                self.tasks
                    .spawn(async move { finalizer.run(shutdown).await.map_err(RuntimeError::from) });
            }
            None => info!("[rg-06] Block finalizer runs on server 0 only"),
        }

        let router = api::router(Arc::new(self.container.registry_service()));
        let mut shutdown = self.shutdown_tx.subscribe();
        self.tasks.spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown.changed().await;
                })
                .await
                .map_err(|e| RuntimeError::Server(e.to_string()))
        });

        self.local_addr = Some(local_addr);
        info!(addr = %local_addr, "API listening");
        Ok(())
    }

    /// Address the HTTP surface is bound to, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Number of running background tasks, workers excluded.
    pub fn background_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Wait until any task ends; its error (or an unexpected stop) is returned.
    pub async fn wait(&mut self) -> Result<()> {
        tokio::select! {
            Some(result) = self.processors.join_next() => {
                result?;
                Err(RuntimeError::Stopped("transaction processor"))
            }
            Some(joined) = self.tasks.join_next() => {
                flatten(joined)?;
                Err(RuntimeError::Stopped("background task"))
            }
            else => Ok(()),
        }
    }

    /// Signal every task and wait for all of them.
    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Initiating graceful shutdown...");
        let _ = self.shutdown_tx.send(true);

        let mut first_error = self.processors.stop().await.err().map(RuntimeError::from);
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = flatten(joined) {
                error!(error = %e, "Task ended with error");
                first_error.get_or_insert(e);
            }
        }

        info!("Shutdown complete");
        first_error.map_or(Ok(()), Err)
    }

    /// The wired subsystems.
    pub fn container(&self) -> Arc<RegistryContainer> {
        Arc::clone(&self.container)
    }
}

fn flatten(joined: std::result::Result<Result<()>, JoinError>) -> Result<()> {
    joined.unwrap_or_else(|e| Err(RuntimeError::TaskTerminated(e.to_string())))
}
