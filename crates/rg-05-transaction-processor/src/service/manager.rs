//! # Transaction Processor Manager
//!
//! Owns the workers of this instance: one per thread, each on the queue of
//! slot `(server_number, thread)`. Workers share one shutdown signal and are
//! awaited on stop.

use rg_01_queue_routing::{QueueResolver, TopologyOptions};
use rg_04_status_cache::TransactionStatusApi;
use shared_bus::MessageBroker;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::domain::{ProcessorError, Result};
use crate::ports::TransactionProcessor;
use crate::service::TransactionProcessorWorker;

/// Starts, watches and stops the worker pool.
pub struct TransactionProcessorManager {
    options: TopologyOptions,
    broker: Arc<dyn MessageBroker>,
    resolver: Arc<dyn QueueResolver>,
    processor: Arc<dyn TransactionProcessor>,
    status: Arc<dyn TransactionStatusApi>,
    shutdown: watch::Sender<bool>,
    workers: JoinSet<Result<()>>,
}

impl TransactionProcessorManager {
    /// Create a manager; no worker runs until [`start`](Self::start).
    pub fn new(
        options: TopologyOptions,
        broker: Arc<dyn MessageBroker>,
        resolver: Arc<dyn QueueResolver>,
        processor: Arc<dyn TransactionProcessor>,
        status: Arc<dyn TransactionStatusApi>,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            options,
            broker,
            resolver,
            processor,
            status,
            shutdown,
            workers: JoinSet::new(),
        }
    }

    /// Queues consumed by this instance.
    pub fn queues(&self) -> Vec<String> {
        (0..self.options.threads)
            .map(|thread| self.resolver.queue_for_slot(self.options.server_number, thread))
            .collect()
    }

    /// Spawn one worker per thread.
    pub fn start(&mut self) {
        for queue in self.queues() {
            let worker = TransactionProcessorWorker::new(
                queue,
                Arc::clone(&self.broker),
                Arc::clone(&self.resolver),
                Arc::clone(&self.processor),
                Arc::clone(&self.status),
            );
            let shutdown = self.shutdown.subscribe();
            self.workers.spawn(async move { worker.run(shutdown).await });
        }
        info!(
            server = self.options.server_number,
            workers = self.workers.len(),
            "[rg-05] Transaction processors started"
        );
    }

    /// Number of workers still running.
    pub fn running(&self) -> usize {
        self.workers.len()
    }

    /// Wait for the next worker to exit. `None` when no worker is running.
    pub async fn join_next(&mut self) -> Option<Result<()>> {
        let joined = self.workers.join_next().await?;
        Some(flatten(joined))
    }

    /// Signal every worker and wait for all of them.
    ///
    /// Returns the first worker error, if any.
    pub async fn stop(&mut self) -> Result<()> {
        let _ = self.shutdown.send(true);
        let mut first_error = None;
        while let Some(joined) = self.workers.join_next().await {
            if let Err(e) = flatten(joined) {
                error!(error = %e, "[rg-05] Worker ended with error");
                first_error.get_or_insert(e);
            }
        }
        info!("[rg-05] Transaction processors stopped");
        first_error.map_or(Ok(()), Err)
    }
}

fn flatten(joined: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    joined.unwrap_or_else(|e| Err(ProcessorError::WorkerTerminated(e.to_string())))
}
