//! # Queue Worker
//!
//! One worker per `(server, thread)` slot, bound to that slot's queue. A
//! delivery is acknowledged only once it has been fully handled: verified,
//! rerouted, or recorded as undecodable. On error the delivery is requeued
//! and the worker stops.

use registry_telemetry::{record_error, TRANSACTIONS_FAILED, TRANSACTIONS_REROUTED};
use rg_01_queue_routing::QueueResolver;
use rg_04_status_cache::TransactionStatusApi;
use shared_bus::{Delivery, MessageBroker};
use shared_types::{Transaction, TransactionHash, TransactionStatusRecord};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::domain::{DeliveryOutcome, Result};
use crate::ports::TransactionProcessor;

/// Consumer of a single verifier queue.
pub struct TransactionProcessorWorker {
    queue: String,
    broker: Arc<dyn MessageBroker>,
    resolver: Arc<dyn QueueResolver>,
    processor: Arc<dyn TransactionProcessor>,
    status: Arc<dyn TransactionStatusApi>,
}

impl TransactionProcessorWorker {
    /// Create a worker consuming `queue`.
    pub fn new(
        queue: impl Into<String>,
        broker: Arc<dyn MessageBroker>,
        resolver: Arc<dyn QueueResolver>,
        processor: Arc<dyn TransactionProcessor>,
        status: Arc<dyn TransactionStatusApi>,
    ) -> Self {
        Self {
            queue: queue.into(),
            broker,
            resolver,
            processor,
            status,
        }
    }

    /// Queue this worker consumes.
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Consume until `shutdown` flips or a delivery fails.
    ///
    /// A delivery already taken is always handled to completion before the
    /// shutdown signal is observed.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        self.broker.declare_queue(&self.queue).await?;
        info!(queue = %self.queue, "[rg-05] Worker started");

        loop {
            let delivery = tokio::select! {
                delivery = self.broker.consume(&self.queue) => delivery?,
                _ = shutdown.changed() => {
                    info!(queue = %self.queue, "[rg-05] Worker stopping");
                    return Ok(());
                }
            };

            if let Err(e) = self.handle(&delivery).await {
                error!(
                    queue = %self.queue,
                    delivery_tag = delivery.delivery_tag,
                    error = %e,
                    "[rg-05] Error processing transaction"
                );
                record_error!("rg-05", e.kind());
                self.broker.nack(delivery.delivery_tag, true).await?;
                return Err(e);
            }
        }
    }

    /// Handle one delivery and acknowledge it.
    pub async fn handle(&self, delivery: &Delivery) -> Result<DeliveryOutcome> {
        let transaction = match Transaction::from_bytes(&delivery.body) {
            Ok(transaction) => transaction,
            Err(e) => {
                let hash = TransactionHash::of_bytes(&delivery.body);
                warn!(queue = %self.queue, transaction = %hash, error = %e, "[rg-05] Undecodable message");
                self.status
                    .set_transaction_status(
                        &hash,
                        TransactionStatusRecord::failed("Invalid transaction encoding"),
                    )
                    .await?;
                TRANSACTIONS_FAILED.inc();
                self.broker.ack(delivery.delivery_tag).await?;
                return Ok(DeliveryOutcome::Undecodable);
            }
        };

        let target = self.resolver.queue_for_transaction(&transaction);
        if target != self.queue {
            warn!(
                current_queue = %self.queue,
                new_queue = %target,
                "[rg-05] Received transaction for wrong queue, requeuing"
            );
            self.broker.publish(&target, delivery.body.clone()).await?;
            self.broker.ack(delivery.delivery_tag).await?;
            TRANSACTIONS_REROUTED.inc();
            return Ok(DeliveryOutcome::Rerouted { queue: target });
        }

        let outcome = self.processor.verify(&transaction).await?;
        self.broker.ack(delivery.delivery_tag).await?;
        debug!(queue = %self.queue, outcome = ?outcome, "[rg-05] Delivery handled");
        Ok(DeliveryOutcome::Processed(outcome))
    }
}
