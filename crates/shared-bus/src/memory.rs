//! # In-Memory Message Broker
//!
//! Single-process broker with the queue semantics of a durable AMQP broker.
//! Suitable for single-node deployments and tests; multi-instance
//! deployments plug a networked broker behind the same trait.

use crate::broker::{Delivery, MessageBroker, QueueInfo};
use crate::errors::BrokerError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::debug;

#[derive(Debug, Clone)]
struct Message {
    body: Vec<u8>,
    redelivered: bool,
}

#[derive(Default)]
struct QueueState {
    ready: VecDeque<Message>,
    notify: Arc<Notify>,
}

#[derive(Default)]
struct BrokerState {
    queues: BTreeMap<String, QueueState>,
    unacked: HashMap<u64, (String, Message)>,
    next_tag: u64,
}

impl BrokerState {
    fn take(&mut self, queue: &str) -> Result<Option<Delivery>, BrokerError> {
        let state = self
            .queues
            .get_mut(queue)
            .ok_or_else(|| BrokerError::QueueNotFound(queue.to_string()))?;

        let Some(message) = state.ready.pop_front() else {
            return Ok(None);
        };

        self.next_tag += 1;
        let delivery_tag = self.next_tag;
        let delivery = Delivery {
            queue: queue.to_string(),
            delivery_tag,
            redelivered: message.redelivered,
            body: message.body.clone(),
        };
        self.unacked
            .insert(delivery_tag, (queue.to_string(), message));
        Ok(Some(delivery))
    }
}

/// In-process implementation of [`MessageBroker`].
#[derive(Default)]
pub struct InMemoryMessageBroker {
    state: Mutex<BrokerState>,
    messages_published: AtomicU64,
    messages_acked: AtomicU64,
}

impl InMemoryMessageBroker {
    /// Create an empty broker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total messages published since creation.
    #[must_use]
    pub fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }

    /// Total deliveries acknowledged since creation.
    #[must_use]
    pub fn messages_acked(&self) -> u64 {
        self.messages_acked.load(Ordering::Relaxed)
    }

    /// Deliveries currently outstanding.
    #[must_use]
    pub fn unacked_count(&self) -> usize {
        self.state.lock().unacked.len()
    }
}

#[async_trait]
impl MessageBroker for InMemoryMessageBroker {
    async fn declare_queue(&self, queue: &str) -> Result<(), BrokerError> {
        let mut state = self.state.lock();
        if !state.queues.contains_key(queue) {
            debug!(queue, "Queue declared");
            state.queues.insert(queue.to_string(), QueueState::default());
        }
        Ok(())
    }

    async fn publish(&self, queue: &str, body: Vec<u8>) -> Result<(), BrokerError> {
        let notify = {
            let mut state = self.state.lock();
            let entry = state.queues.entry(queue.to_string()).or_default();
            entry.ready.push_back(Message {
                body,
                redelivered: false,
            });
            Arc::clone(&entry.notify)
        };
        self.messages_published.fetch_add(1, Ordering::Relaxed);
        notify.notify_one();
        Ok(())
    }

    async fn consume(&self, queue: &str) -> Result<Delivery, BrokerError> {
        loop {
            let notify = {
                let mut state = self.state.lock();
                if let Some(delivery) = state.take(queue)? {
                    return Ok(delivery);
                }
                state
                    .queues
                    .get(queue)
                    .map(|q| Arc::clone(&q.notify))
                    .ok_or_else(|| BrokerError::QueueNotFound(queue.to_string()))?
            };
            let notified = notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            // Re-check after registering so a publish or delete racing the
            // unlock above is observed.
            let ready = self.state.lock().take(queue)?;
            if let Some(delivery) = ready {
                return Ok(delivery);
            }
            notified.await;
        }
    }

    async fn basic_get(&self, queue: &str) -> Result<Option<Delivery>, BrokerError> {
        self.state.lock().take(queue)
    }

    async fn ack(&self, delivery_tag: u64) -> Result<(), BrokerError> {
        let mut state = self.state.lock();
        state
            .unacked
            .remove(&delivery_tag)
            .ok_or(BrokerError::UnknownDeliveryTag(delivery_tag))?;
        self.messages_acked.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn nack(&self, delivery_tag: u64, requeue: bool) -> Result<(), BrokerError> {
        let notify = {
            let mut state = self.state.lock();
            let (queue, mut message) = state
                .unacked
                .remove(&delivery_tag)
                .ok_or(BrokerError::UnknownDeliveryTag(delivery_tag))?;
            if !requeue {
                debug!(queue = %queue, delivery_tag, "Message discarded");
                return Ok(());
            }
            match state.queues.get_mut(&queue) {
                Some(queue_state) => {
                    message.redelivered = true;
                    queue_state.ready.push_front(message);
                    Arc::clone(&queue_state.notify)
                }
                // Queue was deleted while the message was outstanding.
                None => return Ok(()),
            }
        };
        notify.notify_one();
        Ok(())
    }

    async fn list_queues(&self) -> Result<Vec<QueueInfo>, BrokerError> {
        let state = self.state.lock();
        Ok(state
            .queues
            .iter()
            .map(|(name, queue)| QueueInfo {
                name: name.clone(),
                messages: queue.ready.len(),
            })
            .collect())
    }

    async fn delete_queue(&self, queue: &str) -> Result<(), BrokerError> {
        let removed = {
            let mut state = self.state.lock();
            state.unacked.retain(|_, (name, _)| name != queue);
            state.queues.remove(queue)
        };
        match removed {
            Some(queue_state) => {
                debug!(queue, dropped = queue_state.ready.len(), "Queue deleted");
                queue_state.notify.notify_waiters();
                Ok(())
            }
            None => Err(BrokerError::QueueNotFound(queue.to_string())),
        }
    }
}
