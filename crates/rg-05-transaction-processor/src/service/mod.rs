//! # Service Layer
//!
//! - `dispatcher`: the verify procedure
//! - `worker`: one queue consumer
//! - `manager`: the worker pool of one registry instance

mod dispatcher;
mod manager;
mod worker;

pub use dispatcher::TransactionProcessorDispatcher;
pub use manager::TransactionProcessorManager;
pub use worker::TransactionProcessorWorker;

#[cfg(test)]
mod tests;
