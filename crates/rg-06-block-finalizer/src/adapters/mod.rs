//! # Adapters
//!
//! - `log_publisher`: development `BlockPublisher` writing to the process log

mod log_publisher;

pub use log_publisher::LogPublisher;
