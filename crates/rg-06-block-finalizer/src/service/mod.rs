//! # Service Layer
//!
//! - `job`: one finalization step
//! - `runner`: the periodic loop

mod job;
mod runner;

pub use job::BlockFinalizerJob;
pub use runner::{BlockFinalizerService, DEFAULT_BLOCK_INTERVAL};

#[cfg(test)]
mod tests;
