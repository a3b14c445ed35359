//! # Domain Layer
//!
//! - `entities`: verify and delivery outcomes
//! - `errors`: `ProcessorError`

pub mod entities;
pub mod errors;

pub use entities::{DeliveryOutcome, VerifyOutcome};
pub use errors::{ProcessorError, Result};
