//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Data producers (generated mock data, JSON dataset directories)
//! - Tokio runtime bridge for async operations

pub mod producer;
pub mod runtime;

pub use producer::{DataProducer, JsonDirProducer, MockProducer, ProducerError};
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
