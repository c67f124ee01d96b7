//! Data producers - asynchronous sources of tab collections
//!
//! The cache treats every producer as an opaque async call that resolves
//! exactly once. Transport, latency and failure classification live here.

mod json_dir;
mod mock;

use async_trait::async_trait;

use crate::core::FetchError;
use crate::domain::{DashboardTab, Record};

pub use json_dir::JsonDirProducer;
pub use mock::{generate_assessments, generate_candidates, generate_clients, MockProducer};

/// Producer-side failure classification
#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("simulated network failure (request #{request})")]
    Simulated { request: u64 },

    #[error("fetch task aborted: {message}")]
    Task { message: String },
}

impl From<ProducerError> for FetchError {
    fn from(err: ProducerError) -> Self {
        FetchError::new(err.to_string())
    }
}

/// Asynchronous source of rows for each tab
#[async_trait]
pub trait DataProducer: Send + Sync + 'static {
    /// Fetch the full collection for `tab`
    async fn fetch(&self, tab: DashboardTab) -> Result<Vec<Record>, ProducerError>;

    /// Short human-readable description shown in the UI
    fn describe(&self) -> String;
}
