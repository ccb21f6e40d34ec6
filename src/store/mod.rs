//! Record stores.
//!
//! A [`RecordStore`] supplies the teardown collection the analytics run
//! over. Stores are constructed explicitly and passed by reference, so tests
//! can hand in a [`MemoryStore`] instead of a real backend.

pub mod file;
pub mod rest;

pub use file::FileStore;
pub use rest::RestStore;

use crate::models::TeardownRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while loading records.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store is not configured: {0}")]
    Config(String),
}

/// Read access to an ordered collection of teardowns.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every teardown the store exposes, in store order.
    async fn fetch_teardowns(&self) -> Result<Vec<TeardownRecord>, StoreError>;

    /// Fetch a single teardown by id.
    async fn fetch_teardown(&self, id: &str) -> Result<TeardownRecord, StoreError> {
        self.fetch_teardowns()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Short description used in logs and report metadata.
    fn describe(&self) -> String;
}

/// In-process store over a fixed list of records.
#[allow(dead_code)] // Test double for code that takes a RecordStore
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<TeardownRecord>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new(records: Vec<TeardownRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_teardowns(&self) -> Result<Vec<TeardownRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }
}
