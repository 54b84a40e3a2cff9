//! Append-only record persistence.
//!
//! - `JsonFileStore` keeps records in a pretty-printed JSON array on disk
//! - `MemoryStore` keeps them in memory, for tests and throwaway runs

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::StoreError;

/// File name for accepted submissions.
pub const SUBMISSIONS_FILE: &str = "submitted-recipes.json";

/// File name for saved recipes.
pub const SAVED_RECIPES_FILE: &str = "saved-recipes.json";

/// A persisted record with its identity and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord<T> {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: T,
}

impl<T> StoredRecord<T> {
    pub fn new(record: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            record,
        }
    }
}

/// Storage for records of type `T`, in insertion order.
#[async_trait]
pub trait RecordStore<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Append a record and return it with its assigned id.
    async fn append(&self, record: T) -> Result<StoredRecord<T>, StoreError>;

    /// All records, oldest first.
    async fn list_all(&self) -> Result<Vec<StoredRecord<T>>, StoreError>;

    /// Remove one record. Fails with [`StoreError::NotFound`] for unknown ids.
    async fn remove(&self, id: Uuid) -> Result<StoredRecord<T>, StoreError>;

    /// Remove every record, returning how many were removed.
    async fn clear(&self) -> Result<usize, StoreError>;
}

/// Default data directory: ~/.remix/data
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".remix").join("data"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Data directory from `REMIX_DATA_DIR`, falling back to [`default_data_dir`].
pub fn data_dir_from_env() -> PathBuf {
    std::env::var("REMIX_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_data_dir())
}
