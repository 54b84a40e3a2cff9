use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecordStore, StoredRecord};
use crate::error::StoreError;

/// In-memory record store. Contents are lost when dropped.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: RwLock<Vec<StoredRecord<T>>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl<T> RecordStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn append(&self, record: T) -> Result<StoredRecord<T>, StoreError> {
        let stored = StoredRecord::new(record);
        self.records.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord<T>>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn remove(&self, id: Uuid) -> Result<StoredRecord<T>, StoreError> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(records.remove(index))
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let mut records = self.records.write().await;
        let count = records.len();
        records.clear();
        Ok(count)
    }
}
