use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{RecordStore, StoredRecord};
use crate::error::StoreError;

/// Record store backed by a single JSON array file.
///
/// Every operation reads the whole file and writes it back pretty-printed.
/// A missing file reads as empty. Writers in this process are serialized;
/// nothing guards against other processes writing the same file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store for `file_name` inside `dir`.
    pub fn in_dir(dir: &Path, file_name: &str) -> Self {
        Self::new(dir.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load<T: DeserializeOwned>(&self) -> Result<Vec<StoredRecord<T>>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist<T: Serialize>(&self, records: &[StoredRecord<T>]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(records)?;

        // Write to a sibling temp file and rename so readers never see a partial file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "Wrote record store"
        );
        Ok(())
    }
}

#[async_trait]
impl<T> RecordStore<T> for JsonFileStore
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn append(&self, record: T) -> Result<StoredRecord<T>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load::<T>().await?;
        let stored = StoredRecord::new(record);
        records.push(stored.clone());
        self.persist(&records).await?;
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord<T>>, StoreError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn remove(&self, id: Uuid) -> Result<StoredRecord<T>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load::<T>().await?;
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = records.remove(index);
        self.persist(&records).await?;
        Ok(removed)
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let count = self.load::<T>().await?.len();
        self.persist::<T>(&[]).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubmittedRecipe;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn submission(name: &str) -> SubmittedRecipe {
        SubmittedRecipe {
            name: name.to_string(),
            ingredients: "flour, water, salt".to_string(),
            instructions: "Knead, rest, and bake until golden.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::in_dir(dir.path(), "submitted-recipes.json");
        let all: Vec<StoredRecord<SubmittedRecipe>> = store.list_all().await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_append_persists_pretty_json() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::in_dir(&dir.path().join("nested"), "submitted-recipes.json");

        store.append(submission("Bread")).await.unwrap();
        store.append(submission("Focaccia")).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n  {"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["name"], "Focaccia");

        // A fresh handle sees the same data.
        let reopened = JsonFileStore::new(store.path());
        let all: Vec<StoredRecord<SubmittedRecipe>> = reopened.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].record.name, "Bread");
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::in_dir(dir.path(), "saved.json");

        let bread = store.append(submission("Bread")).await.unwrap();
        store.append(submission("Focaccia")).await.unwrap();

        let removed: StoredRecord<SubmittedRecipe> = store.remove(bread.id).await.unwrap();
        assert_eq!(removed.record.name, "Bread");

        let missing: Result<StoredRecord<SubmittedRecipe>, _> = store.remove(bread.id).await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));

        let cleared = RecordStore::<SubmittedRecipe>::clear(&store).await.unwrap();
        assert_eq!(cleared, 1);
        let all: Vec<StoredRecord<SubmittedRecipe>> = store.list_all().await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("submitted-recipes.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        let result: Result<Vec<StoredRecord<SubmittedRecipe>>, _> = store.list_all().await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::in_dir(dir.path(), "submitted-recipes.json"));

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.append(submission(&format!("Loaf {i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let all: Vec<StoredRecord<SubmittedRecipe>> = store.list_all().await.unwrap();
        assert_eq!(all.len(), 10);
    }
}
