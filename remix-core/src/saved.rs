//! A personal collection of recipes the user chose to keep.

use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{RecordStore, StoredRecord};
use crate::types::Recipe;

/// Saved recipes, unique by name.
pub struct SavedRecipes {
    store: Arc<dyn RecordStore<Recipe>>,
    // Held across the duplicate check and the append.
    write_lock: Mutex<()>,
}

impl SavedRecipes {
    pub fn new(store: Arc<dyn RecordStore<Recipe>>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Save a recipe. Fails with [`StoreError::Duplicate`] if one with the
    /// same name is already saved.
    pub async fn save(&self, recipe: Recipe) -> Result<StoredRecord<Recipe>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let existing = self.store.list_all().await?;
        if existing.iter().any(|r| r.record.name == recipe.name) {
            return Err(StoreError::Duplicate(recipe.name));
        }

        let stored = self.store.append(recipe).await?;
        tracing::info!(recipe = %stored.record.name, id = %stored.id, "Recipe saved");
        Ok(stored)
    }

    pub async fn list(&self) -> Result<Vec<StoredRecord<Recipe>>, StoreError> {
        self.store.list_all().await
    }

    pub async fn remove(&self, id: Uuid) -> Result<StoredRecord<Recipe>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let removed = self.store.remove(id).await?;
        tracing::info!(recipe = %removed.record.name, id = %id, "Saved recipe removed");
        Ok(removed)
    }

    /// Remove every saved recipe, returning how many there were.
    pub async fn clear(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let count = self.store.clear().await?;
        tracing::info!(count, "Saved recipes cleared");
        Ok(count)
    }
}
