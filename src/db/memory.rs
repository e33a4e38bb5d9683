use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{
    db::store::{KeyValueStore, StoreKey},
    error::AppResult,
};

/// In-process store, used by tests and when running without Redis
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &StoreKey) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &StoreKey, value: String) -> AppResult<()> {
        self.entries.write().await.insert(*key, value);
        Ok(())
    }

    async fn delete(&self, key: &StoreKey) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
