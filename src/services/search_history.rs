use chrono::Utc;

use crate::{
    db::{keys, TypedStore},
    error::AppResult,
    models::{FilmId, LastSearch},
};

/// Persisted state of the most recent keyword search
#[derive(Clone)]
pub struct SearchHistory {
    store: TypedStore,
}

impl SearchHistory {
    pub fn new(store: TypedStore) -> Self {
        Self { store }
    }

    /// Records the search; empty queries and empty result sets are ignored
    pub async fn save(&self, query: &str, film_ids: &[FilmId]) -> AppResult<bool> {
        if query.is_empty() || film_ids.is_empty() {
            return Ok(false);
        }

        self.store
            .save(&keys::LAST_SEARCH_QUERY, &query.to_string())
            .await?;
        self.store
            .save(&keys::LAST_SEARCH_RESULTS, &film_ids.to_vec())
            .await?;
        self.store
            .save(&keys::LAST_SEARCH_SAVED_AT, &Utc::now())
            .await?;

        tracing::debug!(query = %query, results = film_ids.len(), "Last search saved");
        Ok(true)
    }

    pub async fn last(&self) -> AppResult<Option<LastSearch>> {
        let Some(query) = self.store.load(&keys::LAST_SEARCH_QUERY).await? else {
            return Ok(None);
        };

        let film_ids = self
            .store
            .load(&keys::LAST_SEARCH_RESULTS)
            .await?
            .unwrap_or_default();
        let saved_at = self.store.load(&keys::LAST_SEARCH_SAVED_AT).await?;

        Ok(Some(LastSearch {
            query,
            film_ids,
            saved_at,
        }))
    }

    pub async fn clear(&self) -> AppResult<()> {
        self.store.remove(&keys::LAST_SEARCH_QUERY).await?;
        self.store.remove(&keys::LAST_SEARCH_RESULTS).await?;
        self.store.remove(&keys::LAST_SEARCH_SAVED_AT).await?;
        Ok(())
    }
}
