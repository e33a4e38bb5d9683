use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{FilmId, KeywordSearchPage},
    services::{catalog::CatalogClient, search_history::SearchHistory},
};

/// Keyword search that remembers the last successful query
#[derive(Clone)]
pub struct SearchService {
    catalog: Arc<dyn CatalogClient>,
    history: SearchHistory,
}

impl SearchService {
    pub fn new(catalog: Arc<dyn CatalogClient>, history: SearchHistory) -> Self {
        Self { catalog, history }
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub async fn search(&self, query: &str, page: u32) -> AppResult<KeywordSearchPage> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        if page == 0 {
            return Err(AppError::InvalidInput("Pages start at 1".to_string()));
        }

        let results = self.catalog.search_by_keyword(query, page).await?;

        let film_ids: Vec<FilmId> = results.films.iter().map(|film| film.id).collect();
        if let Err(e) = self.history.save(query, &film_ids).await {
            // The results are still good; only the history is lost
            tracing::warn!(error = %e, query = %query, "Failed to save last search");
        }

        Ok(results)
    }
}
