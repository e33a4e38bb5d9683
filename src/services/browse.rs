use std::sync::Arc;

use chrono::{Datelike, Month, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{Collection, CollectionPage, FilmSummary, HomeFeed},
    services::catalog::CatalogClient,
};

/// Curated catalog listings for the home and discovery screens
#[derive(Clone)]
pub struct BrowseService {
    catalog: Arc<dyn CatalogClient>,
}

impl BrowseService {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Top movies and top shows, fetched together
    ///
    /// A failing collection comes back empty instead of failing the feed.
    pub async fn home(&self) -> HomeFeed {
        let (movies, shows) = tokio::join!(
            self.catalog.fetch_collection(Collection::TopMovies, 1),
            self.catalog.fetch_collection(Collection::TopShows, 1),
        );

        HomeFeed {
            movies: items_or_empty(Collection::TopMovies, movies),
            shows: items_or_empty(Collection::TopShows, shows),
        }
    }

    pub async fn collection(&self, collection: Collection, page: u32) -> AppResult<CollectionPage> {
        if page == 0 {
            return Err(AppError::InvalidInput("Pages start at 1".to_string()));
        }
        self.catalog.fetch_collection(collection, page).await
    }

    /// Premieres for the current month
    pub async fn premieres(&self) -> AppResult<Vec<FilmSummary>> {
        let today = Utc::now().date_naive();
        let month = u8::try_from(today.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(|| AppError::Internal(format!("Invalid month {}", today.month())))?;

        self.catalog.fetch_premieres(today.year(), month).await
    }
}

fn items_or_empty(collection: Collection, result: AppResult<CollectionPage>) -> Vec<FilmSummary> {
    match result {
        Ok(page) => page.items,
        Err(e) => {
            tracing::error!(
                collection = collection.catalog_type(),
                error = %e,
                "Collection fetch failed"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilmId, MediaType};
    use crate::services::catalog::MockCatalogClient;
    use mockall::predicate::eq;

    fn page(ids: &[u64]) -> CollectionPage {
        CollectionPage {
            total: ids.len() as u32,
            total_pages: 1,
            items: ids
                .iter()
                .map(|id| FilmSummary {
                    id: FilmId(*id),
                    name: format!("Film {}", id),
                    year: None,
                    duration_minutes: None,
                    poster_url: None,
                    poster_preview_url: None,
                    genres: vec![],
                    media_type: MediaType::Film,
                    rating: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_home_fetches_both_collections() {
        let mut mock = MockCatalogClient::new();
        mock.expect_fetch_collection()
            .with(eq(Collection::TopMovies), eq(1))
            .returning(|_, _| Ok(page(&[1, 2])));
        mock.expect_fetch_collection()
            .with(eq(Collection::TopShows), eq(1))
            .returning(|_, _| Ok(page(&[3])));

        let feed = BrowseService::new(Arc::new(mock)).home().await;

        assert_eq!(feed.movies.len(), 2);
        assert_eq!(feed.shows[0].id, FilmId(3));
    }

    #[tokio::test]
    async fn test_home_tolerates_one_failure() {
        let mut mock = MockCatalogClient::new();
        mock.expect_fetch_collection()
            .with(eq(Collection::TopMovies), eq(1))
            .returning(|_, _| Err(AppError::ExternalApi("status 500".to_string())));
        mock.expect_fetch_collection()
            .with(eq(Collection::TopShows), eq(1))
            .returning(|_, _| Ok(page(&[3, 4])));

        let feed = BrowseService::new(Arc::new(mock)).home().await;

        assert!(feed.movies.is_empty());
        assert_eq!(feed.shows.len(), 2);
    }

    #[tokio::test]
    async fn test_collection_page_zero_rejected() {
        let mut mock = MockCatalogClient::new();
        mock.expect_fetch_collection().times(0);

        let result = BrowseService::new(Arc::new(mock))
            .collection(Collection::TopAll, 0)
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_premieres_use_current_month() {
        let now = Utc::now().date_naive();
        let expected_year = now.year();

        let mut mock = MockCatalogClient::new();
        mock.expect_fetch_premieres()
            .withf(move |year, _| *year == expected_year)
            .times(1)
            .returning(|_, _| Ok(page(&[7]).items));

        let premieres = BrowseService::new(Arc::new(mock)).premieres().await.unwrap();
        assert_eq!(premieres[0].id, FilmId(7));
    }
}
