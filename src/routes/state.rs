use std::sync::Arc;

use crate::{
    db::{KeyValueStore, TypedStore},
    error::AppResult,
    services::{
        BrowseService, CatalogClient, DetailFetcher, LocalListStore, PosterCache, PosterPolicy,
        ProfileService, SearchHistory, SearchService,
    },
};

/// Shared application state
///
/// Built once at startup from an injected catalog client and key-value
/// backend; handlers receive it as `State<Arc<AppState>>`.
pub struct AppState {
    pub catalog: Arc<dyn CatalogClient>,
    pub detail_fetcher: DetailFetcher,
    pub lists: LocalListStore,
    pub search: SearchService,
    pub browse: BrowseService,
    pub profile: ProfileService,
    pub posters: PosterCache,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn KeyValueStore>,
        detail_fetch_concurrency: usize,
        poster_policy: PosterPolicy,
    ) -> AppResult<Self> {
        let store = TypedStore::new(store);

        Ok(Self {
            detail_fetcher: DetailFetcher::new(catalog.clone(), detail_fetch_concurrency),
            lists: LocalListStore::new(store.clone()),
            search: SearchService::new(catalog.clone(), SearchHistory::new(store.clone())),
            browse: BrowseService::new(catalog.clone()),
            profile: ProfileService::new(store),
            posters: PosterCache::new(poster_policy)?,
            catalog,
        })
    }
}
