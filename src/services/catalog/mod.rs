//! Film catalog abstraction
//!
//! Everything the application knows about films comes from a remote catalog.
//! Handlers and services depend on this trait only, so the production
//! Kinopoisk client can be swapped for a stub in tests.

use chrono::Month;

use crate::{
    error::AppResult,
    models::{Collection, CollectionPage, FilmDetail, FilmId, FilmSummary, KeywordSearchPage},
};

pub mod kinopoisk;

pub use kinopoisk::KinopoiskClient;

/// Remote catalog of films and shows
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the full detail record for one film
    ///
    /// Non-2xx responses and undecodable bodies are both errors. No retries.
    async fn fetch_film(&self, id: FilmId) -> AppResult<FilmDetail>;

    /// Fetch one page of a curated collection
    async fn fetch_collection(&self, collection: Collection, page: u32)
        -> AppResult<CollectionPage>;

    /// Fetch premieres for a calendar month
    async fn fetch_premieres(&self, year: i32, month: Month) -> AppResult<Vec<FilmSummary>>;

    /// Search the catalog by keyword
    async fn search_by_keyword(&self, keyword: &str, page: u32) -> AppResult<KeywordSearchPage>;

    /// Catalog name for logging
    fn name(&self) -> &'static str;
}
