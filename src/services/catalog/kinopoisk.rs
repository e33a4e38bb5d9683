//! Kinopoisk Unofficial API client
//!
//! API Flow:
//! 1. Details: /api/v2.2/films/{id}
//! 2. Collections: /api/v2.2/films/collections?type=..&page=..
//! 3. Premieres: /api/v2.2/films/premieres?year=..&month=..
//! 4. Keyword search: /api/v2.1/films/search-by-keyword?keyword=..&page=..
//!
//! Every request is authenticated with a static key in the `X-API-KEY` header.

use chrono::Month;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        ApiCollectionResponse, ApiFilmDetails, ApiKeywordSearchResponse, ApiPremieresResponse,
        Collection, CollectionPage, FilmDetail, FilmId, FilmSummary, KeywordSearchPage,
    },
    services::catalog::CatalogClient,
};

const API_KEY_HEADER: &str = "X-API-KEY";

const FILM_CACHE_TTL: u64 = 86400; // 1 day
const COLLECTION_CACHE_TTL: u64 = 3600; // 1 hour
const PREMIERES_CACHE_TTL: u64 = 21600; // 6 hours
const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct KinopoiskClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl KinopoiskClient {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http_client
            .get(format!("{}{}", self.api_url, path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    /// Sends a request and decodes a successful JSON body
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        decode_body(&body)
    }
}

/// Maps a non-2xx catalog status: 404 is the caller's unknown id, the rest
/// are upstream failures
fn status_error(status: StatusCode, body: &str) -> AppError {
    if status == StatusCode::NOT_FOUND {
        tracing::debug!(body = %body, "Catalog entry not found");
        return AppError::NotFound("Film not found in catalog".to_string());
    }

    tracing::error!(status = %status, body = %body, "Catalog API request failed");
    AppError::ExternalApi(format!("Catalog API returned status {}: {}", status, body))
}

/// Decodes a catalog response body
fn decode_body<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, response = %body, "Failed to deserialize catalog response");
        AppError::ExternalApi(format!("Failed to parse catalog response: {}", e))
    })
}

/// Month name as the premieres endpoint expects it (`JANUARY`)
fn month_param(month: Month) -> String {
    month.name().to_uppercase()
}

#[async_trait::async_trait]
impl CatalogClient for KinopoiskClient {
    async fn fetch_film(&self, id: FilmId) -> AppResult<FilmDetail> {
        cached!(self.cache, CacheKey::Film(id), FILM_CACHE_TTL, async move {
            let request = self.get(&format!("/api/v2.2/films/{}", id));
            let details: ApiFilmDetails = self.send_json(request).await?;
            let film = FilmDetail::from(details);

            tracing::debug!(film_id = %id, name = %film.name, "Film details fetched");

            Ok::<_, AppError>(film)
        })
    }

    async fn fetch_collection(
        &self,
        collection: Collection,
        page: u32,
    ) -> AppResult<CollectionPage> {
        cached!(
            self.cache,
            CacheKey::Collection(collection, page),
            COLLECTION_CACHE_TTL,
            async move {
                let request = self.get("/api/v2.2/films/collections").query(&[
                    ("type", collection.catalog_type().to_string()),
                    ("page", page.to_string()),
                ]);
                let response: ApiCollectionResponse = self.send_json(request).await?;

                let page = CollectionPage {
                    total: response.total,
                    total_pages: response.total_pages,
                    items: response.items.into_iter().map(FilmSummary::from).collect(),
                };

                tracing::info!(
                    collection = collection.catalog_type(),
                    items = page.items.len(),
                    "Collection fetched"
                );

                Ok::<_, AppError>(page)
            }
        )
    }

    async fn fetch_premieres(&self, year: i32, month: Month) -> AppResult<Vec<FilmSummary>> {
        let month = month_param(month);

        cached!(
            self.cache,
            CacheKey::Premieres(year, month.clone()),
            PREMIERES_CACHE_TTL,
            async {
                let request = self
                    .get("/api/v2.2/films/premieres")
                    .query(&[("year", year.to_string()), ("month", month.clone())]);
                let response: ApiPremieresResponse = self.send_json(request).await?;

                Ok::<_, AppError>(
                    response
                        .items
                        .into_iter()
                        .map(FilmSummary::from)
                        .collect::<Vec<_>>(),
                )
            }
        )
    }

    async fn search_by_keyword(&self, keyword: &str, page: u32) -> AppResult<KeywordSearchPage> {
        cached!(
            self.cache,
            CacheKey::KeywordSearch(keyword.to_string(), page),
            SEARCH_CACHE_TTL,
            async move {
                let request = self
                    .get("/api/v2.1/films/search-by-keyword")
                    .query(&[("keyword", keyword.to_string()), ("page", page.to_string())]);
                let response: ApiKeywordSearchResponse = self.send_json(request).await?;

                let results = KeywordSearchPage {
                    keyword: response.keyword,
                    pages_count: response.pages_count,
                    films: response.films.into_iter().map(FilmSummary::from).collect(),
                };

                tracing::info!(
                    keyword = %keyword,
                    results = results.films.len(),
                    provider = "kinopoisk",
                    "Keyword search completed"
                );

                Ok::<_, AppError>(results)
            }
        )
    }

    fn name(&self) -> &'static str {
        "kinopoisk"
    }
}
