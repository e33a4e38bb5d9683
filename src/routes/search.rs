use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{FilmDetail, KeywordSearchPage, LastSearch},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    page: Option<u32>,
}

/// Handler for keyword search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<KeywordSearchPage>> {
    let results = state
        .search
        .search(&params.q, params.page.unwrap_or(1))
        .await?;
    Ok(Json(results))
}

/// Handler returning the last saved search
pub async fn last_search(State(state): State<Arc<AppState>>) -> AppResult<Json<LastSearch>> {
    state
        .search
        .history()
        .last()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No saved search".to_string()))
}

/// Handler re-loading details for the films of the last saved search
pub async fn last_search_films(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<FilmDetail>>> {
    let ids = state
        .search
        .history()
        .last()
        .await?
        .map(|last| last.film_ids)
        .unwrap_or_default();

    Ok(Json(state.detail_fetcher.fetch_all(&ids).await))
}

/// Handler forgetting the last saved search
pub async fn clear_last_search(State(state): State<Arc<AppState>>) -> AppResult<StatusCode> {
    state.search.history().clear().await?;
    Ok(StatusCode::NO_CONTENT)
}
