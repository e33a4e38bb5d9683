use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Collection, CollectionPage, FilmSummary, HomeFeed},
    routes::{AppState, PageQuery},
};

/// Handler for the home feed
pub async fn home(State(state): State<Arc<AppState>>) -> Json<HomeFeed> {
    Json(state.browse.home().await)
}

/// Handler for one page of a curated collection
pub async fn collection(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<CollectionPage>> {
    let collection: Collection = collection.parse().map_err(AppError::InvalidInput)?;
    let page = state.browse.collection(collection, params.page()).await?;
    Ok(Json(page))
}

/// Handler for this month's premieres
pub async fn premieres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<FilmSummary>>> {
    Ok(Json(state.browse.premieres().await?))
}
