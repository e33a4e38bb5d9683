use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{FilmDetail, FilmId, ListMembership},
    routes::AppState,
};

/// Handler for a single film's details
pub async fn get_film(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<FilmDetail>> {
    let film = state.catalog.fetch_film(FilmId(id)).await?;
    Ok(Json(film))
}

/// Handler reporting which personal lists contain a film
pub async fn membership(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<ListMembership>> {
    let membership = state.lists.membership(FilmId(id)).await?;
    Ok(Json(membership))
}
