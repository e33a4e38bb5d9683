use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::AppResult, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct PosterQuery {
    url: String,
}

/// Handler serving a poster image through the in-memory cache
pub async fn get_poster(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PosterQuery>,
) -> AppResult<impl IntoResponse> {
    let poster = state.posters.get(&params.url).await?;
    Ok(([(header::CONTENT_TYPE, poster.content_type)], poster.bytes))
}
