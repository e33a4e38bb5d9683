use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{FilmDetail, FilmId, ListKind},
    routes::AppState,
};

fn parse_list(slug: &str) -> AppResult<ListKind> {
    slug.parse().map_err(AppError::InvalidInput)
}

/// Handler returning the ids on a list, oldest first
pub async fn get_list(
    State(state): State<Arc<AppState>>,
    Path(list): Path<String>,
) -> AppResult<Json<Vec<FilmId>>> {
    let list = parse_list(&list)?;
    Ok(Json(state.lists.get(list).await?))
}

/// Handler returning full details for every film on a list
///
/// Films whose lookup fails are left out; compare with `GET /lists/:list`
/// to detect gaps.
pub async fn get_list_films(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(list): Path<String>,
) -> AppResult<Json<Vec<FilmDetail>>> {
    let list = parse_list(&list)?;
    let ids = state.lists.get(list).await?;

    let films = state.detail_fetcher.fetch_all(&ids).await;

    tracing::info!(
        request_id = %request_id,
        list = list.slug(),
        requested = ids.len(),
        returned = films.len(),
        "List films loaded"
    );

    Ok(Json(films))
}

/// Handler adding a film to a list
///
/// Responds 201 when added and 200 when it was already there, with the
/// resulting list in both cases.
pub async fn add_to_list(
    State(state): State<Arc<AppState>>,
    Path((list, id)): Path<(String, u64)>,
) -> AppResult<(StatusCode, Json<Vec<FilmId>>)> {
    let list = parse_list(&list)?;
    let added = state.lists.add(list, FilmId(id)).await?;
    let ids = state.lists.get(list).await?;

    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ids)))
}

/// Handler removing a film from a list
pub async fn remove_from_list(
    State(state): State<Arc<AppState>>,
    Path((list, id)): Path<(String, u64)>,
) -> AppResult<StatusCode> {
    let list = parse_list(&list)?;

    if state.lists.remove(list, FilmId(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Film {} is not on list '{}'",
            id,
            list.slug()
        )))
    }
}
