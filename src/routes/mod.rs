use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

pub mod browse;
pub mod films;
pub mod lists;
pub mod posters;
pub mod profile;
pub mod search;
pub mod state;

pub use state::AppState;

/// Optional `?page=` query parameter, 1-based
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            // Outermost first: the trace span needs the request id
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Browse
        .route("/home", get(browse::home))
        .route("/collections/:collection", get(browse::collection))
        .route("/premieres", get(browse::premieres))
        // Films
        .route("/films/:id", get(films::get_film))
        .route("/films/:id/membership", get(films::membership))
        // Search
        .route("/search", get(search::search))
        .route(
            "/search/last",
            get(search::last_search).delete(search::clear_last_search),
        )
        .route("/search/last/films", get(search::last_search_films))
        // Personal lists
        .route("/lists/:list", get(lists::get_list))
        .route("/lists/:list/films", get(lists::get_list_films))
        .route(
            "/lists/:list/:id",
            put(lists::add_to_list).delete(lists::remove_from_list),
        )
        // Profile
        .route("/profile", get(profile::get_profile).put(profile::put_profile))
        .route("/profile/changes", post(profile::profile_changes))
        // Images
        .route("/posters", get(posters::get_poster))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
