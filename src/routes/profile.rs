use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::UserProfile,
    routes::AppState,
};

pub async fn get_profile(State(state): State<Arc<AppState>>) -> AppResult<Json<UserProfile>> {
    state
        .profile
        .get()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No saved profile".to_string()))
}

pub async fn put_profile(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<UserProfile>,
) -> AppResult<Json<UserProfile>> {
    state.profile.save(&profile).await?;
    Ok(Json(profile))
}

#[derive(Debug, Serialize)]
pub struct ProfileChanges {
    has_changes: bool,
}

/// Handler comparing a candidate profile with the saved one
pub async fn profile_changes(
    State(state): State<Arc<AppState>>,
    Json(candidate): Json<UserProfile>,
) -> AppResult<Json<ProfileChanges>> {
    let has_changes = state.profile.has_changes(&candidate).await?;
    Ok(Json(ProfileChanges { has_changes }))
}
