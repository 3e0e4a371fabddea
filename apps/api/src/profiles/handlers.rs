//! Axum route handlers for the Profile API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::profiles::models::Profile;
use crate::profiles::validation::validate_profile;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
}

#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    pub profile_name: String,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub message: String,
    pub profile_name: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteProfileResponse {
    pub message: String,
}

/// GET /api/v1/profiles
pub async fn handle_list_profiles(
    State(state): State<AppState>,
) -> Result<Json<ProfileListResponse>, AppError> {
    let profiles = state.profiles.list().await?;
    Ok(Json(ProfileListResponse { profiles }))
}

/// GET /api/v1/profiles/:name
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.profiles.load(&name).await?;
    Ok(Json(ProfileResponse { profile }))
}

/// POST /api/v1/profiles
///
/// Creates the profile, or overwrites it when the name already exists.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Json(request): Json<SaveProfileRequest>,
) -> Result<Json<SaveProfileResponse>, AppError> {
    validate_profile(&request.profile)?;
    let profile_name = state
        .profiles
        .save(&request.profile_name, &request.profile)
        .await?;

    Ok(Json(SaveProfileResponse {
        message: "Profile saved successfully".to_string(),
        profile_name,
    }))
}

/// DELETE /api/v1/profiles/:name
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DeleteProfileResponse>, AppError> {
    state.profiles.delete(&name).await?;
    Ok(Json(DeleteProfileResponse {
        message: format!("Profile '{name}' deleted successfully"),
    }))
}
