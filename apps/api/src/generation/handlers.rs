//! Axum route handlers for the Generation API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::{generate_resume, GenerationRequest, GenerationSettings};
use crate::generation::history::HistoryEntry;
use crate::generation::story::{generate_story, StoryContent, StoryRequest};
use crate::profiles::models::TailoredResume;
use crate::profiles::store::clean_name;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub resume: TailoredResume,
    /// `None` when the resume was generated but could not be recorded.
    pub history_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub profile_name: String,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct DeleteHistoryResponse {
    pub message: String,
}

/// POST /api/v1/resumes/generate
///
/// Loads the named profile, tailors it and records the result in the history log.
/// A history write failure is logged; the generated resume is still returned.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let profile_name = clean_name(&request.profile_name)?;
    let profile = state.profiles.load(&profile_name).await?;
    let api_key = state.credentials.get().await;
    let settings = GenerationSettings::from(&state.config);

    let resume = generate_resume(
        state.llm.as_ref(),
        api_key.as_deref(),
        &settings,
        &profile,
        &request,
    )
    .await?;

    let entry = HistoryEntry::new(
        &profile_name,
        request.job_title.as_deref(),
        request.company.as_deref(),
        &request.job_description,
        resume.clone(),
    );
    let history_id = match state.history.append(entry).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Generated resume for '{profile_name}' but failed to record history: {e}");
            None
        }
    };

    Ok(Json(GenerateResponse { resume, history_id }))
}

/// POST /api/v1/resumes/story
pub async fn handle_generate_story(
    State(state): State<AppState>,
    Json(request): Json<StoryRequest>,
) -> Result<Json<StoryContent>, AppError> {
    let profile = state.profiles.load(&request.profile_name).await?;
    let api_key = state.credentials.get().await;

    let content = generate_story(
        state.llm.as_ref(),
        api_key.as_deref(),
        state.config.llm_timeout,
        &profile,
        &request,
    )
    .await?;
    Ok(Json(content))
}

/// GET /api/v1/history/:profile_name
pub async fn handle_get_history(
    State(state): State<AppState>,
    Path(profile_name): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let profile_name = clean_name(&profile_name)?;
    let entries = state.history.list(&profile_name).await;
    Ok(Json(HistoryResponse {
        profile_name,
        entries,
    }))
}

/// DELETE /api/v1/history/:profile_name/:id
pub async fn handle_delete_history_entry(
    State(state): State<AppState>,
    Path((profile_name, id)): Path<(String, Uuid)>,
) -> Result<Json<DeleteHistoryResponse>, AppError> {
    let profile_name = clean_name(&profile_name)?;
    state.history.remove(&profile_name, id).await?;
    Ok(Json(DeleteHistoryResponse {
        message: format!("History entry {id} deleted"),
    }))
}
