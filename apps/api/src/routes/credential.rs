use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::credentials::CredentialStatus;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetCredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct SetCredentialResponse {
    pub message: String,
    #[serde(flatten)]
    pub status: CredentialStatus,
}

/// GET /api/v1/credential
/// Never returns the key itself, only whether one is set and its masked form.
pub async fn handle_get_credential(State(state): State<AppState>) -> Json<CredentialStatus> {
    Json(state.credentials.status().await)
}

/// PUT /api/v1/credential
pub async fn handle_set_credential(
    State(state): State<AppState>,
    Json(request): Json<SetCredentialRequest>,
) -> Result<Json<SetCredentialResponse>, AppError> {
    state.credentials.set(&request.api_key).await?;
    Ok(Json(SetCredentialResponse {
        message: "API key saved".to_string(),
        status: state.credentials.status().await,
    }))
}
