use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// The CLI surfaces the same values through `anyhow` and exits non-zero.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No LLM API key configured. Set ANTHROPIC_API_KEY or store a key first.")]
    CredentialMissing,

    #[error("Generation failed for {section}: {cause}")]
    GenerationFailed { section: String, cause: String },

    #[error("Generation timed out for {section}")]
    GenerationTimeout { section: String },

    #[error("LLM output for {section} could not be parsed into the expected structure")]
    MalformedOutput { section: String },

    #[error("Resume has no name in personal_info; nothing to export")]
    EmptyResume,

    #[error("Export error: {0}")]
    Export(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, shared by HTTP bodies and CLI diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::CredentialMissing => "CREDENTIAL_MISSING",
            AppError::GenerationFailed { .. } => "GENERATION_FAILED",
            AppError::GenerationTimeout { .. } => "GENERATION_TIMEOUT",
            AppError::MalformedOutput { .. } => "MALFORMED_OUTPUT",
            AppError::EmptyResume => "EMPTY_RESUME",
            AppError::Export(_) => "EXPORT_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::CredentialMissing => StatusCode::BAD_REQUEST,
            AppError::GenerationFailed { .. } | AppError::MalformedOutput { .. } => {
                StatusCode::BAD_GATEWAY
            }
            AppError::GenerationTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::EmptyResume => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Export(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match &self {
            AppError::GenerationFailed { section, cause } => {
                tracing::error!("LLM call for {section} failed: {cause}");
                self.to_string()
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                "A storage error occurred".to_string()
            }
            AppError::Export(msg) => {
                tracing::error!("Export error: {msg}");
                self.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
