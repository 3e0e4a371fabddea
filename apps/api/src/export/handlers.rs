//! Axum route handler for resume export.

use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::{export, file_name, ExportFormat, ExportOptions};
use crate::profiles::models::TailoredResume;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub resume: TailoredResume,
    #[serde(flatten)]
    pub options: ExportOptions,
}

/// POST /api/v1/export/:format
///
/// Returns the rendered file as an attachment. Rendering runs on the blocking pool.
pub async fn handle_export(
    Path(format): Path<String>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format.parse()?;
    let filename = file_name(&request.resume, format);

    let bytes = tokio::task::spawn_blocking(move || {
        export(&request.resume, format, &request.options)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Export task failed: {e}")))??;

    info!("Exported {filename} ({} bytes)", bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
