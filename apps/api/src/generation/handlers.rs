//! Axum route handler for the Generation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::orchestrator::ResumeOrchestrator;
use crate::models::resume::GenerateResumeBody;
use crate::state::AppState;

/// POST /api/generate
///
/// Returns the resume as a PDF attachment. Missing `personal` or `jobs`,
/// or a body that is not the expected JSON, is a 400 and nothing downstream
/// is called.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateResumeBody>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) =
        body.map_err(|e| AppError::Validation(format!("Invalid request body: {}", e.body_text())))?;
    let request = body
        .into_request()
        .ok_or_else(|| AppError::Validation("Missing personal or job data".to_string()))?;

    let span = info_span!("generate_resume", request_id = %Uuid::new_v4(), jobs = request.jobs.len());
    let artifact = ResumeOrchestrator::new(
        state.generator.as_deref(),
        state.renderer.as_ref(),
        state.fallback.as_ref(),
    )
    .generate_resume(&request)
    .instrument(span)
    .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=resume.pdf"),
        ],
        artifact.bytes,
    ))
}
