//! Axum route handlers for PDF intake.

use anyhow::Context;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart,
    },
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::{extract_text, extract_text_from_path};

/// Multipart field carrying the uploaded PDF.
const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    /// Base64 PDF, optionally as a `data:` URL.
    pub file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractedTextResponse {
    pub text: String,
}

/// POST /api/upload
///
/// Accepts multipart form-data with a `file` field, stages it in a temporary
/// file, extracts its text and removes the file again.
pub async fn handle_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractedTextResponse>, AppError> {
    let mut multipart =
        multipart.map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;

    let data = read_file_field(&mut multipart)
        .await?
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let upload = stage_upload(&data).await?;
    let result = extract_text_from_path(upload.path()).await;
    discard_upload(upload);

    let text = result?;
    info!("Parsed uploaded PDF ({} bytes -> {} chars)", data.len(), text.len());
    Ok(Json(ExtractedTextResponse { text }))
}

/// POST /api/parse
///
/// JSON variant of the upload route: `{ "file": "<base64 PDF>" }`.
pub async fn handle_parse(
    body: Result<Json<ParseRequest>, JsonRejection>,
) -> Result<Json<ExtractedTextResponse>, AppError> {
    let Json(request) = body.map_err(|e| AppError::Validation(format!("Invalid body: {e}")))?;

    let encoded = request
        .file
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let bytes = STANDARD
        .decode(strip_data_url(&encoded))
        .map_err(|e| AppError::Validation(format!("File is not valid base64: {e}")))?;

    let text = extract_text(bytes).await?;
    Ok(Json(ExtractedTextResponse { text }))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Option<Bytes>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(FILE_FIELD) {
            let data = field.bytes().await.map_err(multipart_error)?;
            return Ok(Some(data));
        }
    }
    Ok(None)
}

/// Oversized bodies are a 413; any other malformed multipart input is a 400.
fn multipart_error(e: MultipartError) -> AppError {
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => {
            AppError::PayloadTooLarge("Uploaded file exceeds the size limit".to_string())
        }
        _ => AppError::Validation(format!("Invalid multipart body: {}", e.body_text())),
    }
}

async fn stage_upload(data: &[u8]) -> Result<NamedTempFile, AppError> {
    let file = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".pdf")
        .tempfile()
        .context("Failed to create temporary upload file")?;
    tokio::fs::write(file.path(), data)
        .await
        .context("Failed to write temporary upload file")?;
    Ok(file)
}

/// Best-effort removal; a failure is logged and otherwise ignored.
fn discard_upload(file: NamedTempFile) {
    let path = file.path().to_path_buf();
    if let Err(e) = file.close() {
        warn!("Failed to delete temporary upload {}: {e}", path.display());
    }
}

/// `data:application/pdf;base64,XXXX` -> `XXXX`. Plain base64 passes through.
fn strip_data_url(encoded: &str) -> &str {
    let encoded = encoded.trim();
    if encoded.starts_with("data:") {
        if let Some((_, payload)) = encoded.split_once("base64,") {
            return payload;
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("data:application/pdf;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url("  QUJD\n"), "QUJD");
    }

    #[tokio::test]
    async fn test_stage_and_discard_removes_file() {
        let upload = stage_upload(b"%PDF-1.4 test").await.unwrap();
        let path = upload.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 test");

        discard_upload(upload);
        assert!(!path.exists());
    }
}
