//! Text extraction from uploaded PDFs.
//!
//! A thin wrapper over `pdf-extract`. The library decides what counts as a
//! valid PDF; the text it returns is passed through untouched.

pub mod handlers;

use std::path::Path;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0}")]
    Parse(#[from] pdf_extract::OutputError),

    #[error("failed to read uploaded file: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parser aborted on malformed input")]
    Panicked,
}

/// Extracts text from in-memory PDF bytes.
///
/// Parsing runs on the blocking pool. A panic inside the parser (it has a few
/// on hostile input) is reported as `ExtractError::Panicked`.
pub async fn extract_text(bytes: Vec<u8>) -> Result<String, ExtractError> {
    extract_with(bytes, pdf_extract::extract_text_from_mem).await
}

pub(crate) async fn extract_with<F>(bytes: Vec<u8>, parse: F) -> Result<String, ExtractError>
where
    F: FnOnce(&[u8]) -> Result<String, pdf_extract::OutputError> + Send + 'static,
{
    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || parse(&bytes))
        .await
        .map_err(|_| ExtractError::Panicked)??;

    debug!("Extracted {} chars from {} byte PDF", text.len(), size);
    Ok(text)
}

/// Reads a PDF from disk and extracts its text.
pub async fn extract_text_from_path(path: &Path) -> Result<String, ExtractError> {
    let bytes = tokio::fs::read(path).await?;
    extract_text(bytes).await
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_extracts_text_from_pdf() {
        let pdf = fixtures::pdf_with_text("Jane Doe Engineer");
        let text = extract_text(pdf).await.unwrap();
        assert!(text.contains("Jane Doe Engineer"), "got {text:?}");
    }

    #[tokio::test]
    async fn test_extraction_is_deterministic() {
        let pdf = fixtures::pdf_with_text("Built things at Acme");
        let first = extract_text(pdf.clone()).await.unwrap();
        let second = extract_text(pdf).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_non_pdf_bytes_fail() {
        let result = extract_text(b"this is just a text file, not a PDF".to_vec()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_input_fails() {
        assert!(extract_text(Vec::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_parser_panic_is_reported() {
        let result = extract_with(b"%PDF-1.4".to_vec(), |_: &[u8]| panic!("parser bug")).await;
        assert!(matches!(result, Err(ExtractError::Panicked)));
    }

    #[tokio::test]
    async fn test_extract_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&fixtures::pdf_with_text("From disk")).unwrap();

        let text = extract_text_from_path(file.path()).await.unwrap();
        assert!(text.contains("From disk"));
    }

    #[tokio::test]
    async fn test_missing_path_is_io_error() {
        let result = extract_text_from_path(Path::new("/nonexistent/upload.pdf")).await;
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }
}
