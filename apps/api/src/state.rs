use std::sync::Arc;

use crate::config::Config;
use crate::generation::fallback::FallbackTemplate;
use crate::llm_client::TextGenerator;
use crate::render::PdfRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; every request builds its own pipeline from these.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured: generation always uses the fallback template.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub renderer: Arc<dyn PdfRenderer>,
    pub fallback: Arc<FallbackTemplate>,
    pub config: Config,
}
