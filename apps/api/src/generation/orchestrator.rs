//! Resume generation pipeline.
//!
//! Flow: build prompt → generate HTML → (fallback template if unusable) →
//!       render PDF → return bytes.
//!
//! Written as an explicit state machine so the one guarantee that matters is
//! easy to audit: a generation failure always leads to `Fallback`, never to
//! `Failed`. Only producing the document or the PDF can fail the pipeline.
//!
//! ```text
//!  AwaitingGeneration ──ok, usable──────────────► Rendering ──ok──► Done
//!          │                                          ▲  │
//!          └──error / too short / unconfigured─► Fallback └─err──► Failed
//! ```

use tracing::{info, warn};

use crate::generation::fallback::FallbackTemplate;
use crate::generation::prompts::build_resume_prompt;
use crate::llm_client::{strip_code_fences, TextGenerator, NO_OUTPUT_SENTINEL};
use crate::models::resume::GenerationRequest;
use crate::render::{PdfRenderer, RenderError};

/// Generated HTML shorter than this (in chars, after trimming) is treated as
/// a failed generation.
pub const MIN_GENERATED_HTML_CHARS: usize = 20;

/// Where the rendered HTML came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlSource {
    Generated,
    Fallback,
}

/// HTML on its way to the renderer.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub html: String,
    pub source: HtmlSource,
}

/// The finished PDF.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub bytes: Vec<u8>,
    pub source: HtmlSource,
}

#[derive(Debug)]
enum PipelineState {
    AwaitingGeneration,
    Fallback { reason: String },
    Rendering(RenderedDocument),
    Done(PdfArtifact),
    Failed(RenderError),
}

/// Request-scoped composition of the generator and renderer.
///
/// `generator` is `None` when no API key is configured; every request then
/// goes straight to the fallback template.
pub struct ResumeOrchestrator<'a> {
    generator: Option<&'a dyn TextGenerator>,
    renderer: &'a dyn PdfRenderer,
    fallback: &'a FallbackTemplate,
}

impl<'a> ResumeOrchestrator<'a> {
    pub fn new(
        generator: Option<&'a dyn TextGenerator>,
        renderer: &'a dyn PdfRenderer,
        fallback: &'a FallbackTemplate,
    ) -> Self {
        Self {
            generator,
            renderer,
            fallback,
        }
    }

    /// Runs the pipeline to completion. Errors come from rendering only.
    pub async fn generate_resume(
        &self,
        request: &GenerationRequest,
    ) -> Result<PdfArtifact, RenderError> {
        let mut state = PipelineState::AwaitingGeneration;

        loop {
            state = match state {
                PipelineState::AwaitingGeneration => self.await_generation(request).await,
                PipelineState::Fallback { reason } => {
                    warn!("Falling back to template resume: {reason}");
                    match self.fallback.render(request) {
                        Ok(html) => PipelineState::Rendering(RenderedDocument {
                            html,
                            source: HtmlSource::Fallback,
                        }),
                        Err(e) => PipelineState::Failed(e.into()),
                    }
                }
                PipelineState::Rendering(document) => {
                    match self.renderer.render(&document.html).await {
                        Ok(bytes) => PipelineState::Done(PdfArtifact {
                            bytes,
                            source: document.source,
                        }),
                        Err(e) => PipelineState::Failed(e),
                    }
                }
                PipelineState::Done(artifact) => {
                    info!(
                        "Resume rendered from {:?} HTML ({} bytes)",
                        artifact.source,
                        artifact.bytes.len()
                    );
                    return Ok(artifact);
                }
                PipelineState::Failed(e) => return Err(e),
            };
        }
    }

    async fn await_generation(&self, request: &GenerationRequest) -> PipelineState {
        let Some(generator) = self.generator else {
            return PipelineState::Fallback {
                reason: "generative client is not configured".to_string(),
            };
        };

        let prompt = build_resume_prompt(request);
        match generator.generate(&prompt).await {
            Ok(text) => match usable_html(&text) {
                Some(html) => PipelineState::Rendering(RenderedDocument {
                    html: html.to_string(),
                    source: HtmlSource::Generated,
                }),
                None => PipelineState::Fallback {
                    reason: format!(
                        "generated output unusable ({} chars)",
                        text.trim().chars().count()
                    ),
                },
            },
            Err(e) => PipelineState::Fallback {
                reason: e.to_string(),
            },
        }
    }
}

/// Returns the HTML to render, or `None` if the output is empty, too short,
/// or the "no output" sentinel.
fn usable_html(text: &str) -> Option<&str> {
    let html = strip_code_fences(text);
    if html == NO_OUTPUT_SENTINEL || html.chars().count() < MIN_GENERATED_HTML_CHARS {
        return None;
    }
    Some(html)
}
