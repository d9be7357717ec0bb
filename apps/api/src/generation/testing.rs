//! Stub collaborators for driving the pipeline without a network or browser.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextGenerator};
use crate::render::{PdfRenderer, RenderError};

pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n%stub\n%%EOF\n";

/// Replies with a fixed text, or fails with an upstream error when `reply` is `None`.
pub struct StubGenerator {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(LlmError::Upstream {
                status: 503,
                body: "model overloaded".to_string(),
            }),
        }
    }
}

/// Records every HTML document it is asked to render.
#[derive(Default)]
pub struct RecordingRenderer {
    fail: bool,
    rendered: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            rendered: Mutex::default(),
        }
    }

    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfRenderer for RecordingRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        self.rendered.lock().unwrap().push(html.to_string());
        if self.fail {
            Err(RenderError::InvalidOutput)
        } else {
            Ok(FAKE_PDF.to_vec())
        }
    }
}
