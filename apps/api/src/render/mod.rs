//! Document rendering: HTML in, A4 PDF out, via a headless Chromium.
//!
//! Every call launches its own browser process with a throwaway profile
//! directory and tears it down before returning. No pooling: a render never
//! shares a process with another request.
//!
//! ```text
//!  render(html)
//!     │
//!     ├─ TempDir profile ──► BrowserSession::launch ──► spawn CDP handler task
//!     │
//!     ├─ new_page ─► set_content ─► wait for load + fonts + images ─► print A4
//!     │
//!     └─ BrowserSession::shutdown (always, success or error)
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::error::CdpError;
use futures::StreamExt;
use tempfile::TempDir;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Leading bytes of every PDF file.
pub const PDF_MAGIC: &[u8] = b"%PDF-";

// A4 in inches, the unit Chromium's print API takes.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

/// Resolves once the document, its web fonts and its images have settled.
const WAIT_FOR_IDLE_JS: &str = r#"new Promise((resolve) => {
    const settle = () => document.fonts.ready.then(() => {
        const pending = Array.from(document.images).filter((img) => !img.complete);
        return Promise.all(pending.map((img) => new Promise((done) => {
            img.onload = done;
            img.onerror = done;
        })));
    }).then(() => resolve(true));
    if (document.readyState === "complete") {
        settle();
    } else {
        window.addEventListener("load", settle, { once: true });
    }
})"#;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid browser configuration: {0}")]
    Config(String),

    #[error("failed to create browser profile directory: {0}")]
    Profile(#[from] std::io::Error),

    #[error("failed to launch browser: {0}")]
    Launch(#[source] CdpError),

    #[error("failed to load document: {0}")]
    Navigation(#[source] CdpError),

    #[error("failed to print PDF: {0}")]
    Print(#[source] CdpError),

    #[error("renderer returned output that is not a PDF")]
    InvalidOutput,

    #[error("failed to build fallback document: {0}")]
    Template(#[from] handlebars::RenderError),
}

/// Anything that can turn an HTML document into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Renders through a freshly launched Chromium per call.
#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    chrome_executable: Option<PathBuf>,
}

impl ChromiumRenderer {
    /// `chrome_executable` overrides chromiumoxide's auto-detection.
    pub fn new(chrome_executable: Option<PathBuf>) -> Self {
        Self { chrome_executable }
    }

    fn browser_config(&self, profile_dir: &Path) -> Result<BrowserConfig, RenderError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-gpu")
            .user_data_dir(profile_dir);

        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(RenderError::Config)
    }
}

#[async_trait]
impl PdfRenderer for ChromiumRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let profile = tempfile::Builder::new()
            .prefix("resume-render-")
            .tempdir()?;
        let config = self.browser_config(profile.path())?;

        let session = BrowserSession::launch(config, profile).await?;
        let result = print_html(&session.browser, html).await;
        session.shutdown().await;

        let pdf = result?;
        if !pdf.starts_with(PDF_MAGIC) {
            return Err(RenderError::InvalidOutput);
        }

        info!("Rendered PDF ({} bytes)", pdf.len());
        Ok(pdf)
    }
}

/// Loads `html` into a blank page and prints it.
async fn print_html(browser: &Browser, html: &str) -> Result<Vec<u8>, RenderError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(RenderError::Navigation)?;

    page.set_content(html)
        .await
        .map_err(RenderError::Navigation)?;

    let wait = EvaluateParams::builder()
        .expression(WAIT_FOR_IDLE_JS)
        .await_promise(true)
        .return_by_value(true)
        .build()
        .map_err(RenderError::Config)?;
    page.evaluate(wait).await.map_err(RenderError::Navigation)?;

    let params = PrintToPdfParams {
        print_background: Some(true),
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        ..Default::default()
    };

    page.pdf(params).await.map_err(RenderError::Print)
}

/// Owns one browser process for the duration of a render.
///
/// `shutdown` closes the browser gracefully. If the session is dropped
/// without it (error or cancelled future), chromiumoxide kills the child
/// process on drop and the handler task is aborted here. The profile
/// directory is removed when `_profile` drops.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

impl BrowserSession {
    async fn launch(config: BrowserConfig, profile: TempDir) -> Result<Self, RenderError> {
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(RenderError::Launch)?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler stopped: {e}");
                    break;
                }
            }
        });

        debug!("Browser launched");
        Ok(Self {
            browser,
            handler,
            _profile: profile,
        })
    }

    async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to reap browser process: {e}");
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
