mod config;
mod errors;
mod extraction;
mod generation;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::fallback::FallbackTemplate;
use crate::llm_client::{GeminiClient, GeminiConfig, TextGenerator};
use crate::render::ChromiumRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    // A missing key is not fatal: requests are served from the fallback template.
    let generator: Option<Arc<dyn TextGenerator>> =
        match GeminiClient::new(GeminiConfig::from(&config)) {
            Ok(client) => {
                info!("LLM client initialized ({})", client.endpoint());
                Some(Arc::new(client) as Arc<dyn TextGenerator>)
            }
            Err(e) => {
                warn!("LLM client unavailable, all resumes will use the fallback template: {e}");
                None
            }
        };

    let renderer = Arc::new(ChromiumRenderer::new(config.chrome_executable.clone()));
    match &config.chrome_executable {
        Some(path) => info!("PDF renderer using Chromium at {}", path.display()),
        None => info!("PDF renderer using auto-detected Chromium"),
    }

    let fallback = Arc::new(FallbackTemplate::new()?);

    let state = AppState {
        generator,
        renderer,
        fallback,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
