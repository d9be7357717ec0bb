pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::generation::handlers as generation;
use crate::state::AppState;

/// Non-POST requests to the API routes get axum's 405.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/generate", post(generation::handle_generate))
        .route("/api/upload", post(extraction::handle_upload))
        .route("/api/parse", post(extraction::handle_parse))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
