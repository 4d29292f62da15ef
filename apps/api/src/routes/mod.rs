pub mod health;
pub mod parse;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Maximum accepted upload size: 8 MiB.
pub const MAX_FILE_SIZE: usize = 8 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::health_handler))
        .route("/parse-cv", post(parse::handle_parse_local))
        .route("/parse-cv-external", post(parse::handle_parse_external))
        .route("/parse-cv-ollama", post(parse::handle_parse_ollama))
        .route("/test-nanonets", post(parse::handle_test_nanonets))
        .route("/test-docparserai", post(parse::handle_test_docparserai))
        // Slack for multipart framing on top of the file size limit.
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 64 * 1024))
        .with_state(state)
}
