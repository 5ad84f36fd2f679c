pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};

use crate::receipts::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Leave headroom above the upload cap for multipart framing; the handler
    // enforces the exact per-file limit.
    let body_limit = state.config.max_upload_bytes + 64 * 1024;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/receipts",
            post(handlers::handle_upload).get(handlers::handle_list),
        )
        .route(
            "/api/v1/receipts/from-url",
            post(handlers::handle_ingest_from_url),
        )
        .route("/api/v1/receipts/stats", get(handlers::handle_stats))
        .route(
            "/api/v1/receipts/:id",
            get(handlers::handle_get).delete(handlers::handle_delete),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
