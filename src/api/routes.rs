//! API route definitions
//!
//! - POST /api/v1/analyze      - structured project snapshot
//! - POST /api/v1/analyze/text - pasted status text
//! - GET  /api/v1/history      - recent analyses
//! - GET  /health              - liveness (root level)

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, ApiState};

/// Create all versioned API routes.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/analyze/text", post(handlers::analyze_text))
        .route("/history", get(handlers::get_history))
        .with_state(state)
}

/// Root-level health endpoint.
pub fn health_routes() -> Router {
    Router::new().route("/health", get(handlers::get_health))
}
