//! Brain animation HTTP service library.
//!
//! Routes:
//! - `GET /` single-page upload form
//! - `POST /generate` multipart upload plus render parameters, GIF response
//! - `GET /health`, `GET /ready` liveness and readiness
//! - `GET /metrics` Prometheus exposition
//!
//! The router lives here rather than in the binary so handler tests can
//! drive it with `tower::ServiceExt::oneshot`.

pub mod fetch;
pub mod handlers;
pub mod job;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the service router with all middleware attached.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::page_handler))
        .route("/generate", post(handlers::generate_handler))
        .route("/health", get(handlers::health_handler))
        .route("/ready", get(handlers::ready_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
