//! API Routes
//!
//! Configures the Axum router with all document service endpoints.

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::models::{HealthResponse, StatsResponse};

use super::auth::{login_handler, logout_handler, register_handler};
use super::docs::{delete_doc_handler, get_doc_handler, list_docs_handler, upload_handler};
use super::AppState;

/// Uploads above this size are rejected before a handler runs.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - Body limit: uploads capped at 10 MiB
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/api/register", post(register_handler))
        .route("/api/auth", post(login_handler))
        .route("/api/auth/:token", delete(logout_handler))
        .route("/api/docs", post(upload_handler).get(list_docs_handler))
        .route(
            "/api/docs/:id",
            get(get_doc_handler).delete(delete_doc_handler),
        )
        .route("/api/stats", get(stats_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for GET /api/stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse::new(
        stats.hits,
        stats.misses,
        stats.evictions,
        stats.entries,
    ))
}

/// Handler for GET /api/health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
