pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analysis/match", post(handlers::handle_match))
        .route(
            "/api/v1/analysis/consistency",
            post(handlers::handle_consistency),
        )
        .route(
            "/api/v1/analysis/consistency/upload",
            post(handlers::handle_consistency_upload),
        )
        .route("/api/v1/analysis/report", post(handlers::handle_report))
        .fallback(not_found)
        .with_state(state)
}
