//! API routes.

mod health;
mod results;

use crate::state::AppState;
use axum::routing::get;
use axum::Router;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/results", get(results::results_handler))
        .with_state(state)
}
