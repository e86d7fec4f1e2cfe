//! Route definitions

use axum::Router;
use axum::routing::{get, post};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/journeys", post(handlers::journeys::plan_journeys))
        .route("/api/health", get(handlers::health::health_check))
        .with_state(state)
}
