//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Browser form
        .route("/", get(handlers::form_page))
        .route(
            "/lookup",
            post(handlers::submit_form).get(handlers::lookup_redirect),
        )
        // JSON API
        .route("/api/v1/lookup", post(handlers::lookup_json))
        .with_state(state)
}
