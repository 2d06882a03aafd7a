//! # NameLink API Server
//!
//! HTTP surface for the NameLink lookup service: a minimal browser form
//! and a JSON API over the same pipeline.
//!
//! ## Endpoints
//!
//! - `GET /` - Lookup form
//! - `POST /lookup` - Form submission, renders the result page
//! - `GET /lookup` - Redirects back to the form
//! - `POST /api/v1/lookup` - JSON lookup
//! - `GET /health` - Liveness, version, record count
//!
//! ## Example
//!
//! ```rust,ignore
//! use namelink_api::{ApiServer, AppState};
//!
//! let state = Arc::new(AppState::new(limiter, store, provider));
//! ApiServer::new(state).run(addr).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod pages;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for NameLink.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server over already-constructed application state.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Creates the router with all routes and middleware configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    ///
    /// Serves with connect info so handlers can rate-limit by the caller's
    /// socket address when no forwarding header is present.
    pub async fn run(self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("NameLink API server listening on {}", addr);

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}
