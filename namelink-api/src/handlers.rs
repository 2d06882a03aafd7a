//! API route handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{Html, Redirect},
    Form, Json,
};
use tracing::debug;

use namelink_core::types::{LookupOutcome, MobileNumber};

use crate::dto::{HealthResponse, LookupForm, LookupRequest, LookupResponse};
use crate::error::ApiError;
use crate::pages::{self, Feedback};
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// The identifier the rate limiter keys on: the first `X-Forwarded-For`
/// entry when a proxy set one, else the socket address.
fn client_id(headers: &HeaderMap, addr: Option<&SocketAddr>) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    addr.map(|a| a.ip().to_string())
        .unwrap_or_else(|| "unknown".into())
}

/// GET /
pub async fn form_page() -> Html<String> {
    Html(pages::render(None))
}

/// GET /lookup - browsers landing here (refresh after POST, bookmarks)
/// go back to the form.
pub async fn lookup_redirect() -> Redirect {
    Redirect::to("/")
}

/// POST /lookup
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Form(form): Form<LookupForm>,
) -> (StatusCode, Html<String>) {
    let client = client_id(&headers, connect_info.as_ref().map(|c| &c.0));
    debug!(client, "Form lookup");

    match state.service.lookup(&client, &form.mobile).await {
        Ok(LookupOutcome::Found { record, .. }) => (
            StatusCode::OK,
            Html(pages::render(Some(&Feedback::Resolved {
                mobile: record.mobile.to_string(),
                name: record.name,
            }))),
        ),
        Ok(LookupOutcome::NotFound { message }) => (
            StatusCode::OK,
            Html(pages::render(Some(&Feedback::NoMatch {
                message: message.unwrap_or_else(|| "No name found for this number".into()),
            }))),
        ),
        Err(err) => (
            ApiError::status_for(&err),
            Html(pages::render(Some(&Feedback::Problem {
                message: err.user_message(),
            }))),
        ),
    }
}

/// POST /api/v1/lookup
pub async fn lookup_json(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<LookupRequest>,
) -> Result<Json<LookupResponse>> {
    let client = client_id(&headers, connect_info.as_ref().map(|c| &c.0));
    debug!(client, "JSON lookup");

    let outcome = state.service.lookup(&client, &req.mobile).await?;

    // The pipeline already accepted the number, so this parse cannot fail;
    // it recovers the canonical form for the response body.
    let canonical = MobileNumber::parse(&req.mobile)
        .map(|m| m.to_string())
        .unwrap_or_else(|_| req.mobile.clone());

    Ok(Json(LookupResponse::from_outcome(canonical, outcome)))
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let records_count = state.store.count().await.unwrap_or(0);

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        records_count,
    })
}
