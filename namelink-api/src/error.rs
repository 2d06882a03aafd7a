//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use namelink_core::error::CoreError;
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// The HTTP status a pipeline error maps to.
    pub fn status_for(err: &CoreError) -> StatusCode {
        match err {
            CoreError::EmptyNumber
            | CoreError::InvalidLength { .. }
            | CoreError::InvalidPrefix { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            CoreError::ProviderRequest(_)
            | CoreError::ProviderUnavailable { .. }
            | CoreError::ProviderBadResponse(_) => StatusCode::SERVICE_UNAVAILABLE,
            CoreError::StoreError(_) | CoreError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let status = Self::status_for(&err);
        let code = match &err {
            CoreError::EmptyNumber
            | CoreError::InvalidLength { .. }
            | CoreError::InvalidPrefix { .. } => "VALIDATION_ERROR",
            CoreError::RateLimited => "RATE_LIMITED",
            CoreError::StoreError(_) => "DATABASE_ERROR",
            CoreError::ProviderRequest(_)
            | CoreError::ProviderUnavailable { .. }
            | CoreError::ProviderBadResponse(_) => "UPSTREAM_UNAVAILABLE",
            CoreError::ConfigError(_) => "CONFIG_ERROR",
        };

        // Full detail stays in the log; the body carries the sanitized text
        if status.is_server_error() || status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!(error = %err, "Lookup failed");
        }

        ApiError::new(status, err.user_message(), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::status_for(&CoreError::InvalidLength { digits: 5 }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::status_for(&CoreError::RateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::status_for(&CoreError::StoreError("locked".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::status_for(&CoreError::ProviderUnavailable { attempts: 3 }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::status_for(&CoreError::ProviderBadResponse("html".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_internal_detail_never_reaches_the_body() {
        let api_err: ApiError = CoreError::StoreError("connect refused 10.0.0.3".into()).into();
        assert!(!api_err.message.contains("10.0.0.3"));
        assert_eq!(api_err.code, "DATABASE_ERROR");
    }
}
