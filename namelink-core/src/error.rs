//! Error types for NameLink.
//!
//! This module provides the error hierarchy for the lookup pipeline using
//! `thiserror`. Outward-facing text is centralized in
//! [`user_message`](CoreError::user_message) so internal detail never leaks
//! into an HTTP response or a rendered page.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Main error type for all NameLink operations.
#[derive(Debug, Error)]
pub enum CoreError {
    // ═══════════════════════════════════════════════════════════════════════════
    // NUMBER VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input contained no digits at all.
    #[error("no digits found in phone number")]
    EmptyNumber,

    /// Digit count after normalization is not the canonical length.
    #[error("invalid phone number length: {digits} digits (expected 10)")]
    InvalidLength {
        /// Digits observed after stripping and country-code handling
        digits: usize,
    },

    /// Canonical mobile numbers must start with 6, 7, 8 or 9.
    #[error("invalid mobile number format: starts with '{digit}'")]
    InvalidPrefix {
        /// The offending leading digit
        digit: char,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // RATE LIMITING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Caller exhausted its request budget.
    #[error("rate limit exceeded")]
    RateLimited,

    // ═══════════════════════════════════════════════════════════════════════════
    // STORE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The durable record store failed.
    #[error("store error: {0}")]
    StoreError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // UPSTREAM PROVIDER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// One attempt failed at the transport level. Retried internally;
    /// callers only ever see the exhausted form below.
    #[error("provider request failed: {0}")]
    ProviderRequest(String),

    /// Every attempt failed at the transport level.
    #[error("provider unavailable after {attempts} attempts")]
    ProviderUnavailable {
        /// Attempts made before giving up
        attempts: u32,
    },

    /// The provider answered with a body that could not be parsed.
    #[error("provider returned an unreadable response: {0}")]
    ProviderBadResponse(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Missing or malformed configuration at startup.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CoreError {
    /// Returns true if the input number itself was rejected.
    pub fn is_invalid_number(&self) -> bool {
        matches!(
            self,
            CoreError::EmptyNumber
                | CoreError::InvalidLength { .. }
                | CoreError::InvalidPrefix { .. }
        )
    }

    /// Returns true if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::ProviderRequest(_))
    }

    /// Text safe to show the caller. Validation errors carry their reason;
    /// everything else collapses to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::EmptyNumber => "Mobile number is required".into(),
            CoreError::InvalidLength { .. } | CoreError::InvalidPrefix { .. } => {
                format!("Invalid mobile number: {self}")
            }
            CoreError::RateLimited => "Rate limit exceeded".into(),
            CoreError::StoreError(_) => "Database error occurred".into(),
            CoreError::ProviderRequest(_)
            | CoreError::ProviderUnavailable { .. }
            | CoreError::ProviderBadResponse(_) => {
                "Service temporarily unavailable. Please try again.".into()
            }
            CoreError::ConfigError(_) => "Service misconfigured".into(),
        }
    }
}
