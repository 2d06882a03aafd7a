//! The upstream HTTP client and its retry policy.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use namelink_core::constants::{
    DEFAULT_UPSTREAM_BASE_URL, LOOKUP_ENDPOINT_PATH, UPSTREAM_ATTEMPT_TIMEOUT,
    UPSTREAM_BACKOFF_STEP, UPSTREAM_MAX_ATTEMPTS, UPSTREAM_OVERALL_TIMEOUT,
};
use namelink_core::error::{CoreError, Result};
use namelink_core::traits::{NameLookup, ProviderReply};
use namelink_core::types::MobileNumber;

/// Upstream client configuration.
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    /// Base URL of the provider, without the endpoint path
    pub base_url: String,
    /// Token sent as `Authorization: Basic <token>`
    pub auth_token: String,
    /// Deadline for one attempt
    pub attempt_timeout: Duration,
    /// Safety-net timeout on the HTTP client itself
    pub overall_timeout: Duration,
    /// Total attempts before giving up
    pub max_attempts: u32,
    /// Attempt N sleeps N times this before the next try
    pub backoff_step: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.into(),
            auth_token: String::new(),
            attempt_timeout: UPSTREAM_ATTEMPT_TIMEOUT,
            overall_timeout: UPSTREAM_OVERALL_TIMEOUT,
            max_attempts: UPSTREAM_MAX_ATTEMPTS,
            backoff_step: UPSTREAM_BACKOFF_STEP,
        }
    }
}

impl UpstreamConfig {
    /// Creates a config for the given provider endpoint and credentials.
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: auth_token.into(),
            ..Default::default()
        }
    }
}

/// Request body of the name-lookup endpoint.
#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    client_ref_num: &'a str,
    mobile: &'a str,
    name: &'a str,
}

/// Response body of the name-lookup endpoint. Absent fields default, so
/// any JSON object the provider sends parses; only malformed bodies fail.
#[derive(Debug, Default, Deserialize)]
struct WireResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: WireResult,
}

#[derive(Debug, Default, Deserialize)]
struct WireResult {
    #[serde(default)]
    mobile_linked_name: String,
}

/// Client for the upstream mobile-name verification API.
pub struct UpstreamClient {
    config: UpstreamConfig,
    endpoint: String,
    http_client: reqwest::Client,
}

impl UpstreamClient {
    /// Creates a client with custom configuration.
    pub fn with_config(config: UpstreamConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.overall_timeout)
            .build()
            .expect("Failed to create HTTP client");

        let endpoint = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            LOOKUP_ENDPOINT_PATH
        );

        Self {
            config,
            endpoint,
            http_client,
        }
    }

    /// One wire attempt. Any transport failure (connect, timeout, or a
    /// dropped body read) comes back as a retryable error.
    async fn attempt(&self, ref_id: &str, mobile: &MobileNumber) -> Result<(u16, String)> {
        let request = WireRequest {
            client_ref_num: ref_id,
            mobile: mobile.as_str(),
            name: "",
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Authorization", format!("Basic {}", self.config.auth_token))
            .json(&request)
            .timeout(self.config.attempt_timeout)
            .send()
            .await
            .map_err(|e| CoreError::ProviderRequest(e.to_string()))?;

        let http_status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::ProviderRequest(e.to_string()))?;

        Ok((http_status, body))
    }

    /// Maps a received body to a reply. The HTTP status is recorded but
    /// never drives control flow; the provider encodes outcomes in the body.
    fn parse_reply(http_status: u16, body: String) -> Result<ProviderReply> {
        let wire: WireResponse = serde_json::from_str(&body)
            .map_err(|e| CoreError::ProviderBadResponse(e.to_string()))?;

        let linked_name = if wire.result.mobile_linked_name.is_empty() {
            None
        } else {
            Some(wire.result.mobile_linked_name)
        };
        let message = if wire.message.is_empty() {
            None
        } else {
            Some(wire.message)
        };

        Ok(ProviderReply {
            linked_name,
            status: wire.status,
            message,
            raw_body: body,
            http_status,
        })
    }
}

#[async_trait]
impl NameLookup for UpstreamClient {
    /// Looks up the name linked to a number, retrying transport failures
    /// up to the configured attempt budget.
    #[instrument(skip(self), fields(mobile = %mobile, ref_id))]
    async fn lookup(&self, ref_id: &str, mobile: &MobileNumber) -> Result<ProviderReply> {
        let mut last_error = CoreError::ProviderRequest("no attempt made".into());

        for attempt in 1..=self.config.max_attempts {
            match self.attempt(ref_id, mobile).await {
                Ok((http_status, body)) => {
                    debug!(attempt, http_status, "Provider answered");
                    return Self::parse_reply(http_status, body);
                }
                Err(err) => {
                    warn!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        error = %err,
                        "Request failed, retrying..."
                    );
                    last_error = err;
                    if attempt < self.config.max_attempts {
                        tokio::time::sleep(self.config.backoff_step * attempt).await;
                    }
                }
            }
        }

        error!(
            attempts = self.config.max_attempts,
            error = %last_error,
            "All retry attempts failed"
        );
        Err(CoreError::ProviderUnavailable {
            attempts: self.config.max_attempts,
        })
    }
}
