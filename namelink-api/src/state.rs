//! App state and environment configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use namelink_core::constants::{DEFAULT_BIND_ADDR, DEFAULT_PORT, DEFAULT_UPSTREAM_BASE_URL};
use namelink_core::error::{CoreError, Result};
use namelink_core::traits::{ClientGate, NameLookup, RecordStore};
use namelink_service::LookupService;

/// Environment-driven server configuration.
///
/// The auth token and database URL have no sane default; a process that
/// starts without them would serve only errors, so `from_env` refuses to
/// build and the boot fails instead.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Provider base URL, without the endpoint path
    pub upstream_base_url: String,
    /// Provider credential sent as `Authorization: Basic <token>`
    pub upstream_auth_token: String,
    /// Turso/libSQL database URL
    pub database_url: String,
    /// Database auth token; empty for servers accepting anonymous connections
    pub database_auth_token: String,
    /// Inbound port
    pub port: u16,
    /// Inbound bind address
    pub bind_addr: String,
}

impl ApiConfig {
    /// Builds configuration from the environment, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| CoreError::ConfigError(format!("PORT '{value}' is not a port number")))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            upstream_base_url: std::env::var("UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.into()),
            upstream_auth_token: require("UPSTREAM_AUTH_TOKEN")?,
            database_url: require("DATABASE_URL")?,
            database_auth_token: std::env::var("DATABASE_AUTH_TOKEN").unwrap_or_default(),
            port,
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into()),
        })
    }

    /// The socket address to serve on.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| {
                CoreError::ConfigError(format!(
                    "invalid bind address {}:{}",
                    self.bind_addr, self.port
                ))
            })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CoreError::ConfigError(format!("{name} is required")))
}

/// Shared application state: the lookup pipeline plus what the health
/// endpoint needs.
pub struct AppState {
    /// The lookup pipeline
    pub service: LookupService,
    /// Store handle kept for the health endpoint's record count
    pub store: Arc<dyn RecordStore>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wires the pipeline from its collaborators.
    pub fn new(
        gate: Arc<dyn ClientGate>,
        store: Arc<dyn RecordStore>,
        provider: Arc<dyn NameLookup>,
    ) -> Self {
        Self {
            service: LookupService::new(gate, store.clone(), provider),
            store,
            started_at: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_missing_and_empty() {
        let err = require("NAMELINK_TEST_VAR_THAT_DOES_NOT_EXIST").unwrap_err();
        assert!(matches!(err, CoreError::ConfigError(_)));
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_socket_addr_parses() {
        let config = ApiConfig {
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.into(),
            upstream_auth_token: "token".into(),
            database_url: "libsql://db.example.turso.io".into(),
            database_auth_token: String::new(),
            port: 8080,
            bind_addr: "0.0.0.0".into(),
        };
        assert_eq!(config.socket_addr().unwrap().port(), 8080);

        let broken = ApiConfig {
            bind_addr: "not an address".into(),
            ..config
        };
        assert!(broken.socket_addr().is_err());
    }
}
