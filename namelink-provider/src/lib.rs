//! # NameLink Provider
//!
//! Client for the upstream mobile-name verification API.
//!
//! Each lookup is one `POST` to the provider's endpoint with bounded
//! retries: transport failures (connect errors, timeouts, dropped reads)
//! are retried with a linear backoff, while anything the provider actually
//! answered (success, "no name on file", or a well-formed error) is
//! final. Every paid call matters, so the raw exchange is surfaced to the
//! caller for auditing.
//!
//! ## Example
//!
//! ```rust,ignore
//! use namelink_provider::{UpstreamClient, UpstreamConfig};
//!
//! let client = UpstreamClient::with_config(UpstreamConfig::new(
//!     "https://svc.digitap.ai",
//!     std::env::var("UPSTREAM_AUTH_TOKEN")?,
//! ));
//! let reply = client.lookup("REF-1", &mobile).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

mod client;

pub use client::{UpstreamClient, UpstreamConfig};
