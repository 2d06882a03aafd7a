//! # NameLink Limiter
//!
//! Per-client token-bucket rate limiting.
//!
//! Each client id (normally the caller's IP) gets its own bucket, created
//! lazily at full burst and refilled continuously. An idle sweep removes
//! buckets that have not been touched for a while, so memory tracks the
//! set of active clients rather than every client ever seen.
//!
//! ## Example
//!
//! ```rust
//! use namelink_limiter::ClientRateLimiter;
//!
//! let limiter = ClientRateLimiter::new();
//! assert!(limiter.admit("203.0.113.7"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

mod limiter;

pub use limiter::{ClientRateLimiter, LimiterConfig};
