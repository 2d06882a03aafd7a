//! # NameLink Service
//!
//! The lookup pipeline that ties the other crates together.
//!
//! A request walks a fixed sequence of gates: the rate limiter, number
//! normalization, the record store, and only then the upstream provider.
//! Each gate is a hard stop; a rate-limited caller never touches the
//! store, and a cache hit never touches the provider. Concurrent cold
//! lookups for the same number share one provider call.
//!
//! ## Example
//!
//! ```rust,ignore
//! use namelink_service::LookupService;
//!
//! let service = LookupService::new(limiter, store, provider);
//! let outcome = service.lookup("203.0.113.7", "+91 83180 90007").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

mod service;

pub use service::LookupService;
