//! # NameLink Core
//!
//! Core types, errors, and traits for the NameLink mobile-number lookup service.
//!
//! This crate provides the foundational building blocks used by all other NameLink crates:
//!
//! - **Types**: Canonical mobile numbers, stored name records, lookup outcomes
//! - **Errors**: Comprehensive error types with context
//! - **Constants**: Normalization rules and service defaults
//! - **Traits**: Seams for the record store, the upstream provider, and admission control
//!
//! ## Example
//!
//! ```rust
//! use namelink_core::MobileNumber;
//!
//! // Any common formatting of the same number canonicalizes identically
//! let number = MobileNumber::parse("+91 83180 90007").unwrap();
//! assert_eq!(number.as_str(), "8318090007");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{CoreError, Result};
pub use traits::*;
pub use types::*;
