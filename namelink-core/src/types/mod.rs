//! Domain types for NameLink.
//!
//! This module provides the core data structures used throughout the service:
//!
//! - [`MobileNumber`]: validated, canonical ten-digit mobile number
//! - [`NameRecord`]: a resolved number/name pair as persisted
//! - [`LookupOutcome`]: the answer a lookup produces
//! - [`ResponseAudit`]: one raw provider exchange, kept for auditing

mod number;
mod record;

pub use number::*;
pub use record::*;
