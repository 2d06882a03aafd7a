//! Service constants for NameLink.
//!
//! Normalization rules, rate-limit defaults, and upstream retry numbers live here
//! so every crate agrees on them.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// NUMBER NORMALIZATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Length of a canonical mobile number in digits.
pub const MOBILE_NUMBER_LEN: usize = 10;

/// Leading digits a canonical mobile number may start with.
pub const VALID_LEADING_DIGITS: [char; 4] = ['6', '7', '8', '9'];

/// Country-code prefixes stripped before validation, as
/// (prefix, expected total digit count) pairs checked in order.
///
/// Anything longer than ten digits that matches none of these keeps its
/// last ten digits instead.
pub const COUNTRY_CODE_RULES: [(&str, usize); 3] = [("91", 12), ("1", 11), ("44", 12)];

// ═══════════════════════════════════════════════════════════════════════════════
// RATE LIMITING
// ═══════════════════════════════════════════════════════════════════════════════

/// Time to accrue one new token (sustained rate of one request per 12s).
pub const RATE_REFILL_INTERVAL: Duration = Duration::from_secs(12);

/// Burst capacity of a freshly created bucket.
pub const RATE_BURST: u32 = 5;

/// Multiples of the refill interval a bucket may sit unused before the
/// idle sweep removes it.
pub const RATE_IDLE_MULTIPLIER: u32 = 10;

// ═══════════════════════════════════════════════════════════════════════════════
// UPSTREAM PROVIDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Path of the name-lookup endpoint, joined to the configured base URL.
pub const LOOKUP_ENDPOINT_PATH: &str = "/validation/misc/v1/mobile-name-lookup";

/// Default provider base URL.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://svc.digitap.ai";

/// Total attempts for one upstream lookup (first try plus retries).
pub const UPSTREAM_MAX_ATTEMPTS: u32 = 3;

/// Deadline for a single attempt.
pub const UPSTREAM_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whole-request safety timeout on the HTTP client.
pub const UPSTREAM_OVERALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Backoff step between attempts; attempt N sleeps N times this.
pub const UPSTREAM_BACKOFF_STEP: Duration = Duration::from_secs(1);

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP SURFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// Default port for the inbound HTTP server.
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address for the inbound HTTP server.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
