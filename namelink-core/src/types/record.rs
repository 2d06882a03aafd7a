//! Stored records, lookup outcomes, and the provider audit row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MobileNumber;

// ═══════════════════════════════════════════════════════════════════════════════
// NAME RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// A resolved number/name pair as persisted in the record store.
///
/// Once a number has been paid for upstream, its record stays authoritative;
/// repeat lookups are answered from here without another provider call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NameRecord {
    /// Canonical mobile number the name is linked to
    pub mobile: MobileNumber,
    /// Subscriber name reported by the provider (never empty)
    pub name: String,
    /// When the number was first resolved
    pub created_at: DateTime<Utc>,
    /// When the name was last written
    pub updated_at: DateTime<Utc>,
}

impl NameRecord {
    /// Creates a record stamped with the current time.
    pub fn new(mobile: MobileNumber, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            mobile,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOOKUP OUTCOME
// ═══════════════════════════════════════════════════════════════════════════════

/// The answer a lookup produces when no hard failure occurred.
///
/// Hard failures (rate limiting, store errors, provider exhaustion) travel
/// through the error channel instead.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupOutcome {
    /// A name is linked to the number.
    Found {
        /// The stored record
        record: NameRecord,
        /// Whether the record store answered without an upstream call
        from_cache: bool,
    },
    /// The provider has no name on file for this number.
    NotFound {
        /// Provider-supplied detail, when it sent any
        message: Option<String>,
    },
}

impl LookupOutcome {
    /// Returns the resolved name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            LookupOutcome::Found { record, .. } => Some(record.name.as_str()),
            LookupOutcome::NotFound { .. } => None,
        }
    }

    /// Returns true when the record store answered directly.
    pub fn is_cache_hit(&self) -> bool {
        matches!(self, LookupOutcome::Found { from_cache: true, .. })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESPONSE AUDIT
// ═══════════════════════════════════════════════════════════════════════════════

/// One raw provider exchange, kept so paid calls can be audited later.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseAudit {
    /// Reference id sent with the request
    pub ref_id: String,
    /// Canonical number that was looked up
    pub mobile: MobileNumber,
    /// Response body exactly as received
    pub response_body: String,
    /// HTTP status code of the response
    pub status_code: u16,
    /// When the exchange happened
    pub created_at: DateTime<Utc>,
}

impl ResponseAudit {
    /// Creates an audit row stamped with the current time.
    pub fn new(
        ref_id: impl Into<String>,
        mobile: MobileNumber,
        response_body: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self {
            ref_id: ref_id.into(),
            mobile,
            response_body: response_body.into(),
            status_code,
            created_at: Utc::now(),
        }
    }
}
