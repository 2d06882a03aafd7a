//! Common traits for NameLink.
//!
//! These traits define the seams between the lookup pipeline and its
//! collaborators, enabling alternative backends and test doubles.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{MobileNumber, NameRecord, ResponseAudit};

// ═══════════════════════════════════════════════════════════════════════════════
// RECORD STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for durable storage of resolved records.
///
/// Implementations might use:
/// - In-memory storage (for testing/development)
/// - Turso/libSQL (for production)
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches the record for a number. A miss is `Ok(None)`, never an error.
    async fn get(&self, mobile: &MobileNumber) -> Result<Option<NameRecord>>;

    /// Inserts or updates the record for a number in one atomic statement
    /// and returns the stored row.
    ///
    /// Updating keeps the original `created_at` and refreshes `updated_at`.
    /// Concurrent upserts for the same number leave exactly one row.
    async fn upsert(&self, mobile: &MobileNumber, name: &str) -> Result<NameRecord>;

    /// Returns total stored record count.
    async fn count(&self) -> Result<u64>;

    /// Appends one provider exchange to the audit trail.
    async fn log_response(&self, audit: &ResponseAudit) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// UPSTREAM LOOKUP TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// A coherent reply from the upstream provider.
///
/// Anything the provider answered with a parseable body lands here, including
/// "no name on file". Transport exhaustion and unparseable bodies surface as
/// errors instead.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderReply {
    /// The linked name; `None` when the provider has none on file
    pub linked_name: Option<String>,
    /// Provider status string (e.g. "success")
    pub status: String,
    /// Provider message, when it sent one
    pub message: Option<String>,
    /// Response body exactly as received, for the audit trail
    pub raw_body: String,
    /// HTTP status code, for the audit trail
    pub http_status: u16,
}

/// Interface for the upstream name-lookup provider.
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Looks up the name linked to a number.
    ///
    /// `ref_id` is the unique reference sent with the request so the
    /// exchange can be traced in both parties' logs.
    async fn lookup(&self, ref_id: &str, mobile: &MobileNumber) -> Result<ProviderReply>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADMISSION GATE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for per-client admission control.
pub trait ClientGate: Send + Sync {
    /// Returns true when the client may proceed, consuming one permit.
    fn admit(&self, client_id: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_reply_shape() {
        let reply = ProviderReply {
            linked_name: Some("JANE DOE".into()),
            status: "success".into(),
            message: None,
            raw_body: "{}".into(),
            http_status: 200,
        };
        assert_eq!(reply.linked_name.as_deref(), Some("JANE DOE"));
        assert_eq!(reply.http_status, 200);
    }
}
