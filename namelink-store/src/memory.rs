//! In-memory record store.
//!
//! Fast, thread-safe storage suitable for development, testing,
//! and single-process deployments.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, instrument};

use namelink_core::error::Result;
use namelink_core::traits::RecordStore;
use namelink_core::types::{MobileNumber, NameRecord, ResponseAudit};

/// In-memory record store.
///
/// Records are keyed by canonical mobile number; audit rows are kept in
/// arrival order.
///
/// # Thread Safety
///
/// All operations are thread-safe. The upsert runs under the map's shard
/// lock, so concurrent upserts for one number serialize and leave exactly
/// one entry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, NameRecord>,
    audits: Mutex<Vec<ResponseAudit>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes all records and audit rows.
    pub fn clear(&self) {
        self.records.clear();
        self.audits.lock().clear();
    }

    /// Returns a copy of the audit trail (mostly useful in tests).
    pub fn audits(&self) -> Vec<ResponseAudit> {
        self.audits.lock().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    #[instrument(skip(self), fields(mobile = %mobile))]
    async fn get(&self, mobile: &MobileNumber) -> Result<Option<NameRecord>> {
        Ok(self.records.get(mobile.as_str()).map(|entry| entry.clone()))
    }

    #[instrument(skip(self, name), fields(mobile = %mobile))]
    async fn upsert(&self, mobile: &MobileNumber, name: &str) -> Result<NameRecord> {
        let now = Utc::now();
        let record = self
            .records
            .entry(mobile.as_str().to_string())
            .and_modify(|record| {
                record.name = name.to_string();
                record.updated_at = now;
            })
            .or_insert_with(|| NameRecord {
                mobile: mobile.clone(),
                name: name.to_string(),
                created_at: now,
                updated_at: now,
            })
            .clone();

        debug!(mobile = %mobile, "Stored record");
        Ok(record)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.len() as u64)
    }

    async fn log_response(&self, audit: &ResponseAudit) -> Result<()> {
        self.audits.lock().push(audit.clone());
        Ok(())
    }
}
