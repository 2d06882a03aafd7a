//! The lookup pipeline: admit, normalize, cache, fetch, persist.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use namelink_core::error::{CoreError, Result};
use namelink_core::traits::{ClientGate, NameLookup, RecordStore};
use namelink_core::types::{LookupOutcome, MobileNumber, NameRecord, ResponseAudit};

/// Orchestrates one lookup across the limiter, the store, and the provider.
///
/// Collaborators are injected at construction, so any of them can be a
/// test double. The service itself holds no per-request state beyond the
/// in-flight map used to collapse concurrent cold lookups.
pub struct LookupService {
    gate: Arc<dyn ClientGate>,
    store: Arc<dyn RecordStore>,
    provider: Arc<dyn NameLookup>,
    in_flight: DashMap<String, Arc<OnceCell<LookupOutcome>>>,
}

impl LookupService {
    /// Creates a service over the given collaborators.
    pub fn new(
        gate: Arc<dyn ClientGate>,
        store: Arc<dyn RecordStore>,
        provider: Arc<dyn NameLookup>,
    ) -> Self {
        Self {
            gate,
            store,
            provider,
            in_flight: DashMap::new(),
        }
    }

    /// Resolves a raw number for a client.
    ///
    /// Gate order is fixed: rate limit, normalize, cache read, provider.
    /// A failure at any gate stops the pipeline; later collaborators are
    /// never touched.
    #[instrument(skip(self, raw_number))]
    pub async fn lookup(&self, client_id: &str, raw_number: &str) -> Result<LookupOutcome> {
        if !self.gate.admit(client_id) {
            warn!(client_id, "Request rejected by rate limiter");
            return Err(CoreError::RateLimited);
        }

        let mobile = MobileNumber::parse(raw_number)?;

        if let Some(record) = self.store.get(&mobile).await? {
            debug!(mobile = %mobile, "Cache hit");
            return Ok(LookupOutcome::Found {
                record,
                from_cache: true,
            });
        }

        debug!(mobile = %mobile, "Cache miss, consulting provider");
        self.fetch_shared(&mobile).await
    }

    /// Runs the provider leg through a per-number in-flight cell so
    /// concurrent misses for one number pay for a single upstream call.
    ///
    /// Only a settled success is shared; when the leading call fails, its
    /// error propagates and one of the waiters runs the fetch itself.
    async fn fetch_shared(&self, mobile: &MobileNumber) -> Result<LookupOutcome> {
        let cell = self
            .in_flight
            .entry(mobile.as_str().to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let result = cell
            .get_or_try_init(|| self.fetch_and_persist(mobile))
            .await
            .map(|outcome| outcome.clone());

        // Retire the cell once settled; the record store answers from here on.
        self.in_flight
            .remove_if(mobile.as_str(), |_, entry| Arc::ptr_eq(entry, &cell));

        result
    }

    /// One provider round trip plus persistence and auditing.
    async fn fetch_and_persist(&self, mobile: &MobileNumber) -> Result<LookupOutcome> {
        let ref_id = format!("REF-{}", Uuid::new_v4());
        let reply = self.provider.lookup(&ref_id, mobile).await?;

        let audit = ResponseAudit::new(&ref_id, mobile.clone(), &reply.raw_body, reply.http_status);
        if let Err(err) = self.store.log_response(&audit).await {
            warn!(ref_id, error = %err, "Audit write failed, continuing");
        }

        match reply.linked_name {
            Some(name) => {
                let record = match self.store.upsert(mobile, &name).await {
                    Ok(record) => record,
                    Err(err) => {
                        // The caller paid for this answer; a write failure
                        // must not turn it into an error response.
                        warn!(mobile = %mobile, error = %err, "Persist failed, answering anyway");
                        NameRecord::new(mobile.clone(), name)
                    }
                };
                info!(mobile = %mobile, ref_id, "Resolved and persisted");
                Ok(LookupOutcome::Found {
                    record,
                    from_cache: false,
                })
            }
            None => {
                debug!(mobile = %mobile, ref_id, "Provider has no name on file");
                Ok(LookupOutcome::NotFound {
                    message: reply.message,
                })
            }
        }
    }
}
