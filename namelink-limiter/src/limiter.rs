//! Keyed token buckets with continuous refill and an idle sweep.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use namelink_core::constants::{RATE_BURST, RATE_IDLE_MULTIPLIER, RATE_REFILL_INTERVAL};
use namelink_core::traits::ClientGate;

/// Configuration for [`ClientRateLimiter`].
#[derive(Clone, Debug)]
pub struct LimiterConfig {
    /// Time to accrue one new token.
    pub refill_interval: Duration,
    /// Token capacity of a fresh bucket.
    pub burst: u32,
    /// How long a bucket may sit untouched before the sweep removes it.
    pub idle_timeout: Duration,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            refill_interval: RATE_REFILL_INTERVAL,
            burst: RATE_BURST,
            idle_timeout: RATE_REFILL_INTERVAL * RATE_IDLE_MULTIPLIER,
        }
    }
}

/// One client's bucket. Tokens are fractional while refilling.
#[derive(Debug)]
struct RateBucket {
    tokens: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl RateBucket {
    fn new(burst: u32, now: Instant) -> Self {
        Self {
            tokens: f64::from(burst),
            last_refill: now,
            last_seen: now,
        }
    }

    /// Accrues `elapsed / refill_interval` tokens, capped at burst.
    fn refill(&mut self, config: &LimiterConfig, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        if !elapsed.is_zero() {
            let accrued = elapsed.as_secs_f64() / config.refill_interval.as_secs_f64();
            self.tokens = (self.tokens + accrued).min(f64::from(config.burst));
            self.last_refill = now;
        }
    }

    /// Takes one token if available. Denied calls still count as activity.
    fn try_take(&mut self, config: &LimiterConfig, now: Instant) -> bool {
        self.refill(config, now);
        self.last_seen = now;
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Per-client token-bucket rate limiter.
///
/// # Thread Safety
///
/// The bucket map is a concurrent map; each bucket sits behind its own
/// mutex. No lock is held across an await point, so the limiter can be
/// shared freely between request handlers and the sweep task.
#[derive(Debug)]
pub struct ClientRateLimiter {
    buckets: DashMap<String, Mutex<RateBucket>>,
    config: LimiterConfig,
}

impl ClientRateLimiter {
    /// Creates a limiter with the service defaults (burst 5, one token
    /// per 12 seconds).
    pub fn new() -> Self {
        Self::with_config(LimiterConfig::default())
    }

    /// Creates a limiter with explicit configuration.
    pub fn with_config(config: LimiterConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
        }
    }

    /// Returns true when the client may proceed, consuming one token.
    ///
    /// A first-time client gets a bucket at full burst.
    pub fn admit(&self, client_id: &str) -> bool {
        self.admit_at(client_id, Instant::now())
    }

    fn admit_at(&self, client_id: &str, now: Instant) -> bool {
        let bucket = self
            .buckets
            .entry(client_id.to_string())
            .or_insert_with(|| Mutex::new(RateBucket::new(self.config.burst, now)));

        let allowed = bucket.lock().try_take(&self.config, now);
        if !allowed {
            debug!(client_id, "Rate limit exceeded");
        }
        allowed
    }

    /// Removes buckets idle longer than the configured timeout and returns
    /// how many were dropped. Run this periodically; an active client whose
    /// bucket was swept simply starts over at full burst.
    pub fn sweep_idle(&self) -> usize {
        self.sweep_idle_at(Instant::now())
    }

    fn sweep_idle_at(&self, now: Instant) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| {
            now.saturating_duration_since(bucket.lock().last_seen) < self.config.idle_timeout
        });
        let removed = before.saturating_sub(self.buckets.len());
        if removed > 0 {
            debug!(removed, remaining = self.buckets.len(), "Swept idle rate buckets");
        }
        removed
    }

    /// Number of clients currently tracked.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true when no client is tracked.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// The configuration this limiter runs with.
    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }
}

impl Default for ClientRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientGate for ClientRateLimiter {
    fn admit(&self, client_id: &str) -> bool {
        ClientRateLimiter::admit(self, client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_client_gets_full_burst() {
        let limiter = ClientRateLimiter::new();
        let now = Instant::now();

        for i in 0..5 {
            assert!(limiter.admit_at("203.0.113.7", now), "request {i}");
        }
        assert!(!limiter.admit_at("203.0.113.7", now));
    }

    #[test]
    fn test_one_refill_interval_grants_exactly_one() {
        let limiter = ClientRateLimiter::new();
        let start = Instant::now();

        for _ in 0..5 {
            assert!(limiter.admit_at("ip", start));
        }
        assert!(!limiter.admit_at("ip", start));

        let later = start + Duration::from_secs(12);
        assert!(limiter.admit_at("ip", later));
        assert!(!limiter.admit_at("ip", later));
    }

    #[test]
    fn test_partial_interval_grants_nothing() {
        let limiter = ClientRateLimiter::new();
        let start = Instant::now();

        for _ in 0..5 {
            assert!(limiter.admit_at("ip", start));
        }

        let halfway = start + Duration::from_secs(6);
        assert!(!limiter.admit_at("ip", halfway));
    }

    #[test]
    fn test_tokens_cap_at_burst() {
        let limiter = ClientRateLimiter::new();
        let start = Instant::now();
        assert!(limiter.admit_at("ip", start));

        // A long quiet spell must not bank more than the burst
        let much_later = start + Duration::from_secs(3600);
        for _ in 0..5 {
            assert!(limiter.admit_at("ip", much_later));
        }
        assert!(!limiter.admit_at("ip", much_later));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = ClientRateLimiter::new();
        let now = Instant::now();

        for _ in 0..5 {
            assert!(limiter.admit_at("203.0.113.7", now));
        }
        assert!(!limiter.admit_at("203.0.113.7", now));

        // A different client still has its own full burst
        assert!(limiter.admit_at("203.0.113.8", now));
        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn test_buckets_created_lazily() {
        let limiter = ClientRateLimiter::new();
        assert!(limiter.is_empty());

        limiter.admit("a");
        limiter.admit("b");
        limiter.admit("a");
        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn test_sweep_removes_only_idle_buckets() {
        let limiter = ClientRateLimiter::new();
        let start = Instant::now();

        limiter.admit_at("old", start);
        limiter.admit_at("recent", start + Duration::from_secs(60));

        // Default idle timeout is 120s; "old" is 125s stale, "recent" 65s
        let removed = limiter.sweep_idle_at(start + Duration::from_secs(125));
        assert_eq!(removed, 1);
        assert_eq!(limiter.len(), 1);

        // The survivor keeps serving
        assert!(limiter.admit_at("recent", start + Duration::from_secs(126)));
    }

    #[test]
    fn test_denied_call_still_counts_as_activity() {
        let limiter = ClientRateLimiter::with_config(LimiterConfig {
            refill_interval: Duration::from_secs(12),
            burst: 1,
            idle_timeout: Duration::from_secs(100),
        });
        let start = Instant::now();

        assert!(limiter.admit_at("ip", start));
        assert!(!limiter.admit_at("ip", start + Duration::from_secs(1)));

        // last_seen moved to start+1s, so at +100s the bucket is only 99s idle
        assert_eq!(limiter.sweep_idle_at(start + Duration::from_secs(100)), 0);
        assert_eq!(limiter.sweep_idle_at(start + Duration::from_secs(102)), 1);
        assert!(limiter.is_empty());
    }

    #[test]
    fn test_swept_client_starts_over_at_full_burst() {
        let limiter = ClientRateLimiter::new();
        let start = Instant::now();

        for _ in 0..5 {
            assert!(limiter.admit_at("ip", start));
        }

        let after_sweep = start + Duration::from_secs(200);
        limiter.sweep_idle_at(after_sweep);
        assert!(limiter.is_empty());

        for _ in 0..5 {
            assert!(limiter.admit_at("ip", after_sweep));
        }
        assert!(!limiter.admit_at("ip", after_sweep));
    }

    #[test]
    fn test_concurrent_requests_share_one_budget() {
        use std::sync::Arc;

        let limiter = Arc::new(ClientRateLimiter::new());
        let now = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = limiter.clone();
            handles.push(std::thread::spawn(move || {
                (0..5).filter(|_| limiter.admit_at("shared", now)).count()
            }));
        }

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 5, "20 concurrent tries, budget of 5");
    }

    #[test]
    fn test_gate_trait_object() {
        let limiter: std::sync::Arc<dyn ClientGate> = std::sync::Arc::new(ClientRateLimiter::new());
        assert!(limiter.admit("203.0.113.7"));
    }
}
