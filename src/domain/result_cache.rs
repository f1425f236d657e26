//! Time- and size-bounded memoization of verification verdicts.
//!
//! [`ResultCache`] keeps one [`VerificationResult`] per lower-cased wallet
//! address behind a single [`tokio::sync::Mutex`]. Eviction is not done on
//! a timer: callers run [`ResultCache::sweep`] (or
//! [`ResultCache::sweep_and_lookup`]) at the start of every verification.
//!
//! The lock is only ever held for map operations, never across network
//! calls.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use super::{Clock, SystemClock, VerificationResult, WalletAddress};

/// Default validity window for a cached verdict.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default maximum number of cached wallets.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// A cached verdict with its insertion time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached verdict.
    pub result: VerificationResult,
    /// Wall-clock insertion time.
    pub inserted_at: DateTime<Utc>,
}

/// Counts of entries removed by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Entries removed because they outlived the TTL.
    pub expired: usize,
    /// Entries removed to bring the map back under the size bound.
    pub evicted: usize,
}

/// Process-wide verdict cache keyed by wallet.
#[derive(Debug)]
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    /// Creates a cache on the system clock.
    #[must_use]
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self::with_clock(ttl_secs, max_entries, Arc::new(SystemClock))
    }

    /// Creates a cache that reads time from `clock`.
    #[must_use]
    pub fn with_clock(ttl_secs: u64, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries,
            clock,
        }
    }

    /// Returns the cached verdict for `wallet` if it is younger than the TTL.
    ///
    /// A stale entry is reported as a miss but left in place for the next
    /// sweep.
    pub async fn lookup(&self, wallet: &WalletAddress) -> Option<VerificationResult> {
        let now = self.clock.now();
        let map = self.entries.lock().await;
        self.fresh(&map, wallet, now)
    }

    /// Inserts or overwrites the verdict for `wallet`, stamped with the
    /// current time.
    pub async fn store(&self, wallet: &WalletAddress, result: VerificationResult) {
        let inserted_at = self.clock.now();
        let mut map = self.entries.lock().await;
        map.insert(
            wallet.to_lower_hex(),
            CacheEntry {
                result,
                inserted_at,
            },
        );
    }

    /// Removes expired entries, then the oldest entries while the map
    /// exceeds its bound.
    pub async fn sweep(&self) -> SweepStats {
        let now = self.clock.now();
        let mut map = self.entries.lock().await;
        self.sweep_locked(&mut map, now)
    }

    /// Runs a sweep and a lookup under one lock acquisition.
    pub async fn sweep_and_lookup(
        &self,
        wallet: &WalletAddress,
    ) -> (SweepStats, Option<VerificationResult>) {
        let now = self.clock.now();
        let mut map = self.entries.lock().await;
        let stats = self.sweep_locked(&mut map, now);
        let hit = self.fresh(&map, wallet, now);
        (stats, hit)
    }

    /// Age of the entry for `wallet`, if present.
    pub async fn age_of(&self, wallet: &WalletAddress) -> Option<Duration> {
        let now = self.clock.now();
        let map = self.entries.lock().await;
        map.get(&wallet.to_lower_hex())
            .map(|entry| now - entry.inserted_at)
    }

    /// Number of entries, including stale ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Configured TTL.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Configured size bound.
    #[must_use]
    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn fresh(
        &self,
        map: &HashMap<String, CacheEntry>,
        wallet: &WalletAddress,
        now: DateTime<Utc>,
    ) -> Option<VerificationResult> {
        map.get(&wallet.to_lower_hex())
            .filter(|entry| now - entry.inserted_at < self.ttl)
            .map(|entry| entry.result.clone())
    }

    fn sweep_locked(&self, map: &mut HashMap<String, CacheEntry>, now: DateTime<Utc>) -> SweepStats {
        let before = map.len();
        map.retain(|_, entry| now - entry.inserted_at < self.ttl);
        let expired = before - map.len();

        let mut evicted = 0;
        if map.len() > self.max_entries {
            let mut by_age: Vec<(DateTime<Utc>, String)> = map
                .iter()
                .map(|(key, entry)| (entry.inserted_at, key.clone()))
                .collect();
            by_age.sort();
            let excess = map.len() - self.max_entries;
            for (_, key) in by_age.into_iter().take(excess) {
                map.remove(&key);
                evicted += 1;
            }
        }

        if expired > 0 || evicted > 0 {
            tracing::debug!(expired, evicted, remaining = map.len(), "cache swept");
        }
        SweepStats { expired, evicted }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS, DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ManualClock;

    fn wallet(n: u32) -> WalletAddress {
        let Ok(addr) = WalletAddress::parse(&format!("0x{n:040x}")) else {
            panic!("valid address");
        };
        addr
    }

    fn make_cache(max_entries: usize) -> (ResultCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let shared: Arc<dyn Clock> = Arc::<ManualClock>::clone(&clock);
        let cache = ResultCache::with_clock(DEFAULT_TTL_SECS, max_entries, shared);
        (cache, clock)
    }

    #[tokio::test]
    async fn store_then_lookup_hits() {
        let (cache, _clock) = make_cache(DEFAULT_MAX_ENTRIES);
        let result = VerificationResult::error("no claim");
        cache.store(&wallet(1), result.clone()).await;

        assert_eq!(cache.lookup(&wallet(1)).await, Some(result));
        assert_eq!(cache.lookup(&wallet(2)).await, None);
    }

    #[tokio::test]
    async fn lookup_misses_at_ttl() {
        let (cache, clock) = make_cache(DEFAULT_MAX_ENTRIES);
        cache.store(&wallet(1), VerificationResult::error("x")).await;

        clock.advance_secs(299);
        assert!(cache.lookup(&wallet(1)).await.is_some());

        clock.advance_secs(1);
        assert!(cache.lookup(&wallet(1)).await.is_none());
        // Stale entry is still present until swept.
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn sweep_removes_expired() {
        let (cache, clock) = make_cache(DEFAULT_MAX_ENTRIES);
        cache.store(&wallet(1), VerificationResult::error("old")).await;
        clock.advance_secs(200);
        cache.store(&wallet(2), VerificationResult::error("new")).await;
        clock.advance_secs(100);

        let stats = cache.sweep().await;
        assert_eq!(stats, SweepStats { expired: 1, evicted: 0 });
        assert_eq!(cache.len().await, 1);
        assert!(cache.lookup(&wallet(2)).await.is_some());
    }

    #[tokio::test]
    async fn sweep_enforces_bound_oldest_first() {
        let (cache, clock) = make_cache(DEFAULT_MAX_ENTRIES);
        for n in 0..=1000 {
            cache.store(&wallet(n), VerificationResult::error("x")).await;
            clock.advance(Duration::milliseconds(10));
        }
        assert_eq!(cache.len().await, 1001);

        let stats = cache.sweep().await;
        assert_eq!(stats.evicted, 1);
        assert_eq!(cache.len().await, 1000);
        assert!(cache.lookup(&wallet(0)).await.is_none());
        assert!(cache.lookup(&wallet(1)).await.is_some());
        assert!(cache.lookup(&wallet(1000)).await.is_some());
    }

    #[tokio::test]
    async fn store_overwrites_and_restamps() {
        let (cache, clock) = make_cache(DEFAULT_MAX_ENTRIES);
        cache.store(&wallet(1), VerificationResult::error("first")).await;
        clock.advance_secs(250);
        cache.store(&wallet(1), VerificationResult::error("second")).await;
        clock.advance_secs(100);

        let Some(hit) = cache.lookup(&wallet(1)).await else {
            panic!("expected hit after restamp");
        };
        assert_eq!(hit.message, "second");
        assert_eq!(cache.age_of(&wallet(1)).await, Some(Duration::seconds(100)));
    }

    #[tokio::test]
    async fn sweep_and_lookup_shares_one_pass() {
        let (cache, clock) = make_cache(2);
        cache.store(&wallet(1), VerificationResult::error("a")).await;
        clock.advance_secs(1);
        cache.store(&wallet(2), VerificationResult::error("b")).await;
        clock.advance_secs(1);
        cache.store(&wallet(3), VerificationResult::error("c")).await;

        let (stats, hit) = cache.sweep_and_lookup(&wallet(1)).await;
        assert_eq!(stats.evicted, 1);
        assert!(hit.is_none());
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn clear_empties() {
        let cache = ResultCache::default();
        cache.store(&wallet(1), VerificationResult::error("a")).await;
        assert!(!cache.is_empty().await);
        cache.clear().await;
        assert!(cache.is_empty().await);
        assert_eq!(cache.max_entries(), DEFAULT_MAX_ENTRIES);
        assert_eq!(cache.ttl(), Duration::seconds(300));
    }
}
