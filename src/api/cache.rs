/// In-memory freshness cache for API responses
///
/// One cache is created per application instance and shared by handle.
/// Entries expire after a fixed window; nothing is written to disk.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::client::ApiRequest;
use crate::state::data::{LocationResult, PrayerTimes};

/// A cached response body, already decoded
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Locations(Vec<LocationResult>),
    PrayerTimes(PrayerTimes),
}

/// Response types that can live in the cache
pub trait Cacheable: DeserializeOwned + Clone + Send + 'static {
    fn into_cached(self) -> CachedValue;
    fn from_cached(value: CachedValue) -> Option<Self>;
}

impl Cacheable for Vec<LocationResult> {
    fn into_cached(self) -> CachedValue {
        CachedValue::Locations(self)
    }

    fn from_cached(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Locations(locations) => Some(locations),
            _ => None,
        }
    }
}

impl Cacheable for PrayerTimes {
    fn into_cached(self) -> CachedValue {
        CachedValue::PrayerTimes(self)
    }

    fn from_cached(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::PrayerTimes(times) => Some(times),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: CachedValue,
    pub fetched_at: Instant,
    pub fresh_for: Duration,
}

impl CacheEntry {
    /// An entry is fresh strictly before `fetched_at + fresh_for`
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < self.fresh_for
    }
}

/// Thread-safe map from request to decoded response
#[derive(Debug, Default)]
pub struct FreshnessCache {
    entries: Mutex<HashMap<ApiRequest, CacheEntry>>,
}

impl FreshnessCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a fresh value for `key`, if any
    pub fn get(&self, key: &ApiRequest) -> Option<CachedValue> {
        self.get_at(key, Instant::now())
    }

    /// Get a value that is still fresh at `now`. Expired entries are dropped.
    pub fn get_at(&self, key: &ApiRequest, now: Instant) -> Option<CachedValue> {
        let mut entries = self.lock();

        let entry = entries.get(key)?;
        if entry.is_fresh_at(now) {
            return Some(entry.value.clone());
        }

        entries.remove(key);
        None
    }

    /// Store a value, replacing any previous entry for the same key
    pub fn insert(&self, key: ApiRequest, value: CachedValue, fresh_for: Duration) {
        self.insert_at(key, value, fresh_for, Instant::now());
    }

    /// Store a value as fetched at `now`. Entries already expired at `now`
    /// are swept first, so keys that are never looked up again do not pile up.
    pub fn insert_at(&self, key: ApiRequest, value: CachedValue, fresh_for: Duration, now: Instant) {
        let mut entries = self.lock();
        entries.retain(|_, entry| entry.is_fresh_at(now));
        entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
                fresh_for,
            },
        );
    }

    /// Remove one entry. Returns whether it was present.
    pub fn invalidate(&self, key: &ApiRequest) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Drop everything. Returns how many entries were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let removed = entries.len();
        entries.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written HashMap
    // entry behind, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<ApiRequest, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ankara() -> CachedValue {
        CachedValue::Locations(vec![LocationResult {
            id: "539".to_string(),
            text: "Ankara".to_string(),
            slug: "ankara".to_string(),
        }])
    }

    fn key() -> ApiRequest {
        ApiRequest::SearchCity("Ankara".to_string())
    }

    #[test]
    fn test_hit_within_window() {
        let cache = FreshnessCache::new();
        let start = Instant::now();
        cache.insert_at(key(), ankara(), Duration::from_secs(3600), start);

        let hit = cache.get_at(&key(), start + Duration::from_secs(3599));

        assert_eq!(hit, Some(ankara()));
    }

    #[test]
    fn test_expires_at_end_of_window() {
        let cache = FreshnessCache::new();
        let start = Instant::now();
        cache.insert_at(key(), ankara(), Duration::from_secs(1800), start);

        assert_eq!(cache.get_at(&key(), start + Duration::from_secs(1800)), None);
        // The expired entry is evicted on lookup
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_are_distinct_per_operation() {
        let cache = FreshnessCache::new();
        cache.insert(key(), ankara(), Duration::from_secs(60));

        assert!(cache.get(&ApiRequest::Districts("Ankara".to_string())).is_none());
        assert!(cache.get(&key()).is_some());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = FreshnessCache::new();
        cache.insert(key(), ankara(), Duration::from_secs(60));
        cache.insert(
            ApiRequest::Districts("539".to_string()),
            CachedValue::Locations(Vec::new()),
            Duration::from_secs(60),
        );

        assert!(cache.invalidate(&key()));
        assert!(!cache.invalidate(&key()));
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.clear(), 1);
        assert!(cache.is_empty());
        assert_eq!(cache.clear(), 0);
    }

    #[test]
    fn test_insert_sweeps_expired_entries() {
        let cache = FreshnessCache::new();
        let start = Instant::now();
        cache.insert_at(key(), ankara(), Duration::from_secs(60), start);
        cache.insert_at(
            ApiRequest::PrayerTimes("9541".to_string()),
            CachedValue::Locations(Vec::new()),
            Duration::from_secs(3600),
            start,
        );

        // The city search expired without ever being looked up again
        cache.insert_at(
            ApiRequest::Districts("539".to_string()),
            CachedValue::Locations(Vec::new()),
            Duration::from_secs(3600),
            start + Duration::from_secs(60),
        );

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_at(&key(), start), None);
        assert!(cache
            .get_at(&ApiRequest::PrayerTimes("9541".to_string()), start + Duration::from_secs(60))
            .is_some());
    }

    #[test]
    fn test_reinsert_is_idempotent() {
        let cache = FreshnessCache::new();
        cache.insert(key(), ankara(), Duration::from_secs(60));
        cache.insert(key(), ankara(), Duration::from_secs(60));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key()), Some(ankara()));
    }

    #[test]
    fn test_cacheable_conversion_checks_kind() {
        let value = ankara();
        assert!(PrayerTimes::from_cached(value.clone()).is_none());
        assert_eq!(Vec::<LocationResult>::from_cached(value).map(|l| l.len()), Some(1));
    }
}
