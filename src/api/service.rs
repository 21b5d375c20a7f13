/// Resilient request layer for city search, district search and prayer times
///
/// Every operation follows the same policy:
/// 1. Serve a fresh cache entry without touching the network
/// 2. Otherwise request it, retrying transport failures up to `max_retries`
/// 3. On any remaining failure, substitute local data marked as degraded
/// 4. Cache live successes only

use chrono::Local;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::cache::{Cacheable, FreshnessCache};
use super::client::{ApiError, ApiRequest, Transport};
use super::fallback;
use crate::config::Config;
use crate::state::data::{LocationResult, PrayerTimes};

/// City queries shorter than this are not sent
pub const MIN_CITY_QUERY_LEN: usize = 2;

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Fetched from the API just now (or nothing needed fetching)
    Live,
    /// Served from the freshness cache
    Cache,
    /// Synthesized locally because the API failed; only an estimate
    Fallback,
}

/// A result plus its origin. Fallback data has the same shape as real
/// data, so the origin is the only way to tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Fetched<T> {
    fn new(data: T, source: DataSource) -> Self {
        Self { data, source }
    }

    /// True when the data is a local estimate the user should be told about
    pub fn is_degraded(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

/// Retry and freshness settings
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    /// Retries after the first attempt, for transport failures only
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Freshness window for city and district searches
    pub location_fresh_for: Duration,
    /// Freshness window for prayer times
    pub prayer_times_fresh_for: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
            location_fresh_for: Duration::from_secs(60 * 60),
            prayer_times_fresh_for: Duration::from_secs(30 * 60),
        }
    }
}

impl From<&Config> for FetchPolicy {
    fn from(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            location_fresh_for: Duration::from_secs(config.location_fresh_for_secs),
            prayer_times_fresh_for: Duration::from_secs(config.prayer_times_fresh_for_secs),
        }
    }
}

/// Entry point for all API data. Cheap to clone; clones share the
/// transport and the cache.
#[derive(Clone)]
pub struct LocationService {
    transport: Arc<dyn Transport>,
    cache: Arc<FreshnessCache>,
    policy: FetchPolicy,
}

impl LocationService {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<FreshnessCache>, policy: FetchPolicy) -> Self {
        Self {
            transport,
            cache,
            policy,
        }
    }

    /// Forget every cached response. Returns how many were dropped.
    pub fn clear_cache(&self) -> usize {
        if self.cache.is_empty() {
            return 0;
        }
        let dropped = self.cache.clear();
        info!(dropped, "Cleared response cache");
        dropped
    }

    /// Search cities by name.
    ///
    /// Falls back to the static province list filtered by `query`.
    pub async fn search_city(&self, query: &str) -> Fetched<Vec<LocationResult>> {
        let query = query.trim();
        if query.chars().count() < MIN_CITY_QUERY_LEN {
            return Fetched::new(Vec::new(), DataSource::Live);
        }

        let request = ApiRequest::SearchCity(query.to_string());
        match self.cached(request, self.policy.location_fresh_for).await {
            Ok(result) => result,
            Err(err) => {
                warn!(query, error = %err, "City search failed, using local city list");
                Fetched::new(fallback::cities_matching(query), DataSource::Fallback)
            }
        }
    }

    /// List the districts of a city.
    ///
    /// Falls back to three placeholder districts derived from `city_id`.
    pub async fn search_district(&self, city_id: &str) -> Fetched<Vec<LocationResult>> {
        if city_id.is_empty() {
            return Fetched::new(Vec::new(), DataSource::Live);
        }

        let request = ApiRequest::Districts(city_id.to_string());
        match self.cached(request, self.policy.location_fresh_for).await {
            Ok(result) => result,
            Err(err) => {
                warn!(city_id, error = %err, "District search failed, using placeholder districts");
                Fetched::new(fallback::placeholder_districts(city_id), DataSource::Fallback)
            }
        }
    }

    /// Get today's prayer times for a city or district.
    ///
    /// Falls back to a fixed estimated schedule for today.
    pub async fn fetch_prayer_times(&self, location_id: &str) -> Fetched<PrayerTimes> {
        let request = ApiRequest::PrayerTimes(location_id.to_string());
        match self.cached(request, self.policy.prayer_times_fresh_for).await {
            Ok(result) => result,
            Err(err) => {
                warn!(location_id, error = %err, "Prayer times unavailable, showing estimated times");
                let today = Local::now().date_naive();
                Fetched::new(
                    fallback::estimated_prayer_times(location_id, today),
                    DataSource::Fallback,
                )
            }
        }
    }

    /// Same as `fetch_prayer_times`, but ignores any cached entry
    pub async fn fetch_prayer_times_fresh(&self, location_id: &str) -> Fetched<PrayerTimes> {
        if self.cache.invalidate(&ApiRequest::PrayerTimes(location_id.to_string())) {
            debug!(location_id, "Dropped cached prayer times for refresh");
        }
        self.fetch_prayer_times(location_id).await
    }

    /// Cache lookup, then network on a miss. Live results are cached.
    async fn cached<T: Cacheable>(&self, request: ApiRequest, fresh_for: Duration) -> Result<Fetched<T>, ApiError> {
        if let Some(hit) = self.cache.get(&request).and_then(T::from_cached) {
            debug!(%request, "Cache hit");
            return Ok(Fetched::new(hit, DataSource::Cache));
        }

        let data: T = self.fetch(&request).await?;
        self.cache.insert(request, data.clone().into_cached(), fresh_for);

        Ok(Fetched::new(data, DataSource::Live))
    }

    /// GET and decode, retrying transport failures
    async fn fetch<T: Cacheable>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let mut attempt = 0;

        loop {
            match self.transport.get(request).await {
                Ok(body) => {
                    if attempt > 0 {
                        info!(%request, attempt, "Request succeeded after retry");
                    }
                    return serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()));
                }
                Err(err) if err.is_retryable() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    warn!(%request, attempt, error = %err, "Request failed, retrying");
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl fmt::Debug for LocationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationService")
            .field("policy", &self.policy)
            .field("cached_entries", &self.cache.len())
            .finish()
    }
}
