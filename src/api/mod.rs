/// Prayer times API access
///
/// This module handles:
/// - HTTP transport and request/error types (client.rs)
/// - The in-memory freshness cache (cache.rs)
/// - Locally synthesized data used when the API is unreachable (fallback.rs)
/// - The retrying, caching, falling-back request layer (service.rs)

pub mod cache;
pub mod client;
pub mod fallback;
pub mod service;

pub use cache::FreshnessCache;
pub use client::{HttpTransport, OfflineTransport, Transport};
pub use service::{FetchPolicy, Fetched, LocationService};
