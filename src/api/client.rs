/// HTTP transport for the prayer times API
///
/// The request layer only sees the `Transport` trait, so tests can swap
/// the network for a scripted in-memory transport.

use async_trait::async_trait;
use reqwest::Url;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The three upstream endpoints. Also used as the cache key, since a
/// request is fully identified by its kind and parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiRequest {
    /// `GET /search?q=<text>`
    SearchCity(String),
    /// `GET /regions/<cityId>`
    Districts(String),
    /// `GET /times/<locationId>`
    PrayerTimes(String),
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiRequest::SearchCity(query) => write!(f, "search?q={}", query),
            ApiRequest::Districts(city_id) => write!(f, "regions/{}", city_id),
            ApiRequest::PrayerTimes(location_id) => write!(f, "times/{}", location_id),
        }
    }
}

/// Errors from talking to the API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, refused connection)
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered, but not with a success status
    #[error("upstream responded with HTTP {status}")]
    Upstream { status: u16 },
    /// A success response whose body is not the documented JSON shape
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid API base URL {0:?}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Only transient transport faults are worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

/// Performs a single GET and returns the response body
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &ApiRequest) -> Result<String, ApiError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url`
    /// (e.g., `https://prayertimes.api.abdus.dev/api/diyanet`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Build the full URL for a request. Path segments and the query are
    /// percent-encoded, so names like "Şanlıurfa" are safe to pass.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty();
            match request {
                ApiRequest::SearchCity(_) => {
                    segments.push("search");
                }
                ApiRequest::Districts(city_id) => {
                    segments.push("regions").push(city_id);
                }
                ApiRequest::PrayerTimes(location_id) => {
                    segments.push("times").push(location_id);
                }
            }
        }

        if let ApiRequest::SearchCity(query) = request {
            url.query_pairs_mut().append_pair("q", query);
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &ApiRequest) -> Result<String, ApiError> {
        let url = self.url_for(request)?;
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}

/// Transport used when no HTTP client could be built.
/// Every request fails, so the app runs on fallback data.
#[derive(Debug, Clone)]
pub struct OfflineTransport {
    reason: String,
}

impl OfflineTransport {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Transport for OfflineTransport {
    async fn get(&self, _request: &ApiRequest) -> Result<String, ApiError> {
        Err(ApiError::Transport(self.reason.clone()))
    }
}
