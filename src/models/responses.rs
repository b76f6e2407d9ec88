//! Response DTOs for the page cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::Source;

/// Response body for `GET /page`
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    /// The requested URL
    pub url: String,
    /// Page body
    pub content: String,
    /// Whether the body came from the cache, a fresh fetch, or a bypass
    pub source: Source,
    /// Counter value recorded by this request's own increment; absent when
    /// the request was not counted (store unavailable, or a hit under the
    /// miss-only policy)
    pub access_count: Option<u64>,
}

impl PageResponse {
    /// Creates a new PageResponse
    pub fn new(
        url: impl Into<String>,
        content: impl Into<String>,
        source: Source,
        access_count: Option<u64>,
    ) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
            source,
            access_count,
        }
    }
}

/// Response body for `GET /count`
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    /// The requested URL
    pub url: String,
    /// Number of recorded accesses
    pub access_count: u64,
}

impl CountResponse {
    /// Creates a new CountResponse
    pub fn new(url: impl Into<String>, access_count: u64) -> Self {
        Self {
            url: url.into(),
            access_count,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
