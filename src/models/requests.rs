//! Request DTOs for the page cache API
//!
//! Defines the query parameters accepted by the endpoints.

use reqwest::Url;
use serde::Deserialize;

/// Query string for `GET /page` and `GET /count`
///
/// # Fields
/// - `url`: The page to fetch, also the cache key
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// The page URL
    pub url: String,
}

impl PageQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.is_empty() {
            return Some("url cannot be empty".to_string());
        }
        match Url::parse(&self.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => None,
            Ok(url) => Some(format!("unsupported scheme '{}'", url.scheme())),
            Err(e) => Some(format!("invalid url: {}", e)),
        }
    }
}
