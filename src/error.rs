//! Error types for the page cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Failures of an entry store backend.
///
/// The cache decorator never surfaces these from a page fetch; it degrades to
/// calling the underlying fetcher directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing service could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The backing service answered with something unexpected
    #[error("Store protocol error: {0}")]
    Protocol(String),

    /// The configured endpoint could not be used
    #[error("Invalid store endpoint: {0}")]
    InvalidEndpoint(String),
}

// == Fetch Error Enum ==
/// Failures of the HTTP page fetcher.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Upstream answered with a non-success status
    #[error("Upstream returned {status} for {url}")]
    Status { url: String, status: u16 },

    /// Transport level failure (connect, timeout, body decode)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

// == Api Error Enum ==
/// Error type returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The underlying fetch failed
    #[error("Fetch failed: {0}")]
    FetchFailed(#[from] FetchError),

    /// The entry store could not answer a diagnostics query
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
