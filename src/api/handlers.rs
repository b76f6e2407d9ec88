//! API Handlers
//!
//! HTTP request handlers for each page cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::cache::{Cached, SharedStore};
use crate::config::Config;
use crate::error::{ApiError, FetchError, Result};
use crate::fetch::Fetcher;
use crate::models::{CountResponse, HealthResponse, PageQuery, PageResponse};

/// Type-erased page fetcher so handlers do not depend on the transport.
pub type PageFetcher = Arc<dyn Fetcher<Error = FetchError>>;

/// Page fetcher wrapped with the entry store.
pub type PageCache = Cached<PageFetcher>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cached page fetcher
    pub cache: Arc<PageCache>,
}

impl AppState {
    /// Creates a new AppState with the given page cache.
    pub fn new(cache: PageCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Wraps `fetcher` with `store` using the TTL and count policy from config.
    pub fn from_config<F>(fetcher: F, store: SharedStore, config: &Config) -> Self
    where
        F: Fetcher<Error = FetchError> + 'static,
    {
        let fetcher: PageFetcher = Arc::new(fetcher);
        let cache = Cached::new(fetcher, store, config.ttl()).with_policy(config.count_policy);
        Self::new(cache)
    }
}

/// Handler for GET /page
///
/// Returns the page body, serving it from the cache while fresh.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let fetched = state.cache.fetch_traced(&query.url).await?;

    Ok(Json(PageResponse::new(
        query.url,
        fetched.value,
        fetched.source,
        fetched.access_count,
    )))
}

/// Handler for GET /count
///
/// Returns the access counter for a page without touching it.
pub async fn count_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CountResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let access_count = state.cache.access_count(&query.url).await?;

    Ok(Json(CountResponse::new(query.url, access_count)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStore, Source};
    use crate::fetch::fetch_fn;

    fn test_state() -> AppState {
        let fetcher = fetch_fn(|url: String| async move {
            if url.contains("broken") {
                Err(FetchError::Status { url, status: 500 })
            } else {
                Ok(format!("<html>{}</html>", url))
            }
        });
        AppState::from_config(fetcher, Arc::new(MemoryStore::new()), &Config::default())
    }

    fn page(url: &str) -> Query<PageQuery> {
        Query(PageQuery {
            url: url.to_string(),
        })
    }

    #[tokio::test]
    async fn test_page_handler_miss_then_hit() {
        let state = test_state();

        let first = page_handler(State(state.clone()), page("http://a.test/"))
            .await
            .unwrap();
        assert_eq!(first.content, "<html>http://a.test/</html>");
        assert_eq!(first.source, Source::Miss);
        assert_eq!(first.access_count, Some(1));

        let second = page_handler(State(state), page("http://a.test/"))
            .await
            .unwrap();
        assert_eq!(second.source, Source::Hit);
        assert_eq!(second.access_count, Some(2));
    }

    #[tokio::test]
    async fn test_page_handler_fetch_failure() {
        let state = test_state();

        let result = page_handler(State(state.clone()), page("http://broken.test/")).await;
        assert!(matches!(result, Err(ApiError::FetchFailed(_))));

        // The failed call still counts
        let count = count_handler(State(state), page("http://broken.test/"))
            .await
            .unwrap();
        assert_eq!(count.access_count, 1);
    }

    #[tokio::test]
    async fn test_page_handler_invalid_url() {
        let state = test_state();

        let result = page_handler(State(state), page("")).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_count_handler_unknown_url() {
        let state = test_state();

        let count = count_handler(State(state), page("http://never.test/"))
            .await
            .unwrap();
        assert_eq!(count.access_count, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
