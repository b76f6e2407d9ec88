//! API Routes
//!
//! Configures the Axum router with all page cache endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{count_handler, health_handler, page_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /page?url=...` - Fetch a page through the cache
/// - `GET /count?url=...` - Read the access counter for a page
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/page", get(page_handler))
        .route("/count", get(count_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::config::Config;
    use crate::error::FetchError;
    use crate::fetch::fetch_fn;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let fetcher = fetch_fn(|url: String| async move { Ok::<_, FetchError>(url) });
        let state = AppState::from_config(fetcher, Arc::new(MemoryStore::new()), &Config::default());
        create_router(state)
    }

    async fn get_status(uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(get_status("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_page_endpoint() {
        assert_eq!(
            get_status("/page?url=http%3A%2F%2Fa.test%2F").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_page_missing_query() {
        assert_eq!(get_status("/page").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_count_endpoint() {
        assert_eq!(
            get_status("/count?url=http%3A%2F%2Fa.test%2F").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(get_status("/set").await, StatusCode::NOT_FOUND);
    }
}
