//! Fetch Module
//!
//! The capability the cache wraps: turn a key into a value, possibly slowly.

mod http;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

pub use http::HttpFetcher;

// == Fetcher ==
/// An expensive, idempotent lookup keyed by a string identifier.
///
/// Implementations must be safe to call repeatedly and concurrently for the
/// same key.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Error produced by a failed fetch
    type Error: Send + 'static;

    async fn fetch(&self, key: &str) -> Result<String, Self::Error>;
}

#[async_trait]
impl<F> Fetcher for Arc<F>
where
    F: Fetcher + ?Sized,
{
    type Error = F::Error;

    async fn fetch(&self, key: &str) -> Result<String, Self::Error> {
        (**self).fetch(key).await
    }
}

// == Closure Adapter ==
/// Fetcher backed by an async closure. Built with [`fetch_fn`].
#[derive(Clone)]
pub struct FnFetcher<F> {
    f: F,
}

/// Turns `|key: String| async move { ... }` into a [`Fetcher`].
pub fn fetch_fn<F, Fut, E>(f: F) -> FnFetcher<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, E>> + Send + 'static,
    E: Send + 'static,
{
    FnFetcher { f }
}

#[async_trait]
impl<F, Fut, E> Fetcher for FnFetcher<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, E>> + Send + 'static,
    E: Send + 'static,
{
    type Error = E;

    async fn fetch(&self, key: &str) -> Result<String, E> {
        (self.f)(key.to_string()).await
    }
}

impl<F> std::fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_fn_passes_key() {
        let fetcher = fetch_fn(|key: String| async move { Ok::<_, ()>(key.to_uppercase()) });

        assert_eq!(fetcher.fetch("abc").await, Ok("ABC".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_fn_propagates_error() {
        let fetcher = fetch_fn(|key: String| async move { Err::<String, _>(format!("no {}", key)) });

        assert_eq!(fetcher.fetch("abc").await, Err("no abc".to_string()));
    }

    #[tokio::test]
    async fn test_arc_dyn_fetcher() {
        let fetcher: Arc<dyn Fetcher<Error = ()>> =
            Arc::new(fetch_fn(|_key: String| async move { Ok::<_, ()>("v".to_string()) }));

        assert_eq!(fetcher.fetch("k").await, Ok("v".to_string()));
    }
}
