//! Entry Store Module
//!
//! The contract every backend satisfies, and backend selection from config.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::cache::{MemoryStore, RedisStore, SystemClock};
use crate::config::{Backend, Config};
use crate::error::StoreError;

// == Entry Store ==
/// Atomic, thread-safe access to per-key cache entries.
///
/// Counter updates and payload writes for one key never interleave into a
/// torn entry: a payload is always observed together with its timestamp.
#[async_trait]
pub trait EntryStore: Send + Sync + std::fmt::Debug {
    /// Creates the entry if absent, bumps its access counter, and returns the
    /// new count. Concurrent callers never lose an increment.
    async fn increment_count(&self, key: &str) -> Result<u64, StoreError>;

    /// Returns the stored value if one exists and is younger than `ttl`.
    /// Never mutates state.
    async fn get_if_fresh(&self, key: &str, ttl: Duration) -> Result<Option<String>, StoreError>;

    /// Creates or overwrites the payload for `key`, stamped with the current
    /// time. Leaves the access counter alone.
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Current access counter for `key`, zero for unknown keys. No side effects.
    async fn access_count(&self, key: &str) -> Result<u64, StoreError>;
}

/// Store handle shared between decorators and handlers.
pub type SharedStore = Arc<dyn EntryStore>;

// == Connect ==
/// Builds the store selected by `config.backend`.
///
/// The external backend connects lazily, so an unreachable server does not
/// fail startup; only a malformed endpoint does.
pub fn connect(config: &Config) -> Result<SharedStore, StoreError> {
    match config.backend {
        Backend::InProcess => {
            info!("Using in-process entry store");
            Ok(Arc::new(MemoryStore::new()))
        }
        Backend::External => {
            info!(endpoint = %config.endpoint, "Using external entry store");
            let store = RedisStore::new(&config.endpoint, Arc::new(SystemClock))?
                .with_connect_timeout(config.store_connect_timeout())
                .with_response_timeout(config.store_response_timeout());
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_in_process() {
        let store = connect(&Config::default()).unwrap();

        assert_eq!(store.increment_count("a").await.unwrap(), 1);
        assert_eq!(store.access_count("a").await.unwrap(), 1);
    }

    #[test]
    fn test_connect_external_rejects_bad_endpoint() {
        let config = Config {
            backend: Backend::External,
            endpoint: "not a url".to_string(),
            ..Config::default()
        };

        let result = connect(&config);
        assert!(matches!(result, Err(StoreError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_connect_external_is_lazy() {
        let config = Config {
            backend: Backend::External,
            endpoint: "redis://127.0.0.1:1/".to_string(),
            ..Config::default()
        };

        assert!(connect(&config).is_ok());
    }
}
