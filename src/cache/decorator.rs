//! Cache Decorator Module
//!
//! Wraps any [`Fetcher`] with the entry store: count the access, serve a fresh
//! cached value if there is one, otherwise fetch and remember the result.
//!
//! The decorator holds no state of its own. Two decorators built over the same
//! store see each other's writes, and the inner fetch runs without any cache
//! lock held, so concurrent callers for a cold key may each fetch it.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::SharedStore;
use crate::error::StoreError;
use crate::fetch::Fetcher;

// == Count Policy ==
/// When a call bumps the access counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountPolicy {
    /// Every call is an access, hit or miss
    #[default]
    EveryCall,
    /// Only calls that miss the cache are counted
    MissOnly,
}

impl FromStr for CountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "every_call" | "every-call" | "always" => Ok(CountPolicy::EveryCall),
            "miss_only" | "miss-only" | "miss" => Ok(CountPolicy::MissOnly),
            other => Err(format!("unknown count policy '{}'", other)),
        }
    }
}

// == Source ==
/// How a value was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Served from a fresh cached payload
    Hit,
    /// Fetched and stored
    Miss,
    /// Fetched directly because the store failed; nothing was cached
    Bypass,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Hit => "hit",
            Source::Miss => "miss",
            Source::Bypass => "bypass",
        }
    }
}

/// A value along with how it was served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub value: String,
    pub source: Source,
    /// Counter value recorded by this call's own increment, if it made one
    pub access_count: Option<u64>,
}

impl Fetched {
    fn new(value: String, source: Source, access_count: Option<u64>) -> Self {
        Self {
            value,
            source,
            access_count,
        }
    }
}

// == Cached ==
/// A fetcher wrapped with TTL caching and access counting.
///
/// Implements [`Fetcher`] itself with the inner fetcher's error type, so it
/// drops in wherever the raw fetcher was used.
#[derive(Debug, Clone)]
pub struct Cached<F> {
    inner: F,
    store: SharedStore,
    ttl: Duration,
    policy: CountPolicy,
}

/// Wraps `fetch` so it consults `store` before and after every call.
pub fn wrap<F: Fetcher>(fetch: F, store: SharedStore, ttl: Duration) -> Cached<F> {
    Cached::new(fetch, store, ttl)
}

/// Extension for wrapping any fetcher in method position.
pub trait Cacheable: Fetcher + Sized {
    fn cached(self, store: SharedStore, ttl: Duration) -> Cached<Self> {
        Cached::new(self, store, ttl)
    }
}

impl<F: Fetcher> Cacheable for F {}

impl<F: Fetcher> Cached<F> {
    // == Constructor ==
    pub fn new(inner: F, store: SharedStore, ttl: Duration) -> Self {
        Self {
            inner,
            store,
            ttl,
            policy: CountPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CountPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn policy(&self) -> CountPolicy {
        self.policy
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    // == Access Count ==
    /// Current access counter for `key`, without side effects.
    pub async fn access_count(&self, key: &str) -> Result<u64, StoreError> {
        self.store.access_count(key).await
    }

    // == Fetch Traced ==
    /// Like [`Fetcher::fetch`], but also reports whether the value was a hit,
    /// a miss, or fetched around an unavailable store.
    ///
    /// Fetch errors are returned unchanged and never cached. Store errors are
    /// never returned: the call falls through to the inner fetcher and the
    /// result is reported as [`Source::Bypass`].
    pub async fn fetch_traced(&self, key: &str) -> Result<Fetched, F::Error> {
        let mut counted = None;
        if self.policy == CountPolicy::EveryCall {
            match self.store.increment_count(key).await {
                Ok(count) => counted = Some(count),
                Err(err) => return self.bypass(key, err, None).await,
            }
        }

        let cached = match self.store.get_if_fresh(key, self.ttl).await {
            Ok(cached) => cached,
            Err(err) => return self.bypass(key, err, counted).await,
        };
        if let Some(value) = cached {
            debug!(key, "Cache hit");
            return Ok(Fetched::new(value, Source::Hit, counted));
        }

        if self.policy == CountPolicy::MissOnly {
            match self.store.increment_count(key).await {
                Ok(count) => counted = Some(count),
                Err(err) => return self.bypass(key, err, None).await,
            }
        }

        debug!(key, "Cache miss, fetching");
        let value = self.fetch_inner(key).await?;

        match self.store.put(key, &value).await {
            Ok(()) => Ok(Fetched::new(value, Source::Miss, counted)),
            Err(err) => {
                warn!(key, error = %err, "Entry store write failed, result not cached");
                Ok(Fetched::new(value, Source::Bypass, counted))
            }
        }
    }

    async fn bypass(
        &self,
        key: &str,
        err: StoreError,
        counted: Option<u64>,
    ) -> Result<Fetched, F::Error> {
        warn!(key, error = %err, "Entry store unavailable, fetching without cache");
        let value = self.fetch_inner(key).await?;
        Ok(Fetched::new(value, Source::Bypass, counted))
    }

    async fn fetch_inner(&self, key: &str) -> Result<String, F::Error> {
        let result = self.inner.fetch(key).await;
        if result.is_err() {
            debug!(key, "Fetch failed, nothing cached");
        }
        result
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for Cached<F> {
    type Error = F::Error;

    async fn fetch(&self, key: &str) -> Result<String, F::Error> {
        self.fetch_traced(key).await.map(|fetched| fetched.value)
    }
}
