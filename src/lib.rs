//! Page Cache - A memoizing fetch cache
//!
//! Wraps an expensive, idempotent fetch (such as an HTTP GET) with a TTL-gated
//! cache and a per-key access counter, backed by an in-process map or Redis.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;

pub use api::AppState;
pub use cache::{wrap, Cacheable, Cached, CountPolicy, EntryStore, Fetched, SharedStore, Source};
pub use config::Config;
pub use fetch::{fetch_fn, Fetcher, HttpFetcher};
