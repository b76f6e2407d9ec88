//! In-process Entry Store
//!
//! HashMap storage behind a single RwLock. Writers (counter bumps and payload
//! writes) take the exclusive lock; freshness reads share it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheEntry, Clock, EntryStore, SystemClock};
use crate::error::StoreError;

// == Memory Store ==
/// In-process entry store. Never fails.
#[derive(Debug)]
pub struct MemoryStore {
    /// Per-key entries, created lazily
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Time source for stamping and freshness checks
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    // == Entry Snapshot ==
    /// Returns a copy of the entry for `key`, if one was ever created.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }

    // == Length ==
    /// Returns the number of keys seen so far.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if no key has been seen yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn increment_count(&self, key: &str) -> Result<u64, StoreError> {
        let mut entries = self.entries.write().await;
        let count = entries
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new(key))
            .record_access();
        Ok(count)
    }

    async fn get_if_fresh(&self, key: &str, ttl: Duration) -> Result<Option<String>, StoreError> {
        let now = self.clock.now_ms();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .and_then(|entry| entry.fresh_value(ttl, now))
            .map(str::to_string))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = self.clock.now_ms();
        let mut entries = self.entries.write().await;
        entries
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new(key))
            .store(value, now);
        Ok(())
    }

    async fn access_count(&self, key: &str) -> Result<u64, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).map_or(0, |entry| entry.access_count))
    }
}
