//! Cache Entry Module
//!
//! Defines the per-key record: an access counter plus an optional payload
//! stamped with the time it was written.

use std::time::Duration;

// == Payload ==
/// A fetched value together with the time it was stored.
///
/// Value and timestamp only ever travel together, so a reader can never see
/// one without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// The last fetched value
    pub value: String,
    /// Write timestamp (Unix milliseconds)
    pub stored_at: u64,
}

impl Payload {
    /// Age of the payload at `now_ms`. A timestamp in the future counts as age zero.
    pub fn age(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.stored_at))
    }

    /// Whether the payload is still usable at `now_ms`.
    ///
    /// Fresh means strictly younger than the TTL: once the full TTL has
    /// elapsed the payload is stale.
    pub fn is_fresh(&self, ttl: Duration, now_ms: u64) -> bool {
        self.age(now_ms) < ttl
    }
}

// == Cache Entry ==
/// Cached state for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The identifier, e.g. a URL
    pub key: String,
    /// Last successful fetch, absent until the first one
    pub payload: Option<Payload>,
    /// Number of logical accesses recorded for this key
    pub access_count: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an empty entry: no payload, zero accesses.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            payload: None,
            access_count: 0,
        }
    }

    // == Record Access ==
    /// Bumps the access counter and returns the new count.
    pub fn record_access(&mut self) -> u64 {
        self.access_count = self.access_count.saturating_add(1);
        self.access_count
    }

    // == Store ==
    /// Replaces the payload, stamping it with `now_ms`. The counter is untouched.
    pub fn store(&mut self, value: impl Into<String>, now_ms: u64) {
        self.payload = Some(Payload {
            value: value.into(),
            stored_at: now_ms,
        });
    }

    // == Fresh Value ==
    /// Returns the payload value if present and still fresh at `now_ms`.
    pub fn fresh_value(&self, ttl: Duration, now_ms: u64) -> Option<&str> {
        self.payload
            .as_ref()
            .filter(|payload| payload.is_fresh(ttl, now_ms))
            .map(|payload| payload.value.as_str())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(10);

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("http://example.com");

        assert_eq!(entry.key, "http://example.com");
        assert!(entry.payload.is_none());
        assert_eq!(entry.access_count, 0);
        assert!(entry.fresh_value(TTL, 0).is_none());
    }

    #[test]
    fn test_record_access_increments() {
        let mut entry = CacheEntry::new("k");

        assert_eq!(entry.record_access(), 1);
        assert_eq!(entry.record_access(), 2);
        assert_eq!(entry.access_count, 2);
    }

    #[test]
    fn test_store_keeps_counter() {
        let mut entry = CacheEntry::new("k");
        entry.record_access();

        entry.store("body", 1_000);

        assert_eq!(entry.access_count, 1);
        assert_eq!(
            entry.payload,
            Some(Payload {
                value: "body".to_string(),
                stored_at: 1_000
            })
        );
    }

    #[test]
    fn test_fresh_within_ttl() {
        let mut entry = CacheEntry::new("k");
        entry.store("body", 1_000);

        assert_eq!(entry.fresh_value(TTL, 1_000), Some("body"));
        assert_eq!(entry.fresh_value(TTL, 10_999), Some("body"));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let mut entry = CacheEntry::new("k");
        entry.store("body", 1_000);

        // Exactly TTL old is already stale
        assert!(entry.fresh_value(TTL, 11_000).is_none());
        assert!(entry.fresh_value(TTL, 50_000).is_none());
    }

    #[test]
    fn test_future_timestamp_counts_as_fresh() {
        let payload = Payload {
            value: "body".to_string(),
            stored_at: 5_000,
        };

        assert_eq!(payload.age(1_000), Duration::ZERO);
        assert!(payload.is_fresh(TTL, 1_000));
    }

    #[test]
    fn test_overwrite_restamps() {
        let mut entry = CacheEntry::new("k");
        entry.store("old", 0);
        entry.store("new", 20_000);

        assert_eq!(entry.fresh_value(TTL, 25_000), Some("new"));
    }

    #[test]
    fn test_empty_value_is_cached() {
        let mut entry = CacheEntry::new("k");
        entry.store("", 0);

        assert_eq!(entry.fresh_value(TTL, 1), Some(""));
    }
}
