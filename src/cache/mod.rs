//! Cache Module
//!
//! Entry stores holding per-key access counters and TTL-gated payloads, and the
//! decorator that composes a store around an arbitrary fetcher.

mod clock;
mod decorator;
mod entry;
mod memory;
mod remote;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use decorator::{wrap, Cacheable, Cached, CountPolicy, Fetched, Source};
pub use entry::{CacheEntry, Payload};
pub use memory::MemoryStore;
pub use remote::RedisStore;
pub use store::{connect, EntryStore, SharedStore};

// == Public Constants ==
/// Default freshness window in seconds
pub const DEFAULT_TTL_SECS: u64 = 10;
