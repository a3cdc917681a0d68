//! Record Module
//!
//! Defines the unit of storage: a value stamped with its insertion time and
//! its own time-to-live.

use std::time::Duration;

// == Record ==
/// A stored value with TTL metadata.
#[derive(Debug, Clone)]
pub struct Record<V> {
    /// The stored value
    pub value: V,
    /// Insertion timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Lifetime in milliseconds, counted from `created_at`
    pub ttl_ms: u64,
    /// Insertion sequence number used for eviction ordering
    pub(crate) seq: u64,
}

impl<V> Record<V> {
    // == Constructor ==
    /// Creates a record stamped at `now_ms`.
    pub fn new(value: V, now_ms: u64, ttl: Duration, seq: u64) -> Self {
        Self {
            value,
            created_at: now_ms,
            ttl_ms: ttl.as_millis() as u64,
            seq,
        }
    }

    // == Is Expired ==
    /// Checks if the record has outlived its TTL at `now_ms`.
    ///
    /// Expiry is strict: at exactly `ttl` elapsed the record is still live,
    /// one millisecond later it is gone.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at) > self.ttl_ms
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now_ms`, zero once expired.
    pub fn ttl_remaining(&self, now_ms: u64) -> Duration {
        let deadline = self.created_at.saturating_add(self.ttl_ms);
        Duration::from_millis(deadline.saturating_sub(now_ms))
    }
}
