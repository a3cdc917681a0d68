//! Store Statistics Module
//!
//! Occupancy snapshot plus hit/miss/eviction/expiry counters, reported by
//! diagnostic endpoints.

use serde::Serialize;

// == Counters ==
/// Running counters kept by a store.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

// == Store Stats ==
/// Point-in-time view of a store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Live records
    pub entries: usize,
    /// Configured maximum entry count
    pub capacity: usize,
    /// Sorted snapshot of live keys
    pub keys: Vec<String>,
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups that found nothing or an expired record
    pub misses: u64,
    /// Records dropped to stay within capacity
    pub evictions: u64,
    /// Records purged because their TTL elapsed
    pub expirations: u64,
}

impl StoreStats {
    pub(crate) fn new(
        capacity: usize,
        mut keys: Vec<String>,
        counters: Counters,
    ) -> Self {
        keys.sort();
        Self {
            entries: keys.len(),
            capacity,
            keys,
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            expirations: counters.expirations,
        }
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
