//! Record Store Module
//!
//! Bounded map of keyed, time-limited records with lazy expiry and
//! oldest-insertion eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::store::stats::Counters;
use crate::store::{Clock, InsertionOrder, Record, StoreStats, SystemClock};

// == Record Store ==
/// Expiring record store with a fixed capacity.
///
/// All methods are synchronous and bounded; sharing across tasks goes through
/// [`SharedStore`](crate::store::SharedStore).
#[derive(Debug)]
pub struct RecordStore<V> {
    /// Key -> record
    entries: HashMap<String, Record<V>>,
    /// Insertion order for eviction
    order: InsertionOrder,
    /// Hit/miss/eviction counters
    counters: Counters,
    /// Maximum number of records
    capacity: usize,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Bumped by every explicit removal
    generation: u64,
}

impl<V: Clone> RecordStore<V> {
    // == Constructor ==
    /// Creates a store reading wall-clock time.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    /// Creates a store with an injected clock.
    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            counters: Counters::default(),
            capacity: capacity.max(1),
            clock,
            generation: 0,
        }
    }

    /// Current time according to the store's clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // == Put ==
    /// Inserts or replaces the record at `key`.
    ///
    /// A replaced key counts as a fresh insertion for eviction purposes. A
    /// brand-new key arriving at capacity evicts the oldest insertion first.
    pub fn put(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let now = self.clock.now_ms();

        if let Some(previous) = self.entries.remove(&key) {
            self.order.remove(previous.seq);
        } else if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_oldest() {
                self.entries.remove(&evicted);
                self.counters.evictions += 1;
                debug!(key = %evicted, "evicted oldest record");
            }
        }

        let seq = self.order.push(&key);
        self.entries.insert(key, Record::new(value, now, ttl, seq));
    }

    // == Get ==
    /// Returns the value at `key` if present and unexpired.
    ///
    /// An expired record is deleted on the way out. Reads never change the
    /// eviction order.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            Some(record) if !record.is_expired(now) => {
                self.counters.hits += 1;
                return Some(record.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove_entry(key);
            self.counters.expirations += 1;
            debug!(key, "lazily expired record");
        }
        self.counters.misses += 1;
        None
    }

    // == Contains ==
    /// Returns true if `key` holds a live record. Does not touch counters.
    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .is_some_and(|record| !record.is_expired(now))
    }

    // == Delete ==
    /// Removes the record at `key`. Returns whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.generation += 1;
        self.remove_entry(key).is_some()
    }

    // == Clear ==
    /// Removes every record and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.generation += 1;
        self.entries.clear();
        self.order.clear();
        count
    }

    // == Keys ==
    /// Snapshot of all stored keys, possibly including expired ones.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Remove Matching ==
    /// Removes every record whose key satisfies `pred`. Returns the count.
    pub fn remove_matching<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| pred(key))
            .cloned()
            .collect();

        self.generation += 1;
        for key in &doomed {
            self.remove_entry(key);
        }
        doomed.len()
    }

    // == Generation ==
    /// Counter advanced by every `delete`, `remove_matching` and `clear`,
    /// whether or not anything was removed. Expiry and eviction leave it alone.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // == Conditional Put ==
    /// Puts only if no explicit removal has happened since `generation` was
    /// read. Returns whether the value was stored.
    ///
    /// A writer that read [`generation`](Self::generation) before computing a
    /// value uses this so an invalidation issued meanwhile is not undone.
    pub fn put_if_generation(
        &mut self,
        key: impl Into<String>,
        value: V,
        ttl: Duration,
        generation: u64,
    ) -> bool {
        if self.generation != generation {
            return false;
        }
        self.put(key, value, ttl);
        true
    }

    // == Cleanup Expired ==
    /// Purges all expired records and returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let removed = self.remove_where(|record| record.is_expired(now));
        self.counters.expirations += removed as u64;
        removed
    }

    // == Stats ==
    /// Returns an occupancy and counter snapshot of live records.
    pub fn stats(&self) -> StoreStats {
        StoreStats::new(self.capacity, self.live_keys(), self.counters)
    }

    /// Keys whose records have not expired.
    pub fn live_keys(&self) -> Vec<String> {
        let now = self.clock.now_ms();
        self.entries
            .iter()
            .filter(|(_, record)| !record.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Length ==
    /// Returns the number of physically stored records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured maximum entry count.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn remove_entry(&mut self, key: &str) -> Option<Record<V>> {
        let record = self.entries.remove(key)?;
        self.order.remove(record.seq);
        Some(record)
    }

    fn remove_where<F>(&mut self, pred: F) -> usize
    where
        F: Fn(&Record<V>) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, record)| pred(record))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            self.remove_entry(key);
        }
        doomed.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ManualClock;

    const MINUTE: Duration = Duration::from_secs(60);

    fn store_with_clock(capacity: usize) -> (RecordStore<String>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let store = RecordStore::with_clock(capacity, Arc::new(clock.clone()));
        (store, clock)
    }

    fn sorted_keys<V: Clone>(store: &RecordStore<V>) -> Vec<String> {
        let mut keys = store.keys();
        keys.sort();
        keys
    }

    #[test]
    fn test_store_new() {
        let store: RecordStore<String> = RecordStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut store: RecordStore<u32> = RecordStore::new(0);
        assert_eq!(store.capacity(), 1);

        store.put("a", 1, MINUTE);
        store.put("b", 2, MINUTE);
        assert_eq!(store.keys(), vec!["b"]);
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = RecordStore::new(100);

        store.put("key1", "value1".to_string(), MINUTE);

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: RecordStore<String> = RecordStore::new(100);
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_delete() {
        let mut store = RecordStore::new(100);

        store.put("key1", "value1".to_string(), MINUTE);
        assert!(store.delete("key1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_delete_nonexistent() {
        let mut store: RecordStore<String> = RecordStore::new(100);
        assert!(!store.delete("nonexistent"));
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = RecordStore::new(100);

        store.put("key1", "value1".to_string(), MINUTE);
        store.put("key1", "value2".to_string(), MINUTE);

        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = store_with_clock(100);

        store.put("articles:p1:l10", "payload".to_string(), Duration::from_millis(600_000));
        assert_eq!(store.get("articles:p1:l10"), Some("payload".to_string()));

        clock.advance(Duration::from_millis(600_001));

        assert_eq!(store.get("articles:p1:l10"), None);
        assert!(store.keys().is_empty(), "expired key is dropped by get");
    }

    #[test]
    fn test_store_live_at_exact_ttl() {
        let (mut store, clock) = store_with_clock(100);

        store.put("k", "v".to_string(), Duration::from_millis(500));
        clock.advance(Duration::from_millis(500));

        assert_eq!(store.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_per_record_ttl() {
        let (mut store, clock) = store_with_clock(100);

        store.put("short", "a".to_string(), Duration::from_secs(1));
        store.put("long", "b".to_string(), Duration::from_secs(10));
        clock.advance(Duration::from_secs(5));

        assert_eq!(store.get("short"), None);
        assert_eq!(store.get("long"), Some("b".to_string()));
    }

    #[test]
    fn test_overwrite_resets_creation_time() {
        let (mut store, clock) = store_with_clock(100);

        store.put("k", "v1".to_string(), Duration::from_secs(10));
        clock.advance(Duration::from_secs(8));
        store.put("k", "v2".to_string(), Duration::from_secs(10));
        clock.advance(Duration::from_secs(8));

        assert_eq!(store.get("k"), Some("v2".to_string()));
    }

    #[test]
    fn test_capacity_evicts_oldest_insertion() {
        let mut store = RecordStore::new(2);

        store.put("a", 1, MINUTE);
        store.put("b", 2, MINUTE);
        store.put("c", 3, MINUTE);

        assert_eq!(sorted_keys(&store), vec!["b", "c"]);
    }

    #[test]
    fn test_get_does_not_protect_from_eviction() {
        let mut store = RecordStore::new(3);

        store.put("key1", 1, MINUTE);
        store.put("key2", 2, MINUTE);
        store.put("key3", 3, MINUTE);

        // Reading key1 does not make it newer
        assert_eq!(store.get("key1"), Some(1));

        store.put("key4", 4, MINUTE);

        assert_eq!(store.get("key1"), None);
        assert_eq!(store.get("key2"), Some(2));
    }

    #[test]
    fn test_reinsert_counts_as_new_insertion() {
        let mut store = RecordStore::new(3);

        store.put("key1", 1, MINUTE);
        store.put("key2", 2, MINUTE);
        store.put("key3", 3, MINUTE);
        store.put("key1", 10, MINUTE);

        store.put("key4", 4, MINUTE);

        assert_eq!(sorted_keys(&store), vec!["key1", "key3", "key4"]);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let mut store = RecordStore::new(2);

        store.put("a", 1, MINUTE);
        store.put("b", 2, MINUTE);
        store.put("a", 3, MINUTE);

        assert_eq!(sorted_keys(&store), vec!["a", "b"]);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_delete_frees_capacity() {
        let mut store = RecordStore::new(2);

        store.put("a", 1, MINUTE);
        store.put("b", 2, MINUTE);
        store.delete("a");
        store.put("c", 3, MINUTE);

        assert_eq!(sorted_keys(&store), vec!["b", "c"]);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_clear() {
        let mut store = RecordStore::new(10);

        store.put("a", 1, MINUTE);
        store.put("b", 2, MINUTE);

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());

        // Order bookkeeping is reset too
        store.put("c", 3, MINUTE);
        assert_eq!(store.keys(), vec!["c"]);
    }

    #[test]
    fn test_keys_include_expired_until_purged() {
        let (mut store, clock) = store_with_clock(10);

        store.put("k", "v".to_string(), Duration::from_secs(1));
        clock.advance(Duration::from_secs(2));

        assert_eq!(store.keys(), vec!["k"]);
        assert!(!store.contains("k"));
    }

    #[test]
    fn test_remove_matching() {
        let mut store = RecordStore::new(10);

        store.put("blog:articles:1:10", 1, MINUTE);
        store.put("blog:categories:all", 2, MINUTE);
        store.put("projects:1:10", 3, MINUTE);

        let removed = store.remove_matching(|key| key.starts_with("blog:"));

        assert_eq!(removed, 2);
        assert_eq!(store.keys(), vec!["projects:1:10"]);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let (mut store, clock) = store_with_clock(100);

        store.put("key1", "value1".to_string(), Duration::from_secs(1));
        store.put("key2", "value2".to_string(), Duration::from_secs(10));
        clock.advance(Duration::from_secs(2));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key2"), Some("value2".to_string()));
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_stats() {
        let mut store = RecordStore::new(2);

        store.put("key1", 1, MINUTE);
        store.get("key1"); // hit
        store.get("nonexistent"); // miss
        store.put("key2", 2, MINUTE);
        store.put("key3", 3, MINUTE); // evicts key1

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.capacity, 2);
        assert_eq!(stats.keys, vec!["key2", "key3"]);
    }

    #[test]
    fn test_stats_report_live_keys_only() {
        let (mut store, clock) = store_with_clock(10);

        store.put("short", "v".to_string(), Duration::from_secs(1));
        store.put("long", "v".to_string(), MINUTE);
        clock.advance(Duration::from_secs(2));

        let stats = store.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.keys, vec!["long"]);
        // Still physically present until read or swept
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_generation_advances_on_explicit_removal() {
        let mut store = RecordStore::new(10);
        let start = store.generation();

        store.put("a", 1, MINUTE);
        store.get("a");
        assert_eq!(store.generation(), start);

        // Advances even when nothing matched
        store.remove_matching(|key| key.starts_with("blog:"));
        assert_eq!(store.generation(), start + 1);

        store.delete("missing");
        store.clear();
        assert_eq!(store.generation(), start + 3);
    }

    #[test]
    fn test_eviction_and_expiry_keep_generation() {
        let (mut store, clock) = store_with_clock(1);
        let start = store.generation();

        store.put("a", "1".to_string(), Duration::from_secs(1));
        store.put("b", "2".to_string(), Duration::from_secs(1)); // evicts a
        clock.advance(Duration::from_secs(2));
        store.get("b");
        store.cleanup_expired();

        assert_eq!(store.generation(), start);
    }

    #[test]
    fn test_put_if_generation() {
        let mut store = RecordStore::new(10);

        let seen = store.generation();
        assert!(store.put_if_generation("fresh", 1, MINUTE, seen));
        assert_eq!(store.get("fresh"), Some(1));

        let seen = store.generation();
        store.remove_matching(|key| key.starts_with("blog:"));
        assert!(!store.put_if_generation("stale", 2, MINUTE, seen));
        assert!(!store.contains("stale"));
    }
}
