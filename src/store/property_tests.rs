//! Property-Based Tests for the Record Store
//!
//! Drives the store with random operation sequences and compares it against a
//! plain insertion-ordered model.

use proptest::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use crate::store::{ManualClock, RecordStore};

// == Test Configuration ==
const LONG_TTL: Duration = Duration::from_secs(3600);

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,2}"
}

fn value_strategy() -> impl Strategy<Value = u32> {
    any::<u32>()
}

#[derive(Debug, Clone)]
enum StoreOp {
    Put { key: String, value: u32 },
    Get { key: String },
    Delete { key: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| StoreOp::Put { key, value }),
        2 => key_strategy().prop_map(|key| StoreOp::Get { key }),
        1 => key_strategy().prop_map(|key| StoreOp::Delete { key }),
    ]
}

// == Reference Model ==
/// Insertion-ordered map with oldest-first eviction.
#[derive(Debug, Default)]
struct Model {
    values: HashMap<String, u32>,
    order: VecDeque<String>,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    fn put(&mut self, key: String, value: u32) {
        if self.values.contains_key(&key) {
            self.order.retain(|k| k != &key);
        } else if self.values.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.values.remove(&oldest);
                self.evictions += 1;
            }
        }
        self.order.push_back(key.clone());
        self.values.insert(key, value);
    }

    fn get(&mut self, key: &str) -> Option<u32> {
        let found = self.values.get(key).copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    fn delete(&mut self, key: &str) -> bool {
        self.order.retain(|k| k != key);
        self.values.remove(key).is_some()
    }

    fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        keys.sort();
        keys
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every read, delete and eviction agrees with the insertion-ordered model.
    #[test]
    fn prop_matches_insertion_order_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(store_op_strategy(), 1..80)
    ) {
        let mut store = RecordStore::with_clock(capacity, Arc::new(ManualClock::new(0)));
        let mut model = Model::new(capacity);

        for op in ops {
            match op {
                StoreOp::Put { key, value } => {
                    store.put(key.clone(), value, LONG_TTL);
                    model.put(key, value);
                }
                StoreOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key));
                }
                StoreOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), model.delete(&key));
                }
            }

            let mut keys = store.keys();
            keys.sort();
            prop_assert_eq!(keys, model.sorted_keys());
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, model.hits);
        prop_assert_eq!(stats.misses, model.misses);
        prop_assert_eq!(stats.evictions, model.evictions);
    }

    // The store never holds more records than its capacity.
    #[test]
    fn prop_capacity_bound(
        capacity in 1usize..20,
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..120)
    ) {
        let mut store = RecordStore::new(capacity);

        for (key, value) in entries {
            store.put(key, value, LONG_TTL);
            prop_assert!(
                store.len() <= capacity,
                "store size {} exceeds capacity {}",
                store.len(),
                capacity
            );
        }
    }

    // A value put under a fresh TTL reads back unchanged.
    #[test]
    fn prop_get_after_put(key in key_strategy(), value in value_strategy()) {
        let mut store = RecordStore::new(8);
        store.put(key.clone(), value, LONG_TTL);
        prop_assert_eq!(store.get(&key), Some(value));
    }

    // A re-put key moves behind every other key in the eviction queue.
    #[test]
    fn prop_reput_is_evicted_last(capacity in 2usize..8, reput_index in 0usize..8) {
        let reput_index = reput_index % capacity;
        let mut store = RecordStore::new(capacity);

        for i in 0..capacity {
            store.put(format!("k{i}"), i as u32, LONG_TTL);
        }
        let reput = format!("k{reput_index}");
        store.put(reput.clone(), 99, LONG_TTL);

        // Push every other original key out
        for i in 0..capacity - 1 {
            store.put(format!("fresh{i}"), 0, LONG_TTL);
        }

        prop_assert!(store.contains(&reput));
        prop_assert_eq!(store.get(&reput), Some(99));
        prop_assert_eq!(store.len(), capacity);
    }

    // Records live through exactly `ttl` and are gone one millisecond later.
    #[test]
    fn prop_strict_expiry_boundary(
        key in key_strategy(),
        ttl_ms in 1u64..1_000_000,
        start in 0u64..1_000_000
    ) {
        let clock = ManualClock::new(start);
        let mut store = RecordStore::with_clock(4, Arc::new(clock.clone()));
        store.put(key.clone(), 1u32, Duration::from_millis(ttl_ms));

        clock.advance(Duration::from_millis(ttl_ms));
        prop_assert_eq!(store.get(&key), Some(1));

        clock.advance(Duration::from_millis(1));
        prop_assert_eq!(store.get(&key), None);
        prop_assert!(store.is_empty());
        prop_assert_eq!(store.stats().expirations, 1);
    }
}
