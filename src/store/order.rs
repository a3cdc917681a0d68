//! Insertion Order Module
//!
//! Tracks the order in which keys were inserted so the store can evict the
//! oldest one. Reads never reorder keys: this is not an LRU.

use std::collections::BTreeMap;

// == Insertion Order ==
/// Oldest-first index of stored keys.
///
/// Every insertion draws a fresh, strictly increasing sequence number; the
/// smallest live sequence is the eviction candidate.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    /// Sequence number -> key
    order: BTreeMap<u64, String>,
    /// Next sequence number to hand out
    next_seq: u64,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Registers `key` as the newest insertion and returns its sequence.
    ///
    /// The caller must `remove` any previous sequence for the same key.
    pub fn push(&mut self, key: &str) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key.to_string());
        seq
    }

    // == Remove ==
    /// Forgets the insertion identified by `seq`.
    pub fn remove(&mut self, seq: u64) -> Option<String> {
        self.order.remove(&seq)
    }

    // == Pop Oldest ==
    /// Removes and returns the oldest inserted key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Peek Oldest ==
    /// Returns the oldest inserted key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.first_key_value().map(|(_, key)| key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
