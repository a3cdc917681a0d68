//! Invalidation Module
//!
//! Drops cached entries after writes. Each call finishes under a single
//! write-lock acquisition, so a handler that awaits it before responding
//! guarantees the next read in this process misses.

use tracing::info;

use crate::cache::CachedResponse;
use crate::store::SharedStore;

// == Invalidator ==
/// Removes cache entries by key, prefix, substring, or wholesale.
#[derive(Debug, Clone)]
pub struct Invalidator {
    store: SharedStore<CachedResponse>,
}

impl Invalidator {
    pub fn new(store: SharedStore<CachedResponse>) -> Self {
        Self { store }
    }

    /// Removes exactly `key`. Returns whether it was present.
    pub async fn invalidate_exact(&self, key: &str) -> bool {
        let removed = self.store.write().await.delete(key);
        info!(key, removed, "invalidated cache key");
        removed
    }

    /// Removes every key starting with `prefix`.
    pub async fn invalidate_by_prefix(&self, prefix: &str) -> usize {
        let removed = self
            .store
            .write()
            .await
            .remove_matching(|key| key.starts_with(prefix));
        info!(prefix, removed, "invalidated cache prefix");
        removed
    }

    /// Removes every key containing `pattern`.
    pub async fn invalidate_by_pattern(&self, pattern: &str) -> usize {
        let removed = self
            .store
            .write()
            .await
            .remove_matching(|key| key.contains(pattern));
        info!(pattern, removed, "invalidated cache pattern");
        removed
    }

    /// Empties the cache.
    pub async fn invalidate_all(&self) -> usize {
        let removed = self.store.write().await.clear();
        info!(removed, "invalidated entire cache");
        removed
    }
}
