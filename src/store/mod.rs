//! Store Module
//!
//! Expiring record store shared by the response cache and the login guard.

mod clock;
mod order;
mod record;
mod record_store;
mod stats;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use order::InsertionOrder;
pub use record::Record;
pub use record_store::RecordStore;
pub use stats::StoreStats;

/// Handle to a store shared between request tasks.
///
/// Lookups take the write lock too, since lazy expiry may delete.
pub type SharedStore<V> = Arc<RwLock<RecordStore<V>>>;

/// Wraps a store in a [`SharedStore`] handle.
pub fn shared<V>(store: RecordStore<V>) -> SharedStore<V> {
    Arc::new(RwLock::new(store))
}
