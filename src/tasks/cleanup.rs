//! Expiry Sweep Task
//!
//! Background task that periodically purges expired records. Reads already
//! ignore expired records; the sweep only returns their memory sooner.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::SharedStore;

/// Spawns a background task that periodically removes expired records.
///
/// The task runs in an infinite loop, sleeping for `interval` between runs
/// and holding the store's write lock only for the purge itself. `label`
/// names the store in log lines.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = shared(RecordStore::<CachedResponse>::new(1000));
/// let handle = spawn_cleanup_task(store.clone(), Duration::from_secs(60), "response_cache");
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(
    store: SharedStore<V>,
    interval: Duration,
    label: &'static str,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            store = label,
            interval_secs = interval.as_secs(),
            "starting expiry sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = store.write().await;
                guard.cleanup_expired()
            };

            if removed > 0 {
                info!(store = label, removed, "expiry sweep removed records");
            } else {
                debug!(store = label, "expiry sweep found nothing to remove");
            }
        }
    })
}
