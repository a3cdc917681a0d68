//! Login Guard Module
//!
//! Tracks consecutive failed verifications per client and locks a client out
//! once it reaches the configured threshold.
//!
//! Per-client states:
//! - clean: no record
//! - accumulating: record with `failure_count < threshold`
//! - locked: `failure_count >= threshold` and `now < locked_until`
//!
//! A success from any state deletes the record. After a lockout runs out the
//! counter is kept, so the next failure locks again straight away, unless
//! `reset_on_unlock` is set.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::guard::{AttemptError, AttemptRecord, FailureOutcome, GuardPolicy, GuardStatus};
use crate::store::{SharedStore, StoreStats};

// == Login Guard ==
/// Per-client lockout bookkeeping over a shared record store.
#[derive(Debug, Clone)]
pub struct LoginGuard {
    store: SharedStore<AttemptRecord>,
    policy: GuardPolicy,
}

impl LoginGuard {
    pub fn new(store: SharedStore<AttemptRecord>, policy: GuardPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// The underlying store handle.
    pub fn store(&self) -> &SharedStore<AttemptRecord> {
        &self.store
    }

    // == Check ==
    /// Reports whether `client` may attempt verification right now.
    pub async fn check(&self, client: &str) -> GuardStatus {
        let mut store = self.store.write().await;
        let now = store.now_ms();
        match store.get(client) {
            Some(record) if record.is_locked(now) => GuardStatus::Locked {
                retry_after: record.retry_after(now),
            },
            Some(record) => GuardStatus::Allowed {
                failures: record.failure_count,
            },
            None => GuardStatus::Allowed { failures: 0 },
        }
    }

    // == Record Failure ==
    /// Counts one failed verification from `client`.
    ///
    /// A failure reported while the client is still locked changes nothing.
    pub async fn record_failure(&self, client: &str) -> FailureOutcome {
        let mut store = self.store.write().await;
        let now = store.now_ms();

        let mut record = match store.get(client) {
            Some(record) if record.is_locked(now) => {
                return FailureOutcome::Locked {
                    failures: record.failure_count,
                    retry_after: record.retry_after(now),
                };
            }
            Some(record) if self.policy.reset_on_unlock && record.lockout_elapsed(now) => {
                debug!(client, "lockout elapsed, restarting failure count");
                AttemptRecord::default()
            }
            Some(record) => record,
            None => AttemptRecord::default(),
        };

        record.failure_count = record.failure_count.saturating_add(1);
        record.last_failure_at = now;

        let threshold = self.policy.threshold();
        let outcome = if record.failure_count >= threshold {
            let lockout_ms = self.policy.lockout.as_millis() as u64;
            record.locked_until = Some(now.saturating_add(lockout_ms));
            info!(
                client,
                failures = record.failure_count,
                lockout_secs = self.policy.lockout.as_secs(),
                "client locked out"
            );
            FailureOutcome::Locked {
                failures: record.failure_count,
                retry_after: self.policy.lockout,
            }
        } else {
            debug!(client, failures = record.failure_count, "failed verification");
            FailureOutcome::Accumulating {
                failures: record.failure_count,
                remaining: threshold - record.failure_count,
            }
        };

        store.put(client, record, self.policy.effective_record_ttl());
        outcome
    }

    // == Record Success ==
    /// Forgets `client` entirely. Returns whether a record existed.
    pub async fn record_success(&self, client: &str) -> bool {
        let cleared = self.store.write().await.delete(client);
        if cleared {
            debug!(client, "cleared failure record after success");
        }
        cleared
    }

    // == Attempt ==
    /// Runs `verify` for `client` under the guard.
    ///
    /// A locked-out client is refused without calling `verify`. Otherwise a
    /// rejection is counted and an accepted identity clears the record.
    pub async fn attempt<F, Fut, T, E>(&self, client: &str, verify: F) -> Result<T, AttemptError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let GuardStatus::Locked { retry_after } = self.check(client).await {
            warn!(
                client,
                retry_after_secs = retry_after.as_secs(),
                "rejected attempt from locked-out client"
            );
            return Err(AttemptError::Locked { retry_after });
        }

        match verify().await {
            Ok(identity) => {
                self.record_success(client).await;
                Ok(identity)
            }
            Err(reason) => {
                let outcome = self.record_failure(client).await;
                Err(AttemptError::Rejected { reason, outcome })
            }
        }
    }

    /// Snapshot of the attempt record for `client`, if live.
    pub async fn record_for(&self, client: &str) -> Option<AttemptRecord> {
        self.store.write().await.get(client)
    }

    pub async fn stats(&self) -> StoreStats {
        self.store.read().await.stats()
    }
}
