//! Attempt Record Module
//!
//! Per-client failure bookkeeping and the outcomes the guard reports.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

// == Attempt Record ==
/// Consecutive failed verifications from one client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    /// Failures since the last success
    pub failure_count: u32,
    /// Time of the latest failure (Unix milliseconds)
    pub last_failure_at: u64,
    /// End of the current or most recent lockout (Unix milliseconds)
    pub locked_until: Option<u64>,
}

impl AttemptRecord {
    /// True while `now_ms` is before the lockout deadline.
    pub fn is_locked(&self, now_ms: u64) -> bool {
        self.locked_until.is_some_and(|until| now_ms < until)
    }

    /// True once a lockout has been imposed and has run out.
    pub fn lockout_elapsed(&self, now_ms: u64) -> bool {
        self.locked_until.is_some_and(|until| now_ms >= until)
    }

    /// Time left on the lockout, zero if not locked.
    pub fn retry_after(&self, now_ms: u64) -> Duration {
        self.locked_until
            .map(|until| Duration::from_millis(until.saturating_sub(now_ms)))
            .unwrap_or_default()
    }
}

// == Guard Status ==
/// Result of checking a client before verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    /// Verification may proceed
    Allowed { failures: u32 },
    /// Client is locked out
    Locked { retry_after: Duration },
}

impl GuardStatus {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardStatus::Allowed { .. })
    }
}

// == Failure Outcome ==
/// State of a client after a failure was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Still below the threshold
    Accumulating { failures: u32, remaining: u32 },
    /// Threshold reached; further attempts are refused until `retry_after`
    Locked { failures: u32, retry_after: Duration },
}

// == Attempt Error ==
/// Why a guarded verification did not produce an identity.
///
/// A lockout is kept distinct from a credential rejection so callers can
/// answer "too many attempts" rather than "wrong password".
#[derive(Debug, Error)]
pub enum AttemptError<E> {
    /// Refused without consulting the credential check
    #[error("too many failed attempts, retry in {}s", whole_secs(.retry_after))]
    Locked { retry_after: Duration },

    /// The credential check rejected the attempt
    #[error("verification rejected")]
    Rejected { reason: E, outcome: FailureOutcome },
}

/// Whole seconds to wait, rounded up so a client never retries early.
pub fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs();
    if retry_after.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

fn whole_secs(retry_after: &Duration) -> u64 {
    retry_after_secs(*retry_after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_window() {
        let record = AttemptRecord {
            failure_count: 5,
            last_failure_at: 1_000,
            locked_until: Some(2_000),
        };

        assert!(record.is_locked(1_999));
        assert!(!record.is_locked(2_000));
        assert!(!record.lockout_elapsed(1_999));
        assert!(record.lockout_elapsed(2_000));
        assert_eq!(record.retry_after(1_500), Duration::from_millis(500));
        assert_eq!(record.retry_after(3_000), Duration::ZERO);
    }

    #[test]
    fn test_unlocked_record() {
        let record = AttemptRecord::default();
        assert!(!record.is_locked(0));
        assert!(!record.lockout_elapsed(u64::MAX));
    }

    #[test]
    fn test_retry_after_secs_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(1)), 1);
        assert_eq!(retry_after_secs(Duration::from_secs(900)), 900);
        assert_eq!(retry_after_secs(Duration::from_millis(900_500)), 901);
        assert_eq!(retry_after_secs(Duration::ZERO), 0);
    }

    #[test]
    fn test_attempt_error_display() {
        let err: AttemptError<()> = AttemptError::Locked {
            retry_after: Duration::from_secs(60),
        };
        assert_eq!(err.to_string(), "too many failed attempts, retry in 60s");
    }
}
