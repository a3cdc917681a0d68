//! Guard Policy Module

use std::time::Duration;

/// Default number of failures that triggers a lockout
pub const DEFAULT_MAX_FAILURES: u32 = 5;

/// Default lockout length
pub const DEFAULT_LOCKOUT: Duration = Duration::from_secs(15 * 60);

/// Default lifetime of an idle attempt record
pub const DEFAULT_RECORD_TTL: Duration = Duration::from_secs(24 * 60 * 60);

// == Guard Policy ==
/// Thresholds for the login abuse guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPolicy {
    /// Failures that trigger a lockout (at least 1)
    pub max_failures: u32,
    /// How long a lockout lasts
    pub lockout: Duration,
    /// How long an attempt record lives after its last failure
    pub record_ttl: Duration,
    /// Whether the first failure after an elapsed lockout restarts the count
    pub reset_on_unlock: bool,
}

impl GuardPolicy {
    /// Failures needed to lock, never below one.
    pub fn threshold(&self) -> u32 {
        self.max_failures.max(1)
    }

    /// Store TTL for attempt records; a record always outlives its lockout.
    pub fn effective_record_ttl(&self) -> Duration {
        self.record_ttl.max(self.lockout)
    }
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            max_failures: DEFAULT_MAX_FAILURES,
            lockout: DEFAULT_LOCKOUT,
            record_ttl: DEFAULT_RECORD_TTL,
            reset_on_unlock: false,
        }
    }
}
