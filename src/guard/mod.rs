//! Guard Module
//!
//! Authentication abuse guard: counts failed logins per client and imposes
//! temporary lockouts.

mod attempt;
mod login_guard;
mod policy;

// Re-export public types
pub use attempt::{retry_after_secs, AttemptError, AttemptRecord, FailureOutcome, GuardStatus};
pub use login_guard::LoginGuard;
pub use policy::{GuardPolicy, DEFAULT_LOCKOUT, DEFAULT_MAX_FAILURES, DEFAULT_RECORD_TTL};
