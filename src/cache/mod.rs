//! Cache Module
//!
//! Response cache for idempotent reads, plus the invalidation coordinator
//! that write handlers call after mutating data.

mod invalidation;
pub mod key;
mod middleware;
mod policy;
mod response_cache;

// Re-export public types
pub use invalidation::Invalidator;
pub use key::{derive_key, normalize_query, QueryParams, RequestShape};
pub use middleware::{cache_middleware, CacheLayerState};
pub use policy::{CachePolicy, KeyFn};
pub use response_cache::{CachedResponse, FillTicket, ResponseCache};

// == Public Constants ==
/// Response header reporting `HIT` or `MISS`
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Default cap on a cached body, in bytes
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024; // 1 MB
