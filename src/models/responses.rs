//! Response DTOs
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::store::StoreStats;

/// Response body for a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
}

impl LoginResponse {
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            message: format!("Welcome, {}", username),
            username,
        }
    }
}

/// Response body for the category list
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Response body for a cache invalidation
#[derive(Debug, Clone, Serialize)]
pub struct InvalidationResponse {
    /// What was invalidated (`all`, or the pattern)
    pub scope: String,
    /// Number of entries removed
    pub removed: usize,
}

impl InvalidationResponse {
    pub fn new(scope: impl Into<String>, removed: usize) -> Self {
        Self {
            scope: scope.into(),
            removed,
        }
    }
}

/// Response body for `GET /api/cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    /// Response cache occupancy and counters
    pub response_cache: StoreStats,
    /// Hit rate of the response cache
    pub hit_rate: f64,
    /// Number of clients with a live failure record
    pub tracked_clients: usize,
}

impl CacheStatsResponse {
    pub fn new(response_cache: StoreStats, tracked_clients: usize) -> Self {
        Self {
            hit_rate: response_cache.hit_rate(),
            response_cache,
            tracked_clients,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Seconds until a locked-out client may retry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            retry_after_secs: None,
        }
    }
}
