//! API Handlers
//!
//! Application state plus the health and cache diagnostic endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::auth::AdminCredentials;
use crate::cache::{CachePolicy, CachedResponse, Invalidator, ResponseCache};
use crate::config::Config;
use crate::content::ArticleRepository;
use crate::error::{AppError, Result};
use crate::guard::{AttemptRecord, LoginGuard};
use crate::models::{CacheStatsResponse, HealthResponse, InvalidationResponse};
use crate::store::{shared, Clock, RecordStore, SharedStore, SystemClock};

/// Cache policies for each cached endpoint family.
#[derive(Debug, Clone)]
pub struct CachePolicies {
    pub articles: CachePolicy,
    pub article_detail: CachePolicy,
    pub categories: CachePolicy,
}

impl CachePolicies {
    pub fn from_config(config: &Config) -> Self {
        Self {
            articles: config.articles_policy(),
            article_detail: config.article_detail_policy(),
            categories: config.categories_policy(),
        }
    }
}

/// Application state shared across all handlers.
///
/// The composition root: both stores are created here once and handed to
/// their consumers, never reached through a global.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Response cache over the cache store
    pub cache: ResponseCache,
    /// Invalidation handle over the same store
    pub invalidator: Invalidator,
    /// Login abuse guard over the guard store
    pub guard: LoginGuard,
    /// Article data
    pub articles: ArticleRepository,
    /// Credential check for the login endpoint
    pub credentials: Arc<AdminCredentials>,
    /// Per-endpoint caching rules
    pub policies: CachePolicies,
    /// Key login clients on proxy headers rather than the peer address
    pub trust_proxy_headers: bool,
}

impl AppState {
    /// Creates state from pre-built stores.
    pub fn new(
        cache_store: SharedStore<CachedResponse>,
        guard_store: SharedStore<AttemptRecord>,
        config: &Config,
    ) -> Self {
        let cache = ResponseCache::new(cache_store, config.max_cached_body_bytes);
        Self {
            invalidator: cache.invalidator(),
            cache,
            guard: LoginGuard::new(guard_store, config.guard_policy()),
            articles: ArticleRepository::new(),
            credentials: Arc::new(AdminCredentials::new(
                config.admin_username.clone(),
                config.admin_password.clone(),
            )),
            policies: CachePolicies::from_config(config),
            trust_proxy_headers: config.trust_proxy_headers,
        }
    }

    /// Creates state whose stores read time from `clock`.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let cache_store = shared(RecordStore::with_clock(config.max_entries, clock.clone()));
        let guard_store = shared(RecordStore::with_clock(config.guard_max_entries, clock));
        Self::new(cache_store, guard_store, config)
    }

    /// Creates state from configuration using wall-clock time.
    pub fn from_config(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /api/cache/stats
///
/// Reports response cache occupancy, the live key set, and how many clients
/// the login guard is tracking.
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let cache_stats = state.cache.stats().await;
    let tracked_clients = state.guard.stats().await.entries;
    Json(CacheStatsResponse::new(cache_stats, tracked_clients))
}

/// Handler for DELETE /api/cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<InvalidationResponse> {
    let removed = state.invalidator.invalidate_all().await;
    Json(InvalidationResponse::new("all", removed))
}

/// Handler for DELETE /api/cache/pattern/:pattern
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
) -> Result<Json<InvalidationResponse>> {
    if pattern.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "Pattern cannot be empty".to_string(),
        ));
    }
    let removed = state.invalidator.invalidate_by_pattern(&pattern).await;
    Ok(Json(InvalidationResponse::new(pattern, removed)))
}
