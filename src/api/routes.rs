//! API Routes
//!
//! Configures the Axum router and installs the response cache on the read
//! endpoints.

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::articles::{
    article_categories, create_article, delete_article, get_article, list_articles,
    update_article,
};
use super::auth::login_handler;
use super::handlers::{
    cache_stats_handler, clear_cache_handler, health_handler, invalidate_pattern_handler,
    AppState,
};
use crate::cache::{cache_middleware, CacheLayerState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET|POST /api/articles` - Cached listing / create
/// - `GET /api/articles/categories` - Cached category list
/// - `GET|PUT|DELETE /api/articles/:id` - Cached detail / update / delete
/// - `POST /api/auth/login` - Guarded login
/// - `GET /api/cache/stats` - Cache occupancy
/// - `DELETE /api/cache` - Drop every cached response
/// - `DELETE /api/cache/pattern/:pattern` - Drop cached responses by substring
///
/// # Middleware
/// - Response cache: per-route, GET only
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cache = state.cache.clone();
    let policies = state.policies.clone();

    // Build router with all endpoints
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/articles",
            get(list_articles)
                .layer(from_fn_with_state(
                    CacheLayerState::new(cache.clone(), policies.articles),
                    cache_middleware,
                ))
                .post(create_article),
        )
        .route(
            "/api/articles/categories",
            get(article_categories).layer(from_fn_with_state(
                CacheLayerState::new(cache.clone(), policies.categories),
                cache_middleware,
            )),
        )
        .route(
            "/api/articles/:id",
            get(get_article)
                .layer(from_fn_with_state(
                    CacheLayerState::new(cache.clone(), policies.article_detail),
                    cache_middleware,
                ))
                .put(update_article)
                .delete(delete_article),
        )
        .route("/api/auth/login", post(login_handler))
        .route("/api/cache/stats", get(cache_stats_handler))
        .route("/api/cache", delete(clear_cache_handler))
        .route(
            "/api/cache/pattern/:pattern",
            delete(invalidate_pattern_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
