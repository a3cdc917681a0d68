//! Cache Middleware
//!
//! Axum middleware that serves idempotent reads from the response cache and
//! captures successful handler output on a miss.

use std::sync::Arc;

use axum::{
    body::{Body, HttpBody},
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::cache::{CachePolicy, CachedResponse, ResponseCache, CACHE_STATUS_HEADER};
use crate::error::AppError;

// == Layer State ==
/// State handed to [`cache_middleware`]: the cache plus one endpoint's policy.
#[derive(Debug, Clone)]
pub struct CacheLayerState {
    pub cache: ResponseCache,
    pub policy: Arc<CachePolicy>,
}

impl CacheLayerState {
    pub fn new(cache: ResponseCache, policy: CachePolicy) -> Self {
        Self {
            cache,
            policy: Arc::new(policy),
        }
    }
}

/// Response-cache middleware.
///
/// Use with `axum::middleware::from_fn_with_state`. Only `GET` requests are
/// cached; every other method goes straight to the handler. A hit skips the
/// handler entirely, including any side effects it would have had.
pub async fn cache_middleware(
    State(state): State<CacheLayerState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = state.policy.key_for(request.method(), request.uri());

    let ticket = match state.cache.lookup_or_ticket(&key).await {
        Ok(hit) => {
            debug!(%key, "serving cached response");
            return hit.to_response("HIT");
        }
        Err(ticket) => ticket,
    };

    let response = next.run(request).await;
    if !response.status().is_success() {
        debug!(%key, status = %response.status(), "not caching unsuccessful response");
        return response;
    }

    let (mut parts, body) = response.into_parts();
    parts
        .headers
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static("MISS"));

    // Known-oversized bodies stream through without buffering
    let size_floor = body.size_hint().lower();
    if size_floor > state.cache.max_body_bytes() as u64 {
        debug!(%key, size_floor, "response too large to cache");
        return Response::from_parts(parts, body);
    }

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(%key, error = %err, "failed to buffer response body");
            return AppError::Internal("failed to read response body".to_string())
                .into_response();
        }
    };

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let captured = CachedResponse::new(parts.status, content_type, bytes.clone());
    if state
        .cache
        .fill(&key, captured, state.policy.ttl(), ticket)
        .await
    {
        debug!(%key, ttl_secs = state.policy.ttl().as_secs(), "cached response");
    }

    Response::from_parts(parts, Body::from(bytes))
}
