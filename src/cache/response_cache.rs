//! Response Cache Module
//!
//! Memoizes successful read results in the shared record store.

use std::future::Future;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::cache::{Invalidator, CACHE_STATUS_HEADER};
use crate::store::{SharedStore, StoreStats};

// == Cached Response ==
/// A captured response payload.
///
/// Entries are never mutated in place; a refresh replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// HTTP status code of the captured response
    pub status: u16,
    /// Content-Type header, if the handler set one
    pub content_type: Option<String>,
    /// Response body
    pub body: Bytes,
}

impl CachedResponse {
    pub fn new(status: StatusCode, content_type: Option<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status: status.as_u16(),
            content_type,
            body: body.into(),
        }
    }

    /// A 200 response carrying a JSON body.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::new(
            StatusCode::OK,
            Some("application/json".to_string()),
            body,
        )
    }

    /// Rebuilds an HTTP response, tagged with the given cache status.
    pub fn to_response(&self, cache_status: &'static str) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        let mut response = (status, Body::from(self.body.clone())).into_response();
        let headers = response.headers_mut();
        if let Some(content_type) = self
            .content_type
            .as_deref()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
        {
            headers.insert(header::CONTENT_TYPE, content_type);
        }
        headers.insert(CACHE_STATUS_HEADER, HeaderValue::from_static(cache_status));
        response
    }
}

// == Fill Ticket ==
/// Handed out on a miss. Carries the store generation observed at lookup so
/// [`ResponseCache::fill`] can drop a value computed before an invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillTicket {
    generation: u64,
}

// == Response Cache ==
/// Read-through cache over a shared record store.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    store: SharedStore<CachedResponse>,
    max_body_bytes: usize,
}

impl ResponseCache {
    /// Creates a cache over `store`. Bodies larger than `max_body_bytes` are
    /// served but not stored.
    pub fn new(store: SharedStore<CachedResponse>, max_body_bytes: usize) -> Self {
        Self {
            store,
            max_body_bytes,
        }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &SharedStore<CachedResponse> {
        &self.store
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// An invalidation handle over the same store.
    pub fn invalidator(&self) -> Invalidator {
        Invalidator::new(self.store.clone())
    }

    // == Lookup ==
    /// Returns the live entry at `key`, if any.
    pub async fn lookup(&self, key: &str) -> Option<CachedResponse> {
        let mut store = self.store.write().await;
        store.get(key)
    }

    /// Returns the live entry at `key`, or a ticket for filling it.
    ///
    /// Lookup and ticket are taken under one lock acquisition.
    pub async fn lookup_or_ticket(&self, key: &str) -> Result<CachedResponse, FillTicket> {
        let mut store = self.store.write().await;
        match store.get(key) {
            Some(hit) => Ok(hit),
            None => Err(FillTicket {
                generation: store.generation(),
            }),
        }
    }

    // == Insert ==
    /// Stores `value` under `key`. Returns false if the body is too large.
    pub async fn insert(&self, key: &str, value: CachedResponse, ttl: Duration) -> bool {
        if !self.fits(key, &value) {
            return false;
        }
        let mut store = self.store.write().await;
        store.put(key, value, ttl);
        true
    }

    // == Fill ==
    /// Stores a value computed after a miss.
    ///
    /// Dropped if the body is too large, or if any invalidation ran since
    /// `ticket` was issued. Returns whether the value was stored.
    pub async fn fill(
        &self,
        key: &str,
        value: CachedResponse,
        ttl: Duration,
        ticket: FillTicket,
    ) -> bool {
        if !self.fits(key, &value) {
            return false;
        }
        let mut store = self.store.write().await;
        let stored = store.put_if_generation(key, value, ttl, ticket.generation);
        if !stored {
            debug!(key, "invalidated while computing, not caching");
        }
        stored
    }

    fn fits(&self, key: &str, value: &CachedResponse) -> bool {
        if value.body.len() > self.max_body_bytes {
            debug!(key, size = value.body.len(), "response too large to cache");
            return false;
        }
        true
    }

    // == Get Or Compute ==
    /// Serves `key` from the cache, or runs `compute` and caches its result.
    ///
    /// On a hit `compute` is never called. On a miss only an `Ok` value is
    /// stored; an `Err` is returned unchanged and leaves the key untouched.
    /// The store lock is not held while `compute` runs, and a value whose
    /// computation overlapped an invalidation is returned but not stored.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<CachedResponse, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedResponse, E>>,
    {
        let ticket = match self.lookup_or_ticket(key).await {
            Ok(hit) => {
                debug!(key, "cache hit");
                return Ok(hit);
            }
            Err(ticket) => ticket,
        };

        debug!(key, "cache miss");
        let value = compute().await?;
        self.fill(key, value.clone(), ttl, ticket).await;
        Ok(value)
    }

    // == Stats ==
    pub async fn stats(&self) -> StoreStats {
        self.store.read().await.stats()
    }
}
