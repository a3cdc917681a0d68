//! Cache Policy Module
//!
//! Per-endpoint-family caching rules: key namespace, TTL, parameter defaults
//! and an optional custom key function.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, Uri};

use crate::cache::key::{derive_key, normalize_query, RequestShape};

/// Caller-supplied key derivation.
pub type KeyFn = Arc<dyn Fn(RequestShape<'_>) -> String + Send + Sync>;

// == Cache Policy ==
/// How one family of read endpoints is cached.
#[derive(Clone)]
pub struct CachePolicy {
    namespace: String,
    ttl: Duration,
    defaults: Vec<(String, String)>,
    key_fn: Option<KeyFn>,
}

impl CachePolicy {
    /// Creates a policy whose keys start with `namespace`.
    pub fn new(namespace: impl Into<String>, ttl: Duration) -> Self {
        Self {
            namespace: namespace.into(),
            ttl,
            defaults: Vec::new(),
            key_fn: None,
        }
    }

    /// Declares the default value of a query parameter, so that omitting it
    /// and sending it explicitly hit the same entry.
    pub fn with_default(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.push((param.into(), value.into()));
        self
    }

    /// Replaces the built-in key derivation.
    pub fn with_key_fn<F>(mut self, key_fn: F) -> Self
    where
        F: Fn(RequestShape<'_>) -> String + Send + Sync + 'static,
    {
        self.key_fn = Some(Arc::new(key_fn));
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Key For ==
    /// Derives the cache key for a request.
    pub fn key_for(&self, method: &Method, uri: &Uri) -> String {
        let params = normalize_query(uri, &self.defaults);
        let shape = RequestShape {
            method,
            path: uri.path(),
            params: &params,
        };
        match &self.key_fn {
            Some(key_fn) => key_fn(shape),
            None => derive_key(&self.namespace, shape),
        }
    }
}

impl fmt::Debug for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePolicy")
            .field("namespace", &self.namespace)
            .field("ttl", &self.ttl)
            .field("defaults", &self.defaults)
            .field("custom_key", &self.key_fn.is_some())
            .finish()
    }
}
