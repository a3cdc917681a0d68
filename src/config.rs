//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CachePolicy, DEFAULT_MAX_BODY_BYTES};
use crate::guard::GuardPolicy;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached responses
    pub max_entries: usize,
    /// Maximum number of tracked login clients
    pub guard_max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// TTL in seconds for article listings
    pub articles_cache_ttl: u64,
    /// TTL in seconds for a single article
    pub article_detail_cache_ttl: u64,
    /// TTL in seconds for the category list
    pub categories_cache_ttl: u64,
    /// Largest response body that will be cached, in bytes
    pub max_cached_body_bytes: usize,
    /// Failed logins before a lockout
    pub login_max_failures: u32,
    /// Lockout length in seconds
    pub login_lockout_secs: u64,
    /// Lifetime in seconds of an idle failure record
    pub login_record_ttl_secs: u64,
    /// Restart the failure count once a lockout has run out
    pub login_reset_on_unlock: bool,
    /// Identify login clients by `X-Forwarded-For`/`X-Real-IP` instead of the
    /// socket peer. Only safe behind a proxy that overwrites those headers.
    pub trust_proxy_headers: bool,
    /// Administrator login name
    pub admin_username: String,
    /// Administrator password
    pub admin_password: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cached responses (default: 1000)
    /// - `GUARD_MAX_ENTRIES` - Maximum tracked login clients (default: 10000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `ARTICLES_CACHE_TTL` - Article listing TTL in seconds (default: 600)
    /// - `ARTICLE_DETAIL_CACHE_TTL` - Article detail TTL in seconds (default: 300)
    /// - `CATEGORIES_CACHE_TTL` - Category list TTL in seconds (default: 3600)
    /// - `MAX_CACHED_BODY_BYTES` - Largest cacheable body (default: 1 MiB)
    /// - `LOGIN_MAX_FAILURES` - Failures before lockout (default: 5)
    /// - `LOGIN_LOCKOUT_SECS` - Lockout length (default: 900)
    /// - `LOGIN_RECORD_TTL_SECS` - Idle failure record lifetime (default: 86400)
    /// - `LOGIN_RESET_ON_UNLOCK` - Reset count after lockout (default: false)
    /// - `TRUST_PROXY_HEADERS` - Key logins on proxy headers (default: false)
    /// - `ADMIN_USERNAME` / `ADMIN_PASSWORD` - Login credentials
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            guard_max_entries: env_or("GUARD_MAX_ENTRIES", defaults.guard_max_entries),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            articles_cache_ttl: env_or("ARTICLES_CACHE_TTL", defaults.articles_cache_ttl),
            article_detail_cache_ttl: env_or(
                "ARTICLE_DETAIL_CACHE_TTL",
                defaults.article_detail_cache_ttl,
            ),
            categories_cache_ttl: env_or("CATEGORIES_CACHE_TTL", defaults.categories_cache_ttl),
            max_cached_body_bytes: env_or("MAX_CACHED_BODY_BYTES", defaults.max_cached_body_bytes),
            login_max_failures: env_or("LOGIN_MAX_FAILURES", defaults.login_max_failures),
            login_lockout_secs: env_or("LOGIN_LOCKOUT_SECS", defaults.login_lockout_secs),
            login_record_ttl_secs: env_or("LOGIN_RECORD_TTL_SECS", defaults.login_record_ttl_secs),
            login_reset_on_unlock: env_or("LOGIN_RESET_ON_UNLOCK", defaults.login_reset_on_unlock),
            trust_proxy_headers: env_or("TRUST_PROXY_HEADERS", defaults.trust_proxy_headers),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
        }
    }

    /// Sweep interval, never shorter than one second.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval.max(1))
    }

    /// Abuse guard thresholds.
    pub fn guard_policy(&self) -> GuardPolicy {
        GuardPolicy {
            max_failures: self.login_max_failures,
            lockout: Duration::from_secs(self.login_lockout_secs),
            record_ttl: Duration::from_secs(self.login_record_ttl_secs),
            reset_on_unlock: self.login_reset_on_unlock,
        }
    }

    /// Cache policy for paginated article listings.
    pub fn articles_policy(&self) -> CachePolicy {
        CachePolicy::new("blog:articles", Duration::from_secs(self.articles_cache_ttl))
            .with_default("page", "1")
            .with_default("limit", "10")
    }

    /// Cache policy for a single article.
    pub fn article_detail_policy(&self) -> CachePolicy {
        CachePolicy::new(
            "blog:article",
            Duration::from_secs(self.article_detail_cache_ttl),
        )
    }

    /// Cache policy for the category list.
    pub fn categories_policy(&self) -> CachePolicy {
        CachePolicy::new(
            "blog:categories",
            Duration::from_secs(self.categories_cache_ttl),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            guard_max_entries: 10_000,
            server_port: 3000,
            cleanup_interval: 60,
            articles_cache_ttl: 600,
            article_detail_cache_ttl: 300,
            categories_cache_ttl: 3600,
            max_cached_body_bytes: DEFAULT_MAX_BODY_BYTES,
            login_max_failures: 5,
            login_lockout_secs: 15 * 60,
            login_record_ttl_secs: 24 * 60 * 60,
            login_reset_on_unlock: false,
            trust_proxy_headers: false,
            admin_username: "admin".to_string(),
            admin_password: "change-me".to_string(),
        }
    }
}

/// Parses `name` from the environment, falling back to `default` when unset
/// or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
