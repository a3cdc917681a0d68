//! Content Module
//!
//! Minimal in-memory article repository that the HTTP layer caches in front
//! of. It exists to give the cache and its invalidation real reads and
//! writes to sit between; it is not a persistence layer.

mod articles;

pub use articles::{Article, ArticleDraft, ArticleFilter, ArticlePage, ArticleRepository};
