//! Article Repository

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// Largest page size a listing may request
pub const MAX_PAGE_SIZE: u32 = 100;

// == Article ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub category: String,
    pub featured: bool,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of an article.
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    pub title: String,
    pub body: String,
    pub category: String,
    pub featured: bool,
}

/// Listing filter and pagination.
#[derive(Debug, Clone)]
pub struct ArticleFilter {
    pub page: u32,
    pub limit: u32,
    pub category: Option<String>,
    pub featured: Option<bool>,
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            category: None,
            featured: None,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct ArticlePage {
    pub items: Vec<Article>,
    pub page: u32,
    pub limit: u32,
    pub total: usize,
}

#[derive(Debug, Default)]
struct Inner {
    articles: Vec<Article>,
    next_id: u64,
}

// == Article Repository ==
/// Thread-safe in-memory article collection.
#[derive(Debug, Clone, Default)]
pub struct ArticleRepository {
    inner: Arc<RwLock<Inner>>,
}

impl ArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest-first listing filtered by category and featured flag.
    ///
    /// Page and limit are clamped to at least 1; limit to at most
    /// [`MAX_PAGE_SIZE`].
    pub async fn list(&self, filter: &ArticleFilter) -> ArticlePage {
        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, MAX_PAGE_SIZE);

        let inner = self.inner.read().await;
        let matching: Vec<&Article> = inner
            .articles
            .iter()
            .rev()
            .filter(|a| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| a.category.eq_ignore_ascii_case(c))
            })
            .filter(|a| filter.featured.map_or(true, |f| a.featured == f))
            .collect();

        let offset = (page as usize - 1) * limit as usize;
        let items = matching
            .iter()
            .skip(offset)
            .take(limit as usize)
            .map(|a| (*a).clone())
            .collect();

        ArticlePage {
            items,
            page,
            limit,
            total: matching.len(),
        }
    }

    /// Distinct categories, sorted.
    pub async fn categories(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        inner
            .articles
            .iter()
            .map(|a| a.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Fetches an article and counts the view.
    pub async fn view(&self, id: u64) -> Option<Article> {
        let mut inner = self.inner.write().await;
        let article = inner.articles.iter_mut().find(|a| a.id == id)?;
        article.views += 1;
        Some(article.clone())
    }

    /// Fetches an article without counting a view.
    pub async fn get(&self, id: u64) -> Option<Article> {
        let inner = self.inner.read().await;
        inner.articles.iter().find(|a| a.id == id).cloned()
    }

    pub async fn create(&self, draft: ArticleDraft) -> Article {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let now = Utc::now();
        let article = Article {
            id: inner.next_id,
            title: draft.title,
            body: draft.body,
            category: draft.category,
            featured: draft.featured,
            views: 0,
            created_at: now,
            updated_at: now,
        };
        inner.articles.push(article.clone());
        article
    }

    pub async fn update(&self, id: u64, draft: ArticleDraft) -> Option<Article> {
        let mut inner = self.inner.write().await;
        let article = inner.articles.iter_mut().find(|a| a.id == id)?;
        article.title = draft.title;
        article.body = draft.body;
        article.category = draft.category;
        article.featured = draft.featured;
        article.updated_at = Utc::now();
        Some(article.clone())
    }

    pub async fn delete(&self, id: u64) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.articles.len();
        inner.articles.retain(|a| a.id != id);
        inner.articles.len() != before
    }
}
