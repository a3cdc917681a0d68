//! Article Handlers
//!
//! Reads are cached by the response-cache middleware installed in the router.
//! Writes invalidate every `blog:` entry before responding, so the next read
//! sees the change.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::api::AppState;
use crate::content::{Article, ArticlePage};
use crate::error::{AppError, Result};
use crate::models::{ArticleListQuery, ArticleRequest, CategoriesResponse};

/// Key prefix shared by every cached blog endpoint
pub const BLOG_NAMESPACE: &str = "blog:";

/// Handler for GET /api/articles
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleListQuery>,
) -> Json<ArticlePage> {
    Json(state.articles.list(&query.into_filter()).await)
}

/// Handler for GET /api/articles/categories
pub async fn article_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.articles.categories().await,
    })
}

/// Handler for GET /api/articles/:id
///
/// Counts a view. Served from cache, this handler does not run, so cached
/// reads are not counted.
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Article>> {
    state
        .articles
        .view(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))
}

/// Handler for POST /api/articles
pub async fn create_article(
    State(state): State<AppState>,
    Json(req): Json<ArticleRequest>,
) -> Result<(StatusCode, Json<Article>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let article = state.articles.create(req.into_draft()).await;
    state.invalidator.invalidate_by_prefix(BLOG_NAMESPACE).await;

    Ok((StatusCode::CREATED, Json(article)))
}

/// Handler for PUT /api/articles/:id
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<ArticleRequest>,
) -> Result<Json<Article>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let article = state
        .articles
        .update(id, req.into_draft())
        .await
        .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))?;
    state.invalidator.invalidate_by_prefix(BLOG_NAMESPACE).await;

    Ok(Json(article))
}

/// Handler for DELETE /api/articles/:id
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    if !state.articles.delete(id).await {
        return Err(AppError::NotFound(format!("Article {} not found", id)));
    }
    state.invalidator.invalidate_by_prefix(BLOG_NAMESPACE).await;

    Ok(StatusCode::NO_CONTENT)
}
