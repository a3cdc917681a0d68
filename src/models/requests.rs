//! Request DTOs
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::content::{ArticleDraft, ArticleFilter};

/// Maximum accepted title length in characters
pub const MAX_TITLE_LENGTH: usize = 200;

/// Request body for `POST /api/auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.username.trim().is_empty() {
            return Some("Username cannot be empty".to_string());
        }
        if self.password.is_empty() {
            return Some("Password cannot be empty".to_string());
        }
        None
    }
}

/// Request body for creating or replacing an article
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleRequest {
    pub title: String,
    pub body: String,
    pub category: String,
    #[serde(default)]
    pub featured: bool,
}

impl ArticleRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.title.trim().is_empty() {
            return Some("Title cannot be empty".to_string());
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Some(format!(
                "Title exceeds maximum length of {} characters",
                MAX_TITLE_LENGTH
            ));
        }
        if self.category.trim().is_empty() {
            return Some("Category cannot be empty".to_string());
        }
        None
    }

    pub fn into_draft(self) -> ArticleDraft {
        ArticleDraft {
            title: self.title.trim().to_string(),
            body: self.body,
            category: self.category.trim().to_string(),
            featured: self.featured,
        }
    }
}

/// Query string for `GET /api/articles`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub featured: Option<bool>,
}

impl ArticleListQuery {
    /// Builds the repository filter. The category is trimmed the same way
    /// cache keys normalise it, so two spellings sharing a key also share a
    /// result.
    pub fn into_filter(self) -> ArticleFilter {
        let defaults = ArticleFilter::default();
        ArticleFilter {
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
            category: self
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            featured: self.featured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserialize() {
        let json = r#"{"username": "admin", "password": "secret"}"#;
        let req: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.username, "admin");
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_login_validate_empty_fields() {
        let req = LoginRequest {
            username: " ".to_string(),
            password: "x".to_string(),
        };
        assert!(req.validate().is_some());

        let req = LoginRequest {
            username: "admin".to_string(),
            password: String::new(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_article_request_defaults_featured() {
        let json = r#"{"title": "Hello", "body": "...", "category": "rust"}"#;
        let req: ArticleRequest = serde_json::from_str(json).unwrap();
        assert!(!req.featured);
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_article_request_validation() {
        let req = ArticleRequest {
            title: "x".repeat(MAX_TITLE_LENGTH + 1),
            body: String::new(),
            category: "rust".to_string(),
            featured: false,
        };
        assert!(req.validate().is_some());

        let req = ArticleRequest {
            title: "ok".to_string(),
            body: String::new(),
            category: "".to_string(),
            featured: false,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_list_query_into_filter() {
        let filter = ArticleListQuery {
            page: None,
            limit: Some(20),
            category: Some("".to_string()),
            featured: Some(true),
        }
        .into_filter();

        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 20);
        assert!(filter.category.is_none());
        assert_eq!(filter.featured, Some(true));
    }

    #[test]
    fn test_list_query_category_matches_cache_key_spelling() {
        for raw in [" rust ", "rust", "\trust"] {
            let filter = ArticleListQuery {
                category: Some(raw.to_string()),
                ..ArticleListQuery::default()
            }
            .into_filter();

            assert_eq!(filter.category, crate::cache::key::normalize_value(raw));
        }
    }
}
