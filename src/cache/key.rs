//! Cache Key Module
//!
//! Derives deterministic cache keys from request shape. Semantically identical
//! requests collapse to one key regardless of parameter order, spelling of
//! numbers, or whether a defaulted parameter was sent explicitly.

use std::collections::BTreeMap;

use axum::extract::Query;
use axum::http::{Method, Uri};

/// Normalised query parameters, sorted by name.
pub type QueryParams = BTreeMap<String, String>;

// == Request Shape ==
/// The parts of a request a key function may look at.
#[derive(Debug, Clone, Copy)]
pub struct RequestShape<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub params: &'a QueryParams,
}

// == Normalise Value ==
/// Canonical spelling of a single parameter value.
///
/// Integers lose leading zeros and a `+` sign, booleans are lower-cased,
/// everything else is trimmed. Returns `None` for empty values.
pub fn normalize_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n.to_string());
    }
    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
        return Some(trimmed.to_ascii_lowercase());
    }
    Some(trimmed.to_string())
}

// == Normalise Query ==
/// Parses and normalises the query string of `uri`, filling in `defaults`
/// for parameters that are absent or empty.
///
/// A query string that cannot be decoded is treated as empty.
pub fn normalize_query(uri: &Uri, defaults: &[(String, String)]) -> QueryParams {
    let pairs: Vec<(String, String)> = Query::try_from_uri(uri)
        .map(|Query(pairs)| pairs)
        .unwrap_or_default();
    normalize_pairs(pairs, defaults)
}

/// Normalises already-decoded pairs. Later duplicates win.
pub fn normalize_pairs<I>(pairs: I, defaults: &[(String, String)]) -> QueryParams
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut params = QueryParams::new();
    for (name, value) in pairs {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        match normalize_value(&value) {
            Some(value) => {
                params.insert(name.to_string(), value);
            }
            None => {
                params.remove(name);
            }
        }
    }

    for (name, value) in defaults {
        if !params.contains_key(name) {
            if let Some(value) = normalize_value(value) {
                params.insert(name.clone(), value);
            }
        }
    }
    params
}

// == Derive Key ==
/// Builds `"{namespace}:{METHOD}:{path}?k1=v1&k2=v2"`.
///
/// The `?` suffix is omitted when there are no parameters.
pub fn derive_key(namespace: &str, shape: RequestShape<'_>) -> String {
    let mut key = format!("{}:{}:{}", namespace, shape.method, shape.path);
    if !shape.params.is_empty() {
        let query = shape
            .params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        key.push('?');
        key.push_str(&query);
    }
    key
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn defaults() -> Vec<(String, String)> {
        vec![
            ("page".to_string(), "1".to_string()),
            ("limit".to_string(), "10".to_string()),
        ]
    }

    fn key_for(uri: &str) -> String {
        let uri: Uri = uri.parse().unwrap();
        let params = normalize_query(&uri, &defaults());
        derive_key(
            "blog:articles",
            RequestShape {
                method: &Method::GET,
                path: uri.path(),
                params: &params,
            },
        )
    }

    #[test]
    fn test_normalize_value() {
        assert_eq!(normalize_value(" 007 "), Some("7".to_string()));
        assert_eq!(normalize_value("+3"), Some("3".to_string()));
        assert_eq!(normalize_value("TRUE"), Some("true".to_string()));
        assert_eq!(normalize_value("rust"), Some("rust".to_string()));
        assert_eq!(normalize_value("   "), None);
    }

    #[test]
    fn test_absent_default_matches_explicit_default() {
        assert_eq!(key_for("/api/articles"), key_for("/api/articles?page=1"));
        assert_eq!(
            key_for("/api/articles"),
            key_for("/api/articles?page=1&limit=10")
        );
    }

    #[test]
    fn test_parameter_order_is_irrelevant() {
        assert_eq!(
            key_for("/api/articles?category=rust&page=2"),
            key_for("/api/articles?page=2&category=rust")
        );
    }

    #[test]
    fn test_numeric_spelling_is_irrelevant() {
        assert_eq!(
            key_for("/api/articles?page=02"),
            key_for("/api/articles?page=2")
        );
    }

    #[test]
    fn test_empty_value_falls_back_to_default() {
        assert_eq!(key_for("/api/articles?page="), key_for("/api/articles"));
    }

    #[test]
    fn test_different_params_differ() {
        assert_ne!(
            key_for("/api/articles?page=2"),
            key_for("/api/articles?page=3")
        );
        assert_ne!(
            key_for("/api/articles?featured=true"),
            key_for("/api/articles")
        );
    }

    #[test]
    fn test_key_shape() {
        assert_eq!(
            key_for("/api/articles?category=rust"),
            "blog:articles:GET:/api/articles?category=rust&limit=10&page=1"
        );
    }

    #[test]
    fn test_key_without_params() {
        let params = QueryParams::new();
        let key = derive_key(
            "blog:categories",
            RequestShape {
                method: &Method::GET,
                path: "/api/articles/categories",
                params: &params,
            },
        );
        assert_eq!(key, "blog:categories:GET:/api/articles/categories");
    }

    #[test]
    fn test_percent_encoded_values_are_decoded() {
        assert_eq!(
            key_for("/api/articles?category=web%20dev"),
            key_for("/api/articles?category=web+dev")
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        // Shuffling parameters never changes the derived key.
        #[test]
        fn prop_key_independent_of_order(
            params in prop::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{1,8}", 0..6),
            rotate in 0usize..6
        ) {
            let mut pairs: Vec<(String, String)> = params.into_iter().collect();
            let original = normalize_pairs(pairs.clone(), &defaults());
            if !pairs.is_empty() {
                let by = rotate % pairs.len();
                pairs.rotate_left(by);
                pairs.reverse();
            }
            let shuffled = normalize_pairs(pairs, &defaults());
            prop_assert_eq!(original, shuffled);
        }

        // Normalising an already-normalised set is a no-op.
        #[test]
        fn prop_normalization_idempotent(
            params in prop::collection::vec(("[a-z]{1,6}", "[ 0-9a-zA-Z]{0,6}"), 0..8)
        ) {
            let once = normalize_pairs(params, &defaults());
            let twice = normalize_pairs(once.clone(), &defaults());
            prop_assert_eq!(once, twice);
        }
    }
}
