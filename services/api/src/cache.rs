//! Read-through response cache
//!
//! List endpoints derive a cache key from the request identity (method, path,
//! query string) and consult Redis before touching the database. A miss falls
//! through to the data layer; an unreachable cache also falls through, but is
//! logged as an error instead of being mistaken for a miss.

use axum::http::{Method, Uri};
use common::cache::RedisPool;
use common::error::{CacheError, CacheResult};
use serde::Serialize;
use tracing::{error, info};

/// Derive the cache key for a request
///
/// The key is deterministic in the method, path, and query string, so two
/// requests for the same resource page share an entry.
pub fn cache_key(method: &Method, uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("{}:{}?{}", method, uri.path(), query),
        None => format!("{}:{}", method, uri.path()),
    }
}

/// Look up a cached response for the request
pub async fn find_in_cache(redis: &RedisPool, key: &str) -> CacheResult<serde_json::Value> {
    let raw = redis.get(key).await?;
    let value = serde_json::from_str(&raw).map_err(CacheError::Corrupt)?;
    info!("cache hit for {}", key);
    Ok(value)
}

/// Store a serialized response under the request's derived key
///
/// Failures are logged and swallowed: a broken cache must not fail the
/// request that produced the payload.
pub async fn insert_cache<T: Serialize>(redis: &RedisPool, key: &str, payload: &T) {
    let serialized = match serde_json::to_string(payload) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to serialize payload for cache key {}: {}", key, e);
            return;
        }
    };

    if let Err(e) = redis
        .set(key, &serialized, Some(redis.default_ttl_seconds()))
        .await
    {
        error!("failed to store cache entry {}: {}", key, e);
    }
}

/// Log a cache read failure with the severity it deserves
pub fn log_cache_miss(key: &str, err: &CacheError) {
    if err.is_miss() {
        info!("cache miss for {}", key);
    } else {
        error!("cache read failed for {}: {}", key, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_includes_method_path_and_query() {
        let uri: Uri = "/accounts/comments?post_id=abc&page=2".parse().unwrap();
        let key = cache_key(&Method::GET, &uri);
        assert_eq!(key, "GET:/accounts/comments?post_id=abc&page=2");
    }

    #[test]
    fn key_without_query_omits_separator() {
        let uri: Uri = "/accounts/followers".parse().unwrap();
        let key = cache_key(&Method::GET, &uri);
        assert_eq!(key, "GET:/accounts/followers");
    }

    #[test]
    fn keys_differ_across_method_path_and_query() {
        let uri_a: Uri = "/accounts/comments?page=1".parse().unwrap();
        let uri_b: Uri = "/accounts/comments?page=2".parse().unwrap();
        let uri_c: Uri = "/accounts/posts?page=1".parse().unwrap();

        let a = cache_key(&Method::GET, &uri_a);
        let b = cache_key(&Method::GET, &uri_b);
        let c = cache_key(&Method::GET, &uri_c);
        let d = cache_key(&Method::PUT, &uri_a);

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn key_is_stable_across_calls() {
        let uri: Uri = "/accounts/comments?account_id=x".parse().unwrap();
        assert_eq!(
            cache_key(&Method::GET, &uri),
            cache_key(&Method::GET, &uri)
        );
    }
}
