//! Redis cache client
//!
//! Thin wrapper over a multiplexed async Redis connection with get/set/delete
//! and TTL support. Command failures surface as [`CacheError::Unavailable`]
//! so callers can tell an outage apart from an ordinary miss.

use crate::error::{CacheError, CacheResult};
use redis::{AsyncCommands, Client};
use tracing::info;

/// Configuration for Redis connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
    /// Default TTL in seconds applied to cached responses
    pub default_ttl_seconds: u64,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    /// - `REDIS_DEFAULT_TTL`: TTL in seconds for cached responses (default: 60)
    pub fn from_env() -> CacheResult<Self> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let default_ttl_seconds = std::env::var("REDIS_DEFAULT_TTL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        Ok(RedisConfig {
            url,
            default_ttl_seconds,
        })
    }
}

/// Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    client: Client,
    default_ttl_seconds: u64,
}

impl RedisPool {
    /// Initialize a new Redis connection pool
    pub async fn new(config: &RedisConfig) -> CacheResult<Self> {
        let client = Client::open(config.url.clone()).map_err(CacheError::Unavailable)?;
        info!("Redis client initialized with URL: {}", config.url);
        Ok(RedisPool {
            client,
            default_ttl_seconds: config.default_ttl_seconds,
        })
    }

    async fn get_connection(&self) -> CacheResult<redis::aio::MultiplexedConnection> {
        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(CacheError::Unavailable)?;
        Ok(conn)
    }

    /// Default TTL applied by callers that cache responses
    pub fn default_ttl_seconds(&self) -> u64 {
        self.default_ttl_seconds
    }

    /// Set a key-value pair in Redis with optional TTL
    pub async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let mut conn = self.get_connection().await?;

        if let Some(ttl) = ttl_seconds {
            let _: () = conn
                .set_ex(key, value, ttl)
                .await
                .map_err(CacheError::Unavailable)?;
        } else {
            let _: () = conn.set(key, value).await.map_err(CacheError::Unavailable)?;
        }

        Ok(())
    }

    /// Get a value from Redis by key
    ///
    /// Returns [`CacheError::Miss`] when the key is absent.
    pub async fn get(&self, key: &str) -> CacheResult<String> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(key).await.map_err(CacheError::Unavailable)?;
        value.ok_or_else(|| CacheError::Miss(key.to_string()))
    }

    /// Delete a key from Redis
    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.get_connection().await?;
        let _: u64 = conn.del(key).await.map_err(CacheError::Unavailable)?;
        Ok(())
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> CacheResult<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(CacheError::Unavailable)?;
        Ok(pong == "PONG")
    }
}
