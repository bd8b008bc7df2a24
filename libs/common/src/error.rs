//! Infrastructure error types
//!
//! These errors cover database and cache access. Domain-level error kinds
//! (not-found, unauthorized, validation) live in the API service; the types
//! here only describe what the infrastructure itself can report.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Error type for cache operations
///
/// A miss and a connection failure are distinct kinds: a miss is a normal
/// read-through outcome, while a connection failure means the cache backend
/// is unreachable and must be visible in the logs.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The derived key has no entry in the cache
    #[error("cache entry not found for key: {0}")]
    Miss(String),

    /// The cache backend could not be reached or the command failed
    #[error("cache backend unavailable: {0}")]
    Unavailable(#[source] redis::RedisError),

    /// The cached payload could not be deserialized
    #[error("cached payload is not valid JSON: {0}")]
    Corrupt(#[source] serde_json::Error),
}

impl CacheError {
    /// True when the error is an ordinary miss rather than an outage
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss(_))
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Type alias for Result with CacheError
pub type CacheResult<T> = Result<T, CacheError>;
