//! Centralized service configuration
//!
//! Every environment lookup happens once, here, at startup. Handlers and
//! middleware receive the resulting [`AppConfig`] through the application
//! state instead of reading the environment per request.

use anyhow::Result;
use std::env;

/// Application configuration assembled from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Name of the header carrying the auth token
    pub token_header: String,
    /// Shared secret for signing and verifying tokens
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_expiry_seconds: u64,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDRESS`: server bind address (default: "0.0.0.0:3000")
    /// - `JWT_TOKEN_HEADER`: header carrying the token (default: "Authorization")
    /// - `JWT_SECRET`: shared signing secret (required)
    /// - `JWT_TOKEN_EXPIRY`: token lifetime in seconds (default: 3600)
    pub fn from_env() -> Result<Self> {
        let bind_address =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let token_header =
            env::var("JWT_TOKEN_HEADER").unwrap_or_else(|_| "Authorization".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let token_expiry_seconds = env::var("JWT_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "3600".to_string()) // 1 hour
            .parse()
            .unwrap_or(3600);

        Ok(AppConfig {
            bind_address,
            token_header,
            jwt_secret,
            token_expiry_seconds,
        })
    }
}
