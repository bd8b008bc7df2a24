//! JWT service for token generation and validation
//!
//! Tokens are signed with HS256 using the shared secret from the service
//! configuration. A token carries the account id as its subject and a fixed
//! expiry; nothing is persisted.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::Token;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry_seconds: u64,
}

impl JwtService {
    /// Initialize a new JWT service from a shared secret
    pub fn new(secret: &str, token_expiry_seconds: u64) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            token_expiry_seconds,
        }
    }

    /// Generate a signed token for an account
    pub fn create_token(&self, account_id: Uuid) -> ApiResult<Token> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ApiError::Internal)?
            .as_secs();

        let claims = Claims {
            sub: account_id,
            iat: now,
            exp: now + self.token_expiry_seconds,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| ApiError::Internal)?;

        Ok(Token { token })
    }

    /// Validate a token and return the account id it was issued for
    pub fn decode_account_id(&self, token: &str) -> ApiResult<Uuid> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| ApiError::TokenInvalid)?;
        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_returns_issuing_account() {
        let service = JwtService::new("key", 3600);
        let account_id = Uuid::new_v4();

        let token = service.create_token(account_id).expect("token creation");
        let decoded = service
            .decode_account_id(&token.token)
            .expect("token decode");

        assert_eq!(decoded, account_id);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("key-one", 3600);
        let verifier = JwtService::new("key-two", 3600);

        let token = issuer.create_token(Uuid::new_v4()).expect("token creation");
        let result = verifier.decode_account_id(&token.token);

        assert!(matches!(result, Err(ApiError::TokenInvalid)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = JwtService::new("key", 3600);
        let result = service.decode_account_id("not-a-token");
        assert!(matches!(result, Err(ApiError::TokenInvalid)));
    }
}
