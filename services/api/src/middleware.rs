//! Authentication middleware
//!
//! Extracts the token from the configured header, validates it, and makes
//! the requesting account id available to handlers through the request
//! extensions.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Account id extracted from a validated token
#[derive(Debug, Clone, Copy)]
pub struct AuthAccountId(pub Uuid);

/// Validate the token carried in the configured header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(state.config.token_header.as_str())
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::TokenInvalid)?;

    // Accept both a bare token and the conventional Bearer prefix
    let token = header_value.strip_prefix("Bearer ").unwrap_or(header_value);

    let account_id = state.jwt_service.decode_account_id(token)?;

    req.extensions_mut().insert(AuthAccountId(account_id));

    Ok(next.run(req).await)
}
