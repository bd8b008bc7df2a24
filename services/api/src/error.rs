//! Domain error kinds for the API service
//!
//! Controllers translate data-layer outcomes into these kinds; the
//! `IntoResponse` impl is the single place where they become HTTP statuses
//! and JSON bodies. Unclassified failures become a logged 500 response, never
//! a process exit.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

/// Domain error kinds surfaced by controllers and handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// The referenced account does not exist (or is soft-deleted)
    #[error("account id does not exist")]
    NotFoundAccountId,

    /// The referenced post does not exist (or is removed)
    #[error("post id does not exist")]
    NotFoundPostId,

    /// The referenced comment does not exist (or is removed)
    #[error("comment id does not exist")]
    NotFoundCommentId,

    /// The requester is not the owner of the targeted resource
    #[error("account id is not the owner of the resource")]
    UnauthorizedAccountId,

    /// The auth token is missing, malformed, or expired
    #[error("token invalid")]
    TokenInvalid,

    /// Login failed: unknown email or wrong password
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Request payload failed field validation
    #[error("validation failed")]
    Validation(BTreeMap<String, String>),

    /// Request shape is wrong (e.g. non-numeric page)
    #[error("{0}")]
    BadRequest(String),

    /// Unique constraint collision (username or email already taken)
    #[error("{0}")]
    Conflict(String),

    /// Database failure
    #[error("database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    /// Anything not matching a known kind
    #[error("internal server error")]
    Internal,
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(common::error::DatabaseError::Query(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFoundAccountId | ApiError::NotFoundPostId | ApiError::NotFoundCommentId => {
                (StatusCode::NOT_FOUND, json!({"message": self.to_string()}))
            }
            ApiError::UnauthorizedAccountId => {
                (StatusCode::FORBIDDEN, json!({"message": self.to_string()}))
            }
            ApiError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                json!({"message": "Token Invalid"}),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({"message": "Invalid email or password"}),
            ),
            ApiError::Validation(fields) => (StatusCode::BAD_REQUEST, json!({"errors": fields})),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({"message": msg})),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({"message": msg})),
            ApiError::Database(e) => {
                error!("database failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"message": "internal server error"}),
                )
            }
            ApiError::Internal => {
                error!("unclassified internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"message": "internal server error"}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn not_found_kinds_map_to_404() {
        assert_eq!(status_of(ApiError::NotFoundAccountId), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ApiError::NotFoundPostId), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ApiError::NotFoundCommentId), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unauthorized_owner_maps_to_403() {
        assert_eq!(
            status_of(ApiError::UnauthorizedAccountId),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn token_invalid_maps_to_401() {
        assert_eq!(status_of(ApiError::TokenInvalid), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_maps_to_400_with_field_errors() {
        let mut fields = BTreeMap::new();
        fields.insert("username".to_string(), "Username is required".to_string());
        assert_eq!(
            status_of(ApiError::Validation(fields)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unclassified_errors_map_to_500() {
        assert_eq!(
            status_of(ApiError::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
