//! Account route handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::cache;
use crate::error::ApiError;
use crate::middleware::AuthAccountId;
use crate::models::{LoginRequest, NewAccountRequest, UpdateAccountRequest};
use crate::state::AppState;
use crate::validation;

/// Query parameters for the follower/following listings
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Register a new account
pub async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<NewAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_new_account(&payload)?;

    let account = state.accounts_controller.insert_account(payload).await?;

    Ok((StatusCode::OK, Json(account)))
}

/// Issue a token for valid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.accounts_controller.create_token(payload).await?;

    Ok(Json(token))
}

/// Fetch the requester's own account
pub async fn get_account(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .accounts_controller
        .find_account_by_id(account_id)
        .await?;

    Ok(Json(account))
}

/// Apply a partial update to the requester's account
pub async fn update_account(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_update_account(&payload)?;

    let account = state
        .accounts_controller
        .change_account_data_by_id(account_id, payload)
        .await?;

    Ok(Json(account))
}

/// Soft-delete the requester's account
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .accounts_controller
        .delete_account_by_id(account_id)
        .await?;

    Ok(Json(account))
}

/// Follow another account
pub async fn follow(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    Path(account_id_followed): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .accounts_controller
        .follow(account_id, account_id_followed)
        .await?;

    Ok(Json(json!({"message": "followed"})))
}

/// Stop following another account
pub async fn unfollow(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    Path(account_id_followed): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .accounts_controller
        .unfollow(account_id, account_id_followed)
        .await?;

    Ok(Json(json!({"message": "unfollowed"})))
}

/// List accounts following the requester (read-through cached)
pub async fn get_followers(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = validation::parse_page(query.page.as_deref())?;

    let key = cache::cache_key(&Method::GET, &uri);
    match cache::find_in_cache(&state.redis_pool, &key).await {
        Ok(cached) => return Ok(Json(cached)),
        Err(e) => cache::log_cache_miss(&key, &e),
    }

    let followers = state
        .accounts_controller
        .find_followers(account_id, page)
        .await?;

    cache::insert_cache(&state.redis_pool, &key, &followers).await;

    Ok(Json(serde_json::to_value(followers).map_err(|_| ApiError::Internal)?))
}

/// List accounts the requester follows (read-through cached)
pub async fn get_following(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = validation::parse_page(query.page.as_deref())?;

    let key = cache::cache_key(&Method::GET, &uri);
    match cache::find_in_cache(&state.redis_pool, &key).await {
        Ok(cached) => return Ok(Json(cached)),
        Err(e) => cache::log_cache_miss(&key, &e),
    }

    let following = state
        .accounts_controller
        .find_following(account_id, page)
        .await?;

    cache::insert_cache(&state.redis_pool, &key, &following).await;

    Ok(Json(serde_json::to_value(following).map_err(|_| ApiError::Internal)?))
}
