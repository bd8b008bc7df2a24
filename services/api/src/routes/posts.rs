//! Post route handlers

use axum::{
    Json,
    extract::{Extension, Query, State},
    http::{Method, Uri},
    response::IntoResponse,
};

use crate::cache;
use crate::error::ApiError;
use crate::middleware::AuthAccountId;
use crate::models::{NewPostRequest, PostQuery, TargetPostRequest};
use crate::state::AppState;
use crate::validation;

/// Create a post
pub async fn create_post(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    Json(payload): Json<NewPostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_content_field(&payload.content)?;

    let post = state
        .posts_controller
        .insert_post(account_id, payload.content)
        .await?;

    Ok(Json(post))
}

/// List an account's posts (read-through cached)
///
/// Without an `account_id` query parameter the requester's own posts are
/// listed.
pub async fn get_posts(
    State(state): State<AppState>,
    Extension(AuthAccountId(requester_id)): Extension<AuthAccountId>,
    uri: Uri,
    Query(query): Query<PostQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = validation::parse_page(query.page.as_deref())?;
    let account_id = query.account_id.unwrap_or(requester_id);

    let key = cache::cache_key(&Method::GET, &uri);
    match cache::find_in_cache(&state.redis_pool, &key).await {
        Ok(cached) => return Ok(Json(cached)),
        Err(e) => cache::log_cache_miss(&key, &e),
    }

    let posts = state
        .posts_controller
        .find_posts_by_account_id(account_id, page)
        .await?;

    cache::insert_cache(&state.redis_pool, &key, &posts).await;

    Ok(Json(serde_json::to_value(posts).map_err(|_| ApiError::Internal)?))
}

/// Update a post's content; author only
pub async fn update_post(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    Json(payload): Json<TargetPostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = payload.content.unwrap_or_default();
    validation::validate_content_field(&content)?;

    let post = state
        .posts_controller
        .update_post_data_by_id(account_id, payload.id, content)
        .await?;

    Ok(Json(post))
}

/// Soft-delete a post; author only
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    Json(payload): Json<TargetPostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .posts_controller
        .remove_post_by_id(account_id, payload.id)
        .await?;

    Ok(Json(post))
}
