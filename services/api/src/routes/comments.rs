//! Comment route handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::{Method, Uri},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::cache;
use crate::error::ApiError;
use crate::middleware::AuthAccountId;
use crate::models::{CommentQuery, NewCommentRequest, TargetCommentRequest};
use crate::repositories::comment::CommentFilter;
use crate::state::AppState;
use crate::validation;

/// Query parameter carrying an optional parent comment id on creation
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyQuery {
    pub comment_id: Option<Uuid>,
}

/// Create a comment on a post; `comment_id` in the query makes it a reply
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    Path(post_id): Path<Uuid>,
    Query(reply): Query<ReplyQuery>,
    Json(payload): Json<NewCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_content_field(&payload.content)?;

    let comment = state
        .comments_controller
        .insert_comment(account_id, post_id, reply.comment_id, payload.content)
        .await?;

    Ok(Json(comment))
}

/// List comments filtered by account, post, or parent comment id
/// (read-through cached)
pub async fn get_comments(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    uri: Uri,
    Query(query): Query<CommentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = validation::parse_page(query.page.as_deref())?;

    let key = cache::cache_key(&Method::GET, &uri);
    match cache::find_in_cache(&state.redis_pool, &key).await {
        Ok(cached) => return Ok(Json(cached)),
        Err(e) => cache::log_cache_miss(&key, &e),
    }

    let filter = CommentFilter {
        account_id: query.account_id,
        post_id: query.post_id,
        comment_id: query.comment_id,
    };

    let comments = state
        .comments_controller
        .find_comments(account_id, filter, page)
        .await?;

    cache::insert_cache(&state.redis_pool, &key, &comments).await;

    Ok(Json(serde_json::to_value(comments).map_err(|_| ApiError::Internal)?))
}

/// Update a comment's content; author only
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    Json(payload): Json<TargetCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = payload.content.unwrap_or_default();
    validation::validate_content_field(&content)?;

    let comment = state
        .comments_controller
        .update_comment_data_by_id(account_id, payload.id, content)
        .await?;

    Ok(Json(comment))
}

/// Soft-delete a comment; author only
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(AuthAccountId(account_id)): Extension<AuthAccountId>,
    Json(payload): Json<TargetCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state
        .comments_controller
        .remove_comment_by_id(account_id, payload.id)
        .await?;

    Ok(Json(comment))
}
