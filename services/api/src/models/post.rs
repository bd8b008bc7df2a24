//! Post model and related payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Post entity, owned by exactly one account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub account_id: Uuid,
    pub content: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub removed: bool,
}

/// Post creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewPostRequest {
    pub content: String,
}

/// Payload targeting an existing post (update carries new content)
#[derive(Debug, Clone, Deserialize)]
pub struct TargetPostRequest {
    pub id: Uuid,
    pub content: Option<String>,
}

/// Query parameters for post listing
#[derive(Debug, Clone, Deserialize)]
pub struct PostQuery {
    pub account_id: Option<Uuid>,
    pub page: Option<String>,
}
