//! Comment model and related payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Comment entity
///
/// `comment_id` optionally references a parent comment, which is what makes
/// threaded replies possible. `removed` is a soft-delete flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub account_id: Uuid,
    pub post_id: Uuid,
    pub comment_id: Option<Uuid>,
    pub content: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub removed: bool,
}

/// Comment creation payload (post id comes from the path, parent comment id
/// from the query string)
#[derive(Debug, Clone, Deserialize)]
pub struct NewCommentRequest {
    pub content: String,
}

/// Payload targeting an existing comment (update carries new content)
#[derive(Debug, Clone, Deserialize)]
pub struct TargetCommentRequest {
    pub id: Uuid,
    pub content: Option<String>,
}

/// Query parameters for comment listing
#[derive(Debug, Clone, Deserialize)]
pub struct CommentQuery {
    pub account_id: Option<Uuid>,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub page: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_serializes_with_optional_parent() {
        let comment = Comment {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            comment_id: None,
            content: "first".to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            updated_at: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            removed: false,
        };

        let value = serde_json::to_value(&comment).unwrap();
        assert!(value["comment_id"].is_null());
        assert_eq!(value["content"], "first");
        assert_eq!(value["created_at"], "2024-01-15");
        assert_eq!(value["removed"], false);
    }

    #[test]
    fn reply_serializes_with_parent_id() {
        let parent = Uuid::new_v4();
        let comment = Comment {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            comment_id: Some(parent),
            content: "a reply".to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
            updated_at: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
            removed: false,
        };

        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(value["comment_id"], parent.to_string());
    }
}
