//! Comments controller
//!
//! The representative case of the request-scoped authorization logic:
//! referenced entities must exist before a comment is persisted, and only
//! the author may update or remove one. Removal is a soft delete; a removed
//! comment no longer matches the update/remove queries, so repeating the
//! removal reports NotFoundCommentId.

use tracing::info;
use uuid::Uuid;

use crate::controllers::today;
use crate::error::{ApiError, ApiResult};
use crate::models::Comment;
use crate::repositories::comment::CommentFilter;
use crate::repositories::{AccountRepository, CommentRepository, FieldValue, PostRepository};

/// Comments controller
#[derive(Clone)]
pub struct CommentsController {
    comment_repository: CommentRepository,
    post_repository: PostRepository,
    account_repository: AccountRepository,
}

impl CommentsController {
    /// Create a new comments controller
    pub fn new(
        comment_repository: CommentRepository,
        post_repository: PostRepository,
        account_repository: AccountRepository,
    ) -> Self {
        Self {
            comment_repository,
            post_repository,
            account_repository,
        }
    }

    /// Create a comment on a post, optionally as a reply to another comment
    pub async fn insert_comment(
        &self,
        account_id: Uuid,
        post_id: Uuid,
        parent_comment_id: Option<Uuid>,
        content: String,
    ) -> ApiResult<Comment> {
        if !self.account_repository.exists_by_id(account_id).await? {
            return Err(ApiError::NotFoundAccountId);
        }

        if !self.post_repository.exists_by_id(post_id).await? {
            return Err(ApiError::NotFoundPostId);
        }

        if let Some(parent_id) = parent_comment_id {
            if !self.comment_repository.exists_by_id(parent_id).await? {
                return Err(ApiError::NotFoundCommentId);
            }
        }

        let now = today();
        let comment = Comment {
            id: Uuid::new_v4(),
            account_id,
            post_id,
            comment_id: parent_comment_id,
            content,
            created_at: now,
            updated_at: now,
            removed: false,
        };

        self.comment_repository.insert(&comment).await?;
        info!(
            "comment {} created on post {} by account {}",
            comment.id, post_id, account_id
        );

        Ok(comment)
    }

    /// List comments by whichever filters are supplied
    ///
    /// With no filter at all, the requester's own comments are listed. Each
    /// supplied filter id must reference an existing entity; a dangling one
    /// maps to the corresponding not-found kind.
    pub async fn find_comments(
        &self,
        requester_id: Uuid,
        mut filter: CommentFilter,
        page: i64,
    ) -> ApiResult<Vec<Comment>> {
        if filter.account_id.is_none() && filter.post_id.is_none() && filter.comment_id.is_none() {
            filter.account_id = Some(requester_id);
        }

        if let Some(account_id) = filter.account_id {
            if !self.account_repository.exists_by_id(account_id).await? {
                return Err(ApiError::NotFoundAccountId);
            }
        }
        if let Some(post_id) = filter.post_id {
            if !self.post_repository.exists_by_id(post_id).await? {
                return Err(ApiError::NotFoundPostId);
            }
        }
        if let Some(comment_id) = filter.comment_id {
            if !self.comment_repository.exists_by_id(comment_id).await? {
                return Err(ApiError::NotFoundCommentId);
            }
        }

        Ok(self.comment_repository.find(&filter, page).await?)
    }

    /// Update a comment's content; only the author may do this
    pub async fn update_comment_data_by_id(
        &self,
        account_id: Uuid,
        comment_id: Uuid,
        content: String,
    ) -> ApiResult<Comment> {
        let mut tx = self.comment_repository.pool().begin().await?;

        let mut comment = self
            .comment_repository
            .find_by_id_for_update(&mut *tx, comment_id)
            .await?
            .ok_or(ApiError::NotFoundCommentId)?;

        if comment.account_id != account_id {
            return Err(ApiError::UnauthorizedAccountId);
        }

        comment.content = content.clone();
        comment.updated_at = today();

        let fields = vec![
            ("content", FieldValue::Text(content)),
            ("updated_at", FieldValue::Date(comment.updated_at)),
        ];

        self.comment_repository
            .change_data_by_id(&mut *tx, comment_id, &fields)
            .await?;
        tx.commit().await?;

        Ok(comment)
    }

    /// Soft-delete a comment; only the author may do this
    pub async fn remove_comment_by_id(
        &self,
        account_id: Uuid,
        comment_id: Uuid,
    ) -> ApiResult<Comment> {
        let mut tx = self.comment_repository.pool().begin().await?;

        let mut comment = self
            .comment_repository
            .find_by_id_for_update(&mut *tx, comment_id)
            .await?
            .ok_or(ApiError::NotFoundCommentId)?;

        if comment.account_id != account_id {
            return Err(ApiError::UnauthorizedAccountId);
        }

        self.comment_repository
            .delete_by_id(&mut *tx, comment_id)
            .await?;
        tx.commit().await?;

        comment.removed = true;
        info!(
            "comment {} soft-deleted by account {}",
            comment_id, account_id
        );

        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtService;
    use crate::models::NewAccountRequest;
    use serial_test::serial;
    use sqlx::PgPool;

    // Runs against a live database when DATABASE_URL is set; otherwise
    // a no-op. The schema in db/schema.sql must be loaded, minus the
    // UNIQUE constraints covered by the controller checks.
    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("DATABASE_URL").ok()?;
        PgPool::connect(&url).await.ok()
    }

    fn controllers(pool: &PgPool) -> (Harness, CommentsController) {
        let account_repository = crate::repositories::AccountRepository::new(pool.clone());
        let post_repository = crate::repositories::PostRepository::new(pool.clone());
        let comment_repository = CommentRepository::new(pool.clone());

        let accounts = crate::controllers::AccountsController::new(
            account_repository.clone(),
            JwtService::new("test-secret", 3600),
        );
        let posts = crate::controllers::PostsController::new(
            post_repository.clone(),
            account_repository.clone(),
        );
        let comments =
            CommentsController::new(comment_repository.clone(), post_repository, account_repository);

        (
            Harness {
                accounts,
                posts,
                comment_repository,
            },
            comments,
        )
    }

    struct Harness {
        accounts: crate::controllers::AccountsController,
        posts: crate::controllers::PostsController,
        comment_repository: CommentRepository,
    }

    impl Harness {
        async fn make_account(&self) -> Uuid {
            let tag = &Uuid::new_v4().simple().to_string()[..12];
            let account = self
                .accounts
                .insert_account(NewAccountRequest {
                    username: format!("user_{}", tag),
                    name: "Test Account".to_string(),
                    description: String::new(),
                    email: format!("{}@example.com", tag),
                    password: "long enough password".to_string(),
                })
                .await
                .expect("account creation");
            account.id
        }
    }

    #[tokio::test]
    #[serial]
    async fn comment_lifecycle_with_ownership_checks() {
        let Some(pool) = test_pool().await else {
            eprintln!("skipping: DATABASE_URL not set");
            return;
        };

        let (harness, comments) = controllers(&pool);

        let author = harness.make_account().await;
        let other = harness.make_account().await;

        let post = harness
            .posts
            .insert_post(author, "a post worth commenting on".to_string())
            .await
            .expect("post creation");

        // Create: the returned comment carries a fresh id and the author.
        let comment = comments
            .insert_comment(author, post.id, None, "first".to_string())
            .await
            .expect("comment creation");
        assert_eq!(comment.account_id, author);
        assert_ne!(comment.id, Uuid::nil());
        assert!(!comment.removed);

        // A reply must reference an existing parent.
        let reply = comments
            .insert_comment(other, post.id, Some(comment.id), "a reply".to_string())
            .await
            .expect("reply creation");
        assert_eq!(reply.comment_id, Some(comment.id));

        let dangling = Uuid::new_v4();
        let result = comments
            .insert_comment(other, post.id, Some(dangling), "orphan".to_string())
            .await;
        assert!(matches!(result, Err(ApiError::NotFoundCommentId)));

        // Only the author may update.
        let result = comments
            .update_comment_data_by_id(other, comment.id, "hijacked".to_string())
            .await;
        assert!(matches!(result, Err(ApiError::UnauthorizedAccountId)));

        let updated = comments
            .update_comment_data_by_id(author, comment.id, "edited".to_string())
            .await
            .expect("author update");
        assert_eq!(updated.content, "edited");
        assert_eq!(updated.post_id, post.id);

        // Re-read: only the supplied fields changed.
        let reread = harness
            .comment_repository
            .find_by_id(comment.id)
            .await
            .expect("lookup")
            .expect("comment present");
        assert_eq!(reread.content, "edited");
        assert_eq!(reread.created_at, comment.created_at);
        assert_eq!(reread.account_id, author);

        // Only the author may remove; removal is a soft delete.
        let result = comments.remove_comment_by_id(other, comment.id).await;
        assert!(matches!(result, Err(ApiError::UnauthorizedAccountId)));

        let removed = comments
            .remove_comment_by_id(author, comment.id)
            .await
            .expect("author removal");
        assert!(removed.removed);

        let reread = harness
            .comment_repository
            .find_by_id(comment.id)
            .await
            .expect("lookup")
            .expect("row still present after soft delete");
        assert!(reread.removed);

        // The removed comment no longer shows up in listings.
        let filter = CommentFilter {
            post_id: Some(post.id),
            ..CommentFilter::default()
        };
        let listed = comments
            .find_comments(author, filter, 1)
            .await
            .expect("listing");
        assert!(listed.iter().all(|c| c.id != comment.id));

        // Removing again reports not-found rather than succeeding silently.
        let result = comments.remove_comment_by_id(author, comment.id).await;
        assert!(matches!(result, Err(ApiError::NotFoundCommentId)));
    }

    #[tokio::test]
    #[serial]
    async fn comment_on_unknown_post_or_account_is_rejected() {
        let Some(pool) = test_pool().await else {
            eprintln!("skipping: DATABASE_URL not set");
            return;
        };

        let (harness, comments) = controllers(&pool);
        let author = harness.make_account().await;

        let result = comments
            .insert_comment(author, Uuid::new_v4(), None, "nowhere".to_string())
            .await;
        assert!(matches!(result, Err(ApiError::NotFoundPostId)));

        let post = harness
            .posts
            .insert_post(author, "target".to_string())
            .await
            .expect("post creation");

        let result = comments
            .insert_comment(Uuid::new_v4(), post.id, None, "ghost".to_string())
            .await;
        assert!(matches!(result, Err(ApiError::NotFoundAccountId)));
    }
}
