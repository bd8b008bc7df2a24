//! Posts controller: creation, listing, owner-gated updates and removal

use tracing::info;
use uuid::Uuid;

use crate::controllers::today;
use crate::error::{ApiError, ApiResult};
use crate::models::Post;
use crate::repositories::{AccountRepository, FieldValue, PostRepository};

/// Posts controller
#[derive(Clone)]
pub struct PostsController {
    post_repository: PostRepository,
    account_repository: AccountRepository,
}

impl PostsController {
    /// Create a new posts controller
    pub fn new(post_repository: PostRepository, account_repository: AccountRepository) -> Self {
        Self {
            post_repository,
            account_repository,
        }
    }

    /// Create a post for the requesting account
    pub async fn insert_post(&self, account_id: Uuid, content: String) -> ApiResult<Post> {
        if !self.account_repository.exists_by_id(account_id).await? {
            return Err(ApiError::NotFoundAccountId);
        }

        let now = today();
        let post = Post {
            id: Uuid::new_v4(),
            account_id,
            content,
            created_at: now,
            updated_at: now,
            removed: false,
        };

        self.post_repository.insert(&post).await?;
        info!("post {} created by account {}", post.id, account_id);

        Ok(post)
    }

    /// Non-removed posts of an account, one page at a time
    pub async fn find_posts_by_account_id(
        &self,
        account_id: Uuid,
        page: i64,
    ) -> ApiResult<Vec<Post>> {
        if !self.account_repository.exists_by_id(account_id).await? {
            return Err(ApiError::NotFoundAccountId);
        }

        Ok(self
            .post_repository
            .find_by_account_id(account_id, page)
            .await?)
    }

    /// Update a post's content; only the owner may do this
    pub async fn update_post_data_by_id(
        &self,
        account_id: Uuid,
        post_id: Uuid,
        content: String,
    ) -> ApiResult<Post> {
        let mut tx = self.post_repository.pool().begin().await?;

        let mut post = self
            .post_repository
            .find_by_id_for_update(&mut *tx, post_id)
            .await?
            .ok_or(ApiError::NotFoundPostId)?;

        if post.account_id != account_id {
            return Err(ApiError::UnauthorizedAccountId);
        }

        post.content = content.clone();
        post.updated_at = today();

        let fields = vec![
            ("content", FieldValue::Text(content)),
            ("updated_at", FieldValue::Date(post.updated_at)),
        ];

        self.post_repository
            .change_data_by_id(&mut *tx, post_id, &fields)
            .await?;
        tx.commit().await?;

        Ok(post)
    }

    /// Soft-delete a post; only the owner may do this
    pub async fn remove_post_by_id(&self, account_id: Uuid, post_id: Uuid) -> ApiResult<Post> {
        let mut tx = self.post_repository.pool().begin().await?;

        let mut post = self
            .post_repository
            .find_by_id_for_update(&mut *tx, post_id)
            .await?
            .ok_or(ApiError::NotFoundPostId)?;

        if post.account_id != account_id {
            return Err(ApiError::UnauthorizedAccountId);
        }

        self.post_repository.delete_by_id(&mut *tx, post_id).await?;
        tx.commit().await?;

        post.removed = true;
        info!("post {} soft-deleted by account {}", post_id, account_id);

        Ok(post)
    }
}
