//! Post repository for database operations

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::Post;
use crate::repositories::{FieldValue, PAGE_SIZE, bind_fields, build_update_query, page_offset};

/// Post repository
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connection pool, for controllers that open transactions
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Persist a new post
    pub async fn insert(&self, post: &Post) -> Result<(), sqlx::Error> {
        info!("Inserting post {} for account {}", post.id, post.account_id);

        sqlx::query(
            r#"
            INSERT INTO post (id, account_id, content, created_at, updated_at, removed)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id)
        .bind(post.account_id)
        .bind(&post.content)
        .bind(post.created_at)
        .bind(post.updated_at)
        .bind(post.removed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Direct lookup by id; removed posts are still retrievable this way
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, account_id, content, created_at, updated_at, removed
            FROM post
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Whether a non-removed post with this id exists
    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let found: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM post
            WHERE id = $1
            AND removed = false
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Non-removed posts of an account, newest first
    pub async fn find_by_account_id(
        &self,
        account_id: Uuid,
        page: i64,
    ) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, account_id, content, created_at, updated_at, removed
            FROM post
            WHERE account_id = $1
            AND removed = false
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(account_id)
        .bind(PAGE_SIZE)
        .bind(page_offset(page))
        .fetch_all(&self.pool)
        .await
    }

    /// Load a post inside a transaction, locking the row
    pub async fn find_by_id_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, account_id, content, created_at, updated_at, removed
            FROM post
            WHERE id = $1
            AND removed = false
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Apply a partial update to the supplied fields only
    pub async fn change_data_by_id(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        fields: &[(&str, FieldValue)],
    ) -> Result<u64, sqlx::Error> {
        let sql = build_update_query("post", fields, "removed");
        let result = bind_fields(sqlx::query(&sql), fields)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Soft-delete a post
    pub async fn delete_by_id(&self, conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE post
            SET removed = true
            WHERE id = $1
            AND removed = false
            "#,
        )
        .bind(id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
