//! Comment repository for database operations

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::Comment;
use crate::repositories::{FieldValue, PAGE_SIZE, bind_fields, build_update_query, page_offset};

/// Filters for the comment listing query; whichever ids are supplied become
/// WHERE conditions, in this order
#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub account_id: Option<Uuid>,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
}

/// Build the listing SELECT for the supplied filters
///
/// Conditions appear in account, post, parent-comment order, so the query
/// text is deterministic for a given filter set.
fn build_find_query(filter: &CommentFilter) -> String {
    let mut conditions = vec!["removed = false".to_string()];
    let mut position = 1;

    if filter.account_id.is_some() {
        conditions.push(format!("account_id = ${}", position));
        position += 1;
    }
    if filter.post_id.is_some() {
        conditions.push(format!("post_id = ${}", position));
        position += 1;
    }
    if filter.comment_id.is_some() {
        conditions.push(format!("comment_id = ${}", position));
        position += 1;
    }

    format!(
        "SELECT id, account_id, post_id, comment_id, content, created_at, updated_at, removed \
         FROM comment WHERE {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
        conditions.join(" AND "),
        position,
        position + 1
    )
}

/// Comment repository
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connection pool, for controllers that open transactions
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Persist a new comment
    pub async fn insert(&self, comment: &Comment) -> Result<(), sqlx::Error> {
        info!(
            "Inserting comment {} on post {} by account {}",
            comment.id, comment.post_id, comment.account_id
        );

        sqlx::query(
            r#"
            INSERT INTO comment (id, account_id, post_id, comment_id, content, created_at, updated_at, removed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(comment.id)
        .bind(comment.account_id)
        .bind(comment.post_id)
        .bind(comment.comment_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .bind(comment.removed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Direct lookup by id; removed comments are still retrievable this way
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, account_id, post_id, comment_id, content, created_at, updated_at, removed
            FROM comment
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Whether a non-removed comment with this id exists
    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let found: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM comment
            WHERE id = $1
            AND removed = false
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Non-removed comments matching the filter, newest first
    pub async fn find(&self, filter: &CommentFilter, page: i64) -> Result<Vec<Comment>, sqlx::Error> {
        let sql = build_find_query(filter);
        let mut query = sqlx::query_as::<_, Comment>(&sql);

        if let Some(account_id) = filter.account_id {
            query = query.bind(account_id);
        }
        if let Some(post_id) = filter.post_id {
            query = query.bind(post_id);
        }
        if let Some(comment_id) = filter.comment_id {
            query = query.bind(comment_id);
        }

        query
            .bind(PAGE_SIZE)
            .bind(page_offset(page))
            .fetch_all(&self.pool)
            .await
    }

    /// Load a comment inside a transaction, locking the row
    pub async fn find_by_id_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, account_id, post_id, comment_id, content, created_at, updated_at, removed
            FROM comment
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
        let sql = build_update_query("comment", fields, "removed");
        let result = bind_fields(sqlx::query(&sql), fields)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Soft-delete a comment
    pub async fn delete_by_id(&self, conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE comment
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_query_without_filters_only_guards_removed() {
        let sql = build_find_query(&CommentFilter::default());
        assert_eq!(
            sql,
            "SELECT id, account_id, post_id, comment_id, content, created_at, updated_at, removed \
             FROM comment WHERE removed = false ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn find_query_orders_filters_deterministically() {
        let filter = CommentFilter {
            account_id: Some(Uuid::new_v4()),
            post_id: Some(Uuid::new_v4()),
            comment_id: Some(Uuid::new_v4()),
        };
        let sql = build_find_query(&filter);
        assert_eq!(
            sql,
            "SELECT id, account_id, post_id, comment_id, content, created_at, updated_at, removed \
             FROM comment WHERE removed = false AND account_id = $1 AND post_id = $2 \
             AND comment_id = $3 ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        );
    }

    #[test]
    fn find_query_with_single_filter_numbers_binds_from_one() {
        let filter = CommentFilter {
            post_id: Some(Uuid::new_v4()),
            ..CommentFilter::default()
        };
        let sql = build_find_query(&filter);
        assert!(sql.contains("post_id = $1"));
        assert!(sql.contains("LIMIT $2 OFFSET $3"));
    }
}
