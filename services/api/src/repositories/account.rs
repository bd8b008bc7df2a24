//! Account repository for database operations

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::{Account, AccountResponse};
use crate::repositories::{FieldValue, PAGE_SIZE, bind_fields, build_update_query, page_offset};

/// Account repository
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connection pool, for controllers that open transactions
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Persist a new account
    pub async fn insert(&self, account: &Account) -> Result<(), sqlx::Error> {
        info!("Inserting account: {}", account.username);

        sqlx::query(
            r#"
            INSERT INTO account (id, username, name, description, email, password, created_at, updated_at, deleted)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.name)
        .bind(&account.description)
        .bind(&account.email)
        .bind(&account.password)
        .bind(account.created_at)
        .bind(account.updated_at)
        .bind(account.deleted)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find an account by id; deleted accounts are excluded
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, name, description, email, password, created_at, updated_at, deleted
            FROM account
            WHERE id = $1
            AND deleted = false
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find the id of the account registered under an email
    pub async fn find_id_by_email(&self, email: &str) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT id
            FROM account
            WHERE email = $1
            AND deleted = false
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find the stored password hash for an email
    pub async fn find_password_by_email(&self, email: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT password
            FROM account
            WHERE email = $1
            AND deleted = false
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Whether a non-deleted account with this id exists
    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let found: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM account
            WHERE id = $1
            AND deleted = false
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Whether a non-deleted account with this username exists
    pub async fn exists_by_username(&self, username: &str) -> Result<bool, sqlx::Error> {
        let found: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM account
            WHERE username = $1
            AND deleted = false
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Whether a non-deleted account with this email exists
    pub async fn exists_by_email(&self, email: &str) -> Result<bool, sqlx::Error> {
        let found: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM account
            WHERE email = $1
            AND deleted = false
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Load an account inside a transaction, locking the row
    pub async fn find_by_id_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, name, description, email, password, created_at, updated_at, deleted
            FROM account
            WHERE id = $1
            AND deleted = false
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
        let sql = build_update_query("account", fields, "deleted");
        let result = bind_fields(sqlx::query(&sql), fields)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Soft-delete an account
    pub async fn delete_by_id(&self, conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE account
            SET deleted = true
            WHERE id = $1
            AND deleted = false
            "#,
        )
        .bind(id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Record a follow relationship
    pub async fn insert_follow(
        &self,
        account_id: Uuid,
        account_id_followed: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO account_follow (account_id, account_id_followed, unfollowed)
            VALUES ($1, $2, false)
            "#,
        )
        .bind(account_id)
        .bind(account_id_followed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Reset the unfollowed flag on an existing relationship (re-follow)
    pub async fn restore_follow(
        &self,
        account_id: Uuid,
        account_id_followed: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE account_follow
            SET unfollowed = false
            WHERE account_id = $1
            AND account_id_followed = $2
            "#,
        )
        .bind(account_id)
        .bind(account_id_followed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Whether a follow row exists for this pair, regardless of its flag
    pub async fn exists_follow(
        &self,
        account_id: Uuid,
        account_id_followed: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let found: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT account_id
            FROM account_follow
            WHERE account_id = $1
            AND account_id_followed = $2
            "#,
        )
        .bind(account_id)
        .bind(account_id_followed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Accounts this account follows, newest first
    pub async fn find_following(
        &self,
        account_id: Uuid,
        page: i64,
    ) -> Result<Vec<AccountResponse>, sqlx::Error> {
        sqlx::query_as::<_, AccountResponse>(
            r#"
            SELECT account.id, account.username, account.name, account.description, account.email,
                   account.created_at, account.updated_at, account.deleted
            FROM account_follow
            INNER JOIN account ON account_follow.account_id_followed = account.id
            WHERE account_follow.account_id = $1
            AND account_follow.unfollowed = false
            AND account.deleted = false
            ORDER BY account.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(account_id)
        .bind(PAGE_SIZE)
        .bind(page_offset(page))
        .fetch_all(&self.pool)
        .await
    }

    /// Accounts following this account, newest first
    pub async fn find_followers(
        &self,
        account_id: Uuid,
        page: i64,
    ) -> Result<Vec<AccountResponse>, sqlx::Error> {
        sqlx::query_as::<_, AccountResponse>(
            r#"
            SELECT account.id, account.username, account.name, account.description, account.email,
                   account.created_at, account.updated_at, account.deleted
            FROM account_follow
            INNER JOIN account ON account_follow.account_id = account.id
            WHERE account_follow.account_id_followed = $1
            AND account_follow.unfollowed = false
            AND account.deleted = false
            ORDER BY account.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(account_id)
        .bind(PAGE_SIZE)
        .bind(page_offset(page))
        .fetch_all(&self.pool)
        .await
    }

    /// Soft-remove a follow relationship
    pub async fn delete_follow(
        &self,
        account_id: Uuid,
        account_id_followed: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE account_follow
            SET unfollowed = true
            WHERE account_id = $1
            AND account_id_followed = $2
            AND unfollowed = false
            "#,
        )
        .bind(account_id)
        .bind(account_id_followed)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
