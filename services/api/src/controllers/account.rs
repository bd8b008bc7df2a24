//! Accounts controller: registration, login, profile updates, follows

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use tracing::info;
use uuid::Uuid;

use crate::controllers::today;
use crate::error::{ApiError, ApiResult};
use crate::jwt::JwtService;
use crate::models::{Account, AccountResponse, LoginRequest, NewAccountRequest, Token, UpdateAccountRequest};
use crate::repositories::{AccountRepository, FieldValue};

/// Accounts controller
#[derive(Clone)]
pub struct AccountsController {
    account_repository: AccountRepository,
    jwt_service: JwtService,
}

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| ApiError::Internal)?
        .to_string();
    Ok(hash)
}

fn verify_password(stored_hash: &str, password: &str) -> ApiResult<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| ApiError::Internal)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl AccountsController {
    /// Create a new accounts controller
    pub fn new(account_repository: AccountRepository, jwt_service: JwtService) -> Self {
        Self {
            account_repository,
            jwt_service,
        }
    }

    /// Register a new account
    ///
    /// Username and email must be unique among non-deleted accounts; the
    /// password is hashed before it reaches storage.
    pub async fn insert_account(&self, payload: NewAccountRequest) -> ApiResult<AccountResponse> {
        if self
            .account_repository
            .exists_by_username(&payload.username)
            .await?
        {
            return Err(ApiError::Conflict("username already exists".to_string()));
        }

        if self
            .account_repository
            .exists_by_email(&payload.email)
            .await?
        {
            return Err(ApiError::Conflict("email already exists".to_string()));
        }

        let now = today();
        let account = Account {
            id: Uuid::new_v4(),
            username: payload.username,
            name: payload.name,
            description: payload.description,
            email: payload.email,
            password: hash_password(&payload.password)?,
            created_at: now,
            updated_at: now,
            deleted: false,
        };

        self.account_repository.insert(&account).await?;
        info!("account {} registered", account.id);

        Ok(account.to_response())
    }

    /// Issue a token for valid credentials
    pub async fn create_token(&self, payload: LoginRequest) -> ApiResult<Token> {
        let stored_hash = self
            .account_repository
            .find_password_by_email(&payload.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !verify_password(&stored_hash, &payload.password)? {
            return Err(ApiError::InvalidCredentials);
        }

        let account_id = self
            .account_repository
            .find_id_by_email(&payload.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        self.jwt_service.create_token(account_id)
    }

    /// Load the requester's own account
    pub async fn find_account_by_id(&self, id: Uuid) -> ApiResult<AccountResponse> {
        let account = self
            .account_repository
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFoundAccountId)?;

        Ok(account.to_response())
    }

    /// Apply a partial update to the requester's account
    ///
    /// Only supplied fields change; `updated_at` always follows. Username
    /// and email uniqueness is re-checked when those fields change.
    pub async fn change_account_data_by_id(
        &self,
        id: Uuid,
        payload: UpdateAccountRequest,
    ) -> ApiResult<AccountResponse> {
        let mut tx = self.account_repository.pool().begin().await?;

        let mut account = self
            .account_repository
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(ApiError::NotFoundAccountId)?;

        let mut fields: Vec<(&str, FieldValue)> = Vec::new();

        if let Some(username) = payload.username {
            if username != account.username
                && self.account_repository.exists_by_username(&username).await?
            {
                return Err(ApiError::Conflict("username already exists".to_string()));
            }
            account.username = username.clone();
            fields.push(("username", FieldValue::Text(username)));
        }
        if let Some(name) = payload.name {
            account.name = name.clone();
            fields.push(("name", FieldValue::Text(name)));
        }
        if let Some(description) = payload.description {
            account.description = description.clone();
            fields.push(("description", FieldValue::Text(description)));
        }
        if let Some(email) = payload.email {
            if email != account.email && self.account_repository.exists_by_email(&email).await? {
                return Err(ApiError::Conflict("email already exists".to_string()));
            }
            account.email = email.clone();
            fields.push(("email", FieldValue::Text(email)));
        }
        if let Some(password) = payload.password {
            let hash = hash_password(&password)?;
            account.password = hash.clone();
            fields.push(("password", FieldValue::Text(hash)));
        }

        if fields.is_empty() {
            return Err(ApiError::BadRequest("no fields to update".to_string()));
        }

        account.updated_at = today();
        fields.push(("updated_at", FieldValue::Date(account.updated_at)));

        self.account_repository
            .change_data_by_id(&mut *tx, id, &fields)
            .await?;
        tx.commit().await?;

        Ok(account.to_response())
    }

    /// Soft-delete the requester's account
    pub async fn delete_account_by_id(&self, id: Uuid) -> ApiResult<AccountResponse> {
        let mut tx = self.account_repository.pool().begin().await?;

        let mut account = self
            .account_repository
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(ApiError::NotFoundAccountId)?;

        self.account_repository.delete_by_id(&mut *tx, id).await?;
        tx.commit().await?;

        account.deleted = true;
        info!("account {} soft-deleted", id);

        Ok(account.to_response())
    }

    /// Follow another account; re-following resets a previous unfollow
    pub async fn follow(&self, account_id: Uuid, account_id_followed: Uuid) -> ApiResult<()> {
        if account_id == account_id_followed {
            return Err(ApiError::BadRequest(
                "an account cannot follow itself".to_string(),
            ));
        }

        if !self
            .account_repository
            .exists_by_id(account_id_followed)
            .await?
        {
            return Err(ApiError::NotFoundAccountId);
        }

        if self
            .account_repository
            .exists_follow(account_id, account_id_followed)
            .await?
        {
            self.account_repository
                .restore_follow(account_id, account_id_followed)
                .await?;
        } else {
            self.account_repository
                .insert_follow(account_id, account_id_followed)
                .await?;
        }

        Ok(())
    }

    /// Soft-remove a follow relationship
    pub async fn unfollow(&self, account_id: Uuid, account_id_followed: Uuid) -> ApiResult<()> {
        if !self
            .account_repository
            .exists_by_id(account_id_followed)
            .await?
        {
            return Err(ApiError::NotFoundAccountId);
        }

        let affected = self
            .account_repository
            .delete_follow(account_id, account_id_followed)
            .await?;

        if affected == 0 {
            return Err(ApiError::BadRequest(
                "follow relationship does not exist".to_string(),
            ));
        }

        Ok(())
    }

    /// Accounts following the requester, one page at a time
    pub async fn find_followers(&self, account_id: Uuid, page: i64) -> ApiResult<Vec<AccountResponse>> {
        if !self.account_repository.exists_by_id(account_id).await? {
            return Err(ApiError::NotFoundAccountId);
        }

        Ok(self.account_repository.find_followers(account_id, page).await?)
    }

    /// Accounts the requester follows, one page at a time
    pub async fn find_following(&self, account_id: Uuid, page: i64) -> ApiResult<Vec<AccountResponse>> {
        if !self.account_repository.exists_by_id(account_id).await? {
            return Err(ApiError::NotFoundAccountId);
        }

        Ok(self.account_repository.find_following(account_id, page).await?)
    }
}
