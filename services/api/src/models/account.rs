//! Account model and related payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account entity
///
/// `deleted` is a soft-delete flag: deleted accounts stay in storage but are
/// excluded from lookup and existence queries.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub description: String,
    pub email: String,
    pub password: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub deleted: bool,
}

impl Account {
    /// Public representation, without the password hash
    pub fn to_response(&self) -> AccountResponse {
        AccountResponse {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted: self.deleted,
        }
    }
}

/// Account representation returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub description: String,
    pub email: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub deleted: bool,
}

/// Account creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccountRequest {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub email: String,
    pub password: String,
}

/// Account partial-update payload; only supplied fields change
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateAccountRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
