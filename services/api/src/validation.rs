//! Input validation utilities
//!
//! Field validators return a message per failing field; handlers collect
//! them into the `{"errors": {...}}` body of a 400 response. Page validation
//! happens here too, before any data access.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::{ApiError, ApiResult};
use crate::models::{NewAccountRequest, UpdateAccountRequest};
use crate::repositories::MAX_PAGE;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate post or comment content
pub fn validate_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Content is required".to_string());
    }

    if content.len() > 4096 {
        return Err("Content must be at most 4096 characters long".to_string());
    }

    Ok(())
}

/// Validate an account creation payload, collecting every failing field
pub fn validate_new_account(payload: &NewAccountRequest) -> ApiResult<()> {
    let mut errors = BTreeMap::new();

    if let Err(msg) = validate_username(&payload.username) {
        errors.insert("username".to_string(), msg);
    }
    if let Err(msg) = validate_email(&payload.email) {
        errors.insert("email".to_string(), msg);
    }
    if let Err(msg) = validate_password(&payload.password) {
        errors.insert("password".to_string(), msg);
    }
    if payload.name.trim().is_empty() {
        errors.insert("name".to_string(), "Name is required".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Validate an account partial-update payload; only supplied fields checked
pub fn validate_update_account(payload: &UpdateAccountRequest) -> ApiResult<()> {
    let mut errors = BTreeMap::new();

    if let Some(username) = &payload.username {
        if let Err(msg) = validate_username(username) {
            errors.insert("username".to_string(), msg);
        }
    }
    if let Some(email) = &payload.email {
        if let Err(msg) = validate_email(email) {
            errors.insert("email".to_string(), msg);
        }
    }
    if let Some(password) = &payload.password {
        if let Err(msg) = validate_password(password) {
            errors.insert("password".to_string(), msg);
        }
    }
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            errors.insert("name".to_string(), "Name is required".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Validate content for create/update payloads as a field-error map
pub fn validate_content_field(content: &str) -> ApiResult<()> {
    let mut errors = BTreeMap::new();
    if let Err(msg) = validate_content(content) {
        errors.insert("content".to_string(), msg);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Parse the page token into a positive page number
///
/// The token is a stringified positive integer; anything else is rejected
/// before reaching the data layer. An absent token means page 1. Pages past
/// [`MAX_PAGE`] are rejected too, so the derived offset always fits in an
/// i64.
pub fn parse_page(page: Option<&str>) -> ApiResult<i64> {
    let raw = page.unwrap_or("1");
    match raw.parse::<i64>() {
        Ok(n) if n > 0 && n <= MAX_PAGE => Ok(n),
        Ok(_) => Err(ApiError::BadRequest("Page is not a number".to_string())),
        Err(_) => Err(ApiError::BadRequest("Page is not a number".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("marcelito001").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("marcelo111@gmail.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("x@y").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("long enough").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn content_rules() {
        assert!(validate_content("hello").is_ok());
        assert!(validate_content("   ").is_err());
        assert!(validate_content(&"x".repeat(5000)).is_err());
    }

    #[test]
    fn page_accepts_positive_integers() {
        assert_eq!(parse_page(Some("1")).unwrap(), 1);
        assert_eq!(parse_page(Some("42")).unwrap(), 42);
        assert_eq!(parse_page(None).unwrap(), 1);
    }

    #[test]
    fn page_rejects_non_numeric_and_non_positive() {
        assert!(parse_page(Some("abc")).is_err());
        assert!(parse_page(Some("")).is_err());
        assert!(parse_page(Some("0")).is_err());
        assert!(parse_page(Some("-3")).is_err());
        assert!(parse_page(Some("1.5")).is_err());
    }

    #[test]
    fn page_rejects_values_whose_offset_would_overflow() {
        assert_eq!(parse_page(Some(&MAX_PAGE.to_string())).unwrap(), MAX_PAGE);
        assert!(parse_page(Some(&(MAX_PAGE + 1).to_string())).is_err());
        assert!(parse_page(Some("9223372036854775807")).is_err());
    }

    #[test]
    fn new_account_collects_all_failing_fields() {
        let payload = NewAccountRequest {
            username: "".to_string(),
            name: "".to_string(),
            description: "".to_string(),
            email: "bad".to_string(),
            password: "x".to_string(),
        };

        match validate_new_account(&payload) {
            Err(crate::error::ApiError::Validation(fields)) => {
                assert!(fields.contains_key("username"));
                assert!(fields.contains_key("email"));
                assert!(fields.contains_key("password"));
                assert!(fields.contains_key("name"));
            }
            other => panic!("expected validation failure, got {:?}", other.err()),
        }
    }
}
