//! Entity and payload models for the API service

pub mod account;
pub mod comment;
pub mod post;
pub mod token;

// Re-export for convenience
pub use account::{Account, AccountResponse, LoginRequest, NewAccountRequest, UpdateAccountRequest};
pub use comment::{Comment, CommentQuery, NewCommentRequest, TargetCommentRequest};
pub use post::{NewPostRequest, Post, PostQuery, TargetPostRequest};
pub use token::Token;
