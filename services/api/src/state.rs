//! Application state shared across handlers

use common::cache::RedisPool;

use crate::config::AppConfig;
use crate::controllers::{AccountsController, CommentsController, PostsController};
use crate::jwt::JwtService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub redis_pool: RedisPool,
    pub jwt_service: JwtService,
    pub accounts_controller: AccountsController,
    pub posts_controller: PostsController,
    pub comments_controller: CommentsController,
}
