use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod cache;
mod config;
mod controllers;
mod error;
mod jwt;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;

use common::cache::{RedisConfig, RedisPool};
use common::database::{DatabaseConfig, health_check, init_pool};

use crate::config::AppConfig;
use crate::controllers::{AccountsController, CommentsController, PostsController};
use crate::jwt::JwtService;
use crate::repositories::{AccountRepository, CommentRepository, PostRepository};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting social network API service");

    // All environment lookups happen here, once
    let config = AppConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize Redis connection pool
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    // Initialize JWT service
    let jwt_service = JwtService::new(&config.jwt_secret, config.token_expiry_seconds);

    // Initialize repositories and controllers
    let account_repository = AccountRepository::new(pool.clone());
    let post_repository = PostRepository::new(pool.clone());
    let comment_repository = CommentRepository::new(pool.clone());

    let accounts_controller =
        AccountsController::new(account_repository.clone(), jwt_service.clone());
    let posts_controller =
        PostsController::new(post_repository.clone(), account_repository.clone());
    let comments_controller = CommentsController::new(
        comment_repository.clone(),
        post_repository.clone(),
        account_repository.clone(),
    );

    let bind_address = config.bind_address.clone();

    let app_state = AppState {
        config,
        redis_pool,
        jwt_service,
        accounts_controller,
        posts_controller,
        comments_controller,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Social network API listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
