//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database and Redis cache are
//! properly configured and accessible. They only run when the corresponding
//! connection URLs are present in the environment.

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
    error::CacheError,
};
use sqlx::Row;

#[tokio::test]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("DATABASE_URL").is_err() || std::env::var("REDIS_URL").is_err() {
        eprintln!("skipping: DATABASE_URL and REDIS_URL not set");
        return Ok(());
    }

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    assert!(
        redis_pool.health_check().await?,
        "Redis health check failed"
    );

    let test_key = "integration_test_key";
    let test_value = "integration_test_value";

    redis_pool.set(test_key, test_value, Some(10)).await?;

    let retrieved_value = redis_pool.get(test_key).await?;
    assert_eq!(retrieved_value, test_value, "Redis SET/GET test failed");

    redis_pool.delete(test_key).await?;

    match redis_pool.get(test_key).await {
        Err(CacheError::Miss(_)) => {}
        other => panic!("expected a cache miss after delete, got {:?}", other.err()),
    }

    Ok(())
}
