//! Shared infrastructure for the social network backend
//!
//! This crate provides the pieces the API service builds on: PostgreSQL
//! connection pooling, the Redis cache client, and the infrastructure
//! error types.

pub mod cache;
pub mod database;
pub mod error;
