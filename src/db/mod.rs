//! Database layer
//!
//! This module provides database abstraction for the community board.
//! It supports:
//! - SQLite (default, single-file deployment)
//! - MySQL
//!
//! The database driver is selected based on configuration.
//!
//! # Architecture
//!
//! The database layer uses a trait-based abstraction (`DatabasePool`) that
//! allows the application to work with either SQLite or MySQL without
//! knowing the specific backend. Repositories match on
//! [`DatabasePool::backend`] to choose the SQL dialect.
//!
//! # Usage
//!
//! ```ignore
//! use community::config::DatabaseConfig;
//! use community::db::{create_pool, migrations};
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, Backend, DatabasePool, DynDatabasePool, MysqlDatabase,
    SqliteDatabase,
};
