//! Board repository
//!
//! Database operations for boards.
//!
//! This module provides:
//! - `BoardRepository` trait defining the interface for board data access
//! - `SqlxBoardRepository` implementing the trait for SQLite and MySQL

use crate::db::{Backend, DynDatabasePool};
use crate::models::Board;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Board repository trait
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Create a new board
    async fn create(&self, name: &str) -> Result<Board>;

    /// Get board by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Board>>;

    /// List all boards in insertion order
    async fn list(&self) -> Result<Vec<Board>>;

    /// Check if a board with exactly this name exists
    async fn exists_by_name(&self, name: &str) -> Result<bool>;
}

/// SQLx-based board repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxBoardRepository {
    pool: DynDatabasePool,
}

impl SqlxBoardRepository {
    /// Create a new SQLx board repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BoardRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BoardRepository for SqlxBoardRepository {
    async fn create(&self, name: &str) -> Result<Board> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => create_board_sqlite(pool, name).await,
            Backend::Mysql(pool) => create_board_mysql(pool, name).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Board>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_board_by_id_sqlite(pool, id).await,
            Backend::Mysql(pool) => get_board_by_id_mysql(pool, id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Board>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => list_boards_sqlite(pool).await,
            Backend::Mysql(pool) => list_boards_mysql(pool).await,
        }
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => exists_by_name_sqlite(pool, name).await,
            Backend::Mysql(pool) => exists_by_name_mysql(pool, name).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_board_sqlite(pool: &SqlitePool, name: &str) -> Result<Board> {
    let now = Utc::now();

    let result = sqlx::query("INSERT INTO boards (name, created_at) VALUES (?, ?)")
        .bind(name)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create board")?;

    Ok(Board {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        created_at: now,
    })
}

async fn get_board_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Board>> {
    let row = sqlx::query("SELECT id, name, created_at FROM boards WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get board by ID")?;

    Ok(row.map(|row| row_to_board_sqlite(&row)))
}

async fn list_boards_sqlite(pool: &SqlitePool) -> Result<Vec<Board>> {
    let rows = sqlx::query("SELECT id, name, created_at FROM boards ORDER BY id ASC")
        .fetch_all(pool)
        .await
        .context("Failed to list boards")?;

    Ok(rows.iter().map(row_to_board_sqlite).collect())
}

async fn exists_by_name_sqlite(pool: &SqlitePool, name: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM boards WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await
        .context("Failed to check board name")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

fn row_to_board_sqlite(row: &sqlx::sqlite::SqliteRow) -> Board {
    Board {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_board_mysql(pool: &MySqlPool, name: &str) -> Result<Board> {
    let now = Utc::now();

    let result = sqlx::query("INSERT INTO boards (name, created_at) VALUES (?, ?)")
        .bind(name)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create board")?;

    Ok(Board {
        id: result.last_insert_id() as i64,
        name: name.to_string(),
        created_at: now,
    })
}

async fn get_board_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Board>> {
    let row = sqlx::query("SELECT id, name, created_at FROM boards WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get board by ID")?;

    Ok(row.map(|row| row_to_board_mysql(&row)))
}

async fn list_boards_mysql(pool: &MySqlPool) -> Result<Vec<Board>> {
    let rows = sqlx::query("SELECT id, name, created_at FROM boards ORDER BY id ASC")
        .fetch_all(pool)
        .await
        .context("Failed to list boards")?;

    Ok(rows.iter().map(row_to_board_mysql).collect())
}

async fn exists_by_name_mysql(pool: &MySqlPool, name: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM boards WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await
        .context("Failed to check board name")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

fn row_to_board_mysql(row: &sqlx::mysql::MySqlRow) -> Board {
    Board {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}
