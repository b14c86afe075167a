//! Comment repository

use crate::db::{Backend, DynDatabasePool};
use crate::models::{Comment, CreateCommentInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;
    /// Comments of one article in insertion order
    async fn list_by_article(&self, article_id: i64) -> Result<Vec<Comment>>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => create_comment_sqlite(pool, input).await,
            Backend::Mysql(pool) => create_comment_mysql(pool, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_comment_by_id_sqlite(pool, id).await,
            Backend::Mysql(pool) => get_comment_by_id_mysql(pool, id).await,
        }
    }

    async fn list_by_article(&self, article_id: i64) -> Result<Vec<Comment>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => list_comments_sqlite(pool, article_id).await,
            Backend::Mysql(pool) => list_comments_mysql(pool, article_id).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => delete_comment_sqlite(pool, id).await,
            Backend::Mysql(pool) => delete_comment_mysql(pool, id).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_comment_sqlite(pool: &SqlitePool, input: &CreateCommentInput) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        "INSERT INTO comments (article_id, content, password, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(input.article_id)
    .bind(&input.content)
    .bind(&input.password)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_rowid(),
        article_id: input.article_id,
        content: input.content.clone(),
        password: input.password.clone(),
        created_at: now,
    })
}

async fn get_comment_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(
        "SELECT id, article_id, content, password, created_at FROM comments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get comment by ID")?;

    Ok(row.map(|row| row_to_comment_sqlite(&row)))
}

async fn list_comments_sqlite(pool: &SqlitePool, article_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, content, password, created_at
        FROM comments
        WHERE article_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    Ok(rows.iter().map(row_to_comment_sqlite).collect())
}

async fn delete_comment_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete comment")?;
    Ok(())
}

fn row_to_comment_sqlite(row: &sqlx::sqlite::SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        article_id: row.get("article_id"),
        content: row.get("content"),
        password: row.get("password"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_comment_mysql(pool: &MySqlPool, input: &CreateCommentInput) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        "INSERT INTO comments (article_id, content, password, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(input.article_id)
    .bind(&input.content)
    .bind(&input.password)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_id() as i64,
        article_id: input.article_id,
        content: input.content.clone(),
        password: input.password.clone(),
        created_at: now,
    })
}

async fn get_comment_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(
        "SELECT id, article_id, content, password, created_at FROM comments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get comment by ID")?;

    Ok(row.map(|row| row_to_comment_mysql(&row)))
}

async fn list_comments_mysql(pool: &MySqlPool, article_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, content, password, created_at
        FROM comments
        WHERE article_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    Ok(rows.iter().map(row_to_comment_mysql).collect())
}

async fn delete_comment_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete comment")?;
    Ok(())
}

fn row_to_comment_mysql(row: &sqlx::mysql::MySqlRow) -> Comment {
    Comment {
        id: row.get("id"),
        article_id: row.get("article_id"),
        content: row.get("content"),
        password: row.get("password"),
        created_at: row.get("created_at"),
    }
}
