//! HashTag repository
//!
//! Database operations for hashtags and their association with articles.
//!
//! This module provides:
//! - `HashTagRepository` trait defining the interface for hashtag data access
//! - `SqlxHashTagRepository` implementing the trait for SQLite and MySQL

use crate::db::{Backend, DynDatabasePool};
use crate::models::HashTag;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// HashTag repository trait
#[async_trait]
pub trait HashTagRepository: Send + Sync {
    /// Return the hashtag with this exact text, creating it if needed
    async fn get_or_create(&self, tag: &str) -> Result<HashTag>;

    /// Look up a hashtag by its exact text
    async fn get_by_tag(&self, tag: &str) -> Result<Option<HashTag>>;

    /// Hashtags associated with an article, in the order they were linked
    async fn get_by_article_id(&self, article_id: i64) -> Result<Vec<HashTag>>;

    /// Replace every association of an article with the given tag texts
    async fn replace_for_article(&self, article_id: i64, tags: &[String]) -> Result<Vec<HashTag>>;
}

/// SQLx-based hashtag repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxHashTagRepository {
    pool: DynDatabasePool,
}

impl SqlxHashTagRepository {
    /// Create a new SQLx hashtag repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn HashTagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl HashTagRepository for SqlxHashTagRepository {
    async fn get_or_create(&self, tag: &str) -> Result<HashTag> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_or_create_sqlite(pool, tag).await,
            Backend::Mysql(pool) => get_or_create_mysql(pool, tag).await,
        }
    }

    async fn get_by_tag(&self, tag: &str) -> Result<Option<HashTag>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_by_tag_sqlite(pool, tag).await,
            Backend::Mysql(pool) => get_by_tag_mysql(pool, tag).await,
        }
    }

    async fn get_by_article_id(&self, article_id: i64) -> Result<Vec<HashTag>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_by_article_sqlite(pool, article_id).await,
            Backend::Mysql(pool) => get_by_article_mysql(pool, article_id).await,
        }
    }

    async fn replace_for_article(&self, article_id: i64, tags: &[String]) -> Result<Vec<HashTag>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => replace_for_article_sqlite(pool, article_id, tags).await,
            Backend::Mysql(pool) => replace_for_article_mysql(pool, article_id, tags).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn get_or_create_sqlite(pool: &SqlitePool, tag: &str) -> Result<HashTag> {
    sqlx::query("INSERT OR IGNORE INTO hashtags (tag, created_at) VALUES (?, ?)")
        .bind(tag)
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to create hashtag")?;

    get_by_tag_sqlite(pool, tag)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Hashtag missing after insert: {}", tag))
}

async fn get_by_tag_sqlite(pool: &SqlitePool, tag: &str) -> Result<Option<HashTag>> {
    let row = sqlx::query("SELECT id, tag, created_at FROM hashtags WHERE tag = ?")
        .bind(tag)
        .fetch_optional(pool)
        .await
        .context("Failed to get hashtag by tag")?;

    Ok(row.map(|row| row_to_hashtag_sqlite(&row)))
}

async fn get_by_article_sqlite(pool: &SqlitePool, article_id: i64) -> Result<Vec<HashTag>> {
    let rows = sqlx::query(
        r#"
        SELECT h.id, h.tag, h.created_at
        FROM hashtags h
        INNER JOIN article_hashtags ah ON h.id = ah.hashtag_id
        WHERE ah.article_id = ?
        ORDER BY ah.position ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to get hashtags for article")?;

    Ok(rows.iter().map(row_to_hashtag_sqlite).collect())
}

async fn replace_for_article_sqlite(
    pool: &SqlitePool,
    article_id: i64,
    tags: &[String],
) -> Result<Vec<HashTag>> {
    sqlx::query("DELETE FROM article_hashtags WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await
        .context("Failed to clear article hashtags")?;

    let mut linked = Vec::with_capacity(tags.len());
    for (position, tag) in tags.iter().enumerate() {
        let hashtag = get_or_create_sqlite(pool, tag).await?;
        sqlx::query(
            "INSERT OR IGNORE INTO article_hashtags (article_id, hashtag_id, position) VALUES (?, ?, ?)",
        )
        .bind(article_id)
        .bind(hashtag.id)
        .bind(position as i64)
        .execute(pool)
        .await
        .context("Failed to link hashtag to article")?;
        linked.push(hashtag);
    }

    Ok(linked)
}

fn row_to_hashtag_sqlite(row: &sqlx::sqlite::SqliteRow) -> HashTag {
    HashTag {
        id: row.get("id"),
        tag: row.get("tag"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn get_or_create_mysql(pool: &MySqlPool, tag: &str) -> Result<HashTag> {
    sqlx::query("INSERT IGNORE INTO hashtags (tag, created_at) VALUES (?, ?)")
        .bind(tag)
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to create hashtag")?;

    get_by_tag_mysql(pool, tag)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Hashtag missing after insert: {}", tag))
}

async fn get_by_tag_mysql(pool: &MySqlPool, tag: &str) -> Result<Option<HashTag>> {
    let row = sqlx::query("SELECT id, tag, created_at FROM hashtags WHERE tag = ?")
        .bind(tag)
        .fetch_optional(pool)
        .await
        .context("Failed to get hashtag by tag")?;

    Ok(row.map(|row| row_to_hashtag_mysql(&row)))
}

async fn get_by_article_mysql(pool: &MySqlPool, article_id: i64) -> Result<Vec<HashTag>> {
    let rows = sqlx::query(
        r#"
        SELECT h.id, h.tag, h.created_at
        FROM hashtags h
        INNER JOIN article_hashtags ah ON h.id = ah.hashtag_id
        WHERE ah.article_id = ?
        ORDER BY ah.position ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to get hashtags for article")?;

    Ok(rows.iter().map(row_to_hashtag_mysql).collect())
}

async fn replace_for_article_mysql(
    pool: &MySqlPool,
    article_id: i64,
    tags: &[String],
) -> Result<Vec<HashTag>> {
    sqlx::query("DELETE FROM article_hashtags WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await
        .context("Failed to clear article hashtags")?;

    let mut linked = Vec::with_capacity(tags.len());
    for (position, tag) in tags.iter().enumerate() {
        let hashtag = get_or_create_mysql(pool, tag).await?;
        sqlx::query(
            "INSERT IGNORE INTO article_hashtags (article_id, hashtag_id, position) VALUES (?, ?, ?)",
        )
        .bind(article_id)
        .bind(hashtag.id)
        .bind(position as i64)
        .execute(pool)
        .await
        .context("Failed to link hashtag to article")?;
        linked.push(hashtag);
    }

    Ok(linked)
}

fn row_to_hashtag_mysql(row: &sqlx::mysql::MySqlRow) -> HashTag {
    HashTag {
        id: row.get("id"),
        tag: row.get("tag"),
        created_at: row.get("created_at"),
    }
}
