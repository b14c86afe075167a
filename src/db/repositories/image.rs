//! Article image repository
//!
//! Stores the links of uploaded image files. The files themselves are managed
//! by `services::storage::ImageStorage`.

use crate::db::{Backend, DynDatabasePool};
use crate::models::{ArticleImage, CreateArticleImageInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Article image repository trait
#[async_trait]
pub trait ArticleImageRepository: Send + Sync {
    /// Record a stored image for an article
    async fn create(&self, input: &CreateArticleImageInput) -> Result<ArticleImage>;

    /// Get image by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<ArticleImage>>;

    /// Images of one article in insertion order
    async fn list_by_article(&self, article_id: i64) -> Result<Vec<ArticleImage>>;

    /// Delete the image row
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based article image repository implementation
pub struct SqlxArticleImageRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleImageRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleImageRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleImageRepository for SqlxArticleImageRepository {
    async fn create(&self, input: &CreateArticleImageInput) -> Result<ArticleImage> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => create_image_sqlite(pool, input).await,
            Backend::Mysql(pool) => create_image_mysql(pool, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ArticleImage>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_image_by_id_sqlite(pool, id).await,
            Backend::Mysql(pool) => get_image_by_id_mysql(pool, id).await,
        }
    }

    async fn list_by_article(&self, article_id: i64) -> Result<Vec<ArticleImage>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => list_images_sqlite(pool, article_id).await,
            Backend::Mysql(pool) => list_images_mysql(pool, article_id).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => delete_image_sqlite(pool, id).await,
            Backend::Mysql(pool) => delete_image_mysql(pool, id).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_image_sqlite(
    pool: &SqlitePool,
    input: &CreateArticleImageInput,
) -> Result<ArticleImage> {
    let now = Utc::now();

    let result =
        sqlx::query("INSERT INTO article_images (article_id, link, created_at) VALUES (?, ?, ?)")
            .bind(input.article_id)
            .bind(&input.link)
            .bind(now)
            .execute(pool)
            .await
            .context("Failed to create article image")?;

    Ok(ArticleImage {
        id: result.last_insert_rowid(),
        article_id: input.article_id,
        link: input.link.clone(),
        created_at: now,
    })
}

async fn get_image_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<ArticleImage>> {
    let row = sqlx::query("SELECT id, article_id, link, created_at FROM article_images WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get article image by ID")?;

    Ok(row.map(|row| row_to_image_sqlite(&row)))
}

async fn list_images_sqlite(pool: &SqlitePool, article_id: i64) -> Result<Vec<ArticleImage>> {
    let rows = sqlx::query(
        "SELECT id, article_id, link, created_at FROM article_images WHERE article_id = ? ORDER BY id ASC",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list article images")?;

    Ok(rows.iter().map(row_to_image_sqlite).collect())
}

async fn delete_image_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article_images WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article image")?;
    Ok(())
}

fn row_to_image_sqlite(row: &sqlx::sqlite::SqliteRow) -> ArticleImage {
    ArticleImage {
        id: row.get("id"),
        article_id: row.get("article_id"),
        link: row.get("link"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_image_mysql(
    pool: &MySqlPool,
    input: &CreateArticleImageInput,
) -> Result<ArticleImage> {
    let now = Utc::now();

    let result =
        sqlx::query("INSERT INTO article_images (article_id, link, created_at) VALUES (?, ?, ?)")
            .bind(input.article_id)
            .bind(&input.link)
            .bind(now)
            .execute(pool)
            .await
            .context("Failed to create article image")?;

    Ok(ArticleImage {
        id: result.last_insert_id() as i64,
        article_id: input.article_id,
        link: input.link.clone(),
        created_at: now,
    })
}

async fn get_image_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<ArticleImage>> {
    let row = sqlx::query("SELECT id, article_id, link, created_at FROM article_images WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get article image by ID")?;

    Ok(row.map(|row| row_to_image_mysql(&row)))
}

async fn list_images_mysql(pool: &MySqlPool, article_id: i64) -> Result<Vec<ArticleImage>> {
    let rows = sqlx::query(
        "SELECT id, article_id, link, created_at FROM article_images WHERE article_id = ? ORDER BY id ASC",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list article images")?;

    Ok(rows.iter().map(row_to_image_mysql).collect())
}

async fn delete_image_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article_images WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article image")?;
    Ok(())
}

fn row_to_image_mysql(row: &sqlx::mysql::MySqlRow) -> ArticleImage {
    ArticleImage {
        id: row.get("id"),
        article_id: row.get("article_id"),
        link: row.get("link"),
        created_at: row.get("created_at"),
    }
}
