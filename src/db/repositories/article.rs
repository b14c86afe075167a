//! Article repository
//!
//! Database operations for articles.
//!
//! This module provides:
//! - `ArticleRepository` trait defining the interface for article data access
//! - `SqlxArticleRepository` implementing the trait for SQLite and MySQL
//!
//! All listings are ordered by ascending id, which is the insertion order.
//! Wherever a `board_id` filter is taken, `0` means "every board".

use crate::db::{Backend, DynDatabasePool};
use crate::models::{Article, CreateArticleInput, SearchCriteria, UpdateArticleInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Board id that disables board filtering
pub const ALL_BOARDS: i64 = 0;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Create a new article
    async fn create(&self, input: &CreateArticleInput) -> Result<Article>;

    /// Get article by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// List every article across all boards
    async fn list(&self) -> Result<Vec<Article>>;

    /// List the articles of one board
    async fn list_by_board(&self, board_id: i64) -> Result<Vec<Article>>;

    /// Overwrite title and content
    async fn update(&self, id: i64, input: &UpdateArticleInput) -> Result<Article>;

    /// Delete an article; children go with it through `ON DELETE CASCADE`
    async fn delete(&self, id: i64) -> Result<()>;

    /// The closest article with a smaller id, optionally within one board
    async fn get_previous(&self, board_id: i64, id: i64) -> Result<Option<Article>>;

    /// The closest article with a larger id, optionally within one board
    async fn get_next(&self, board_id: i64, id: i64) -> Result<Option<Article>>;

    /// List articles associated with the given tag text
    async fn list_by_hashtag(&self, tag: &str) -> Result<Vec<Article>>;

    /// Case-sensitive substring search on title or content
    async fn search(
        &self,
        board_id: i64,
        criteria: SearchCriteria,
        query: &str,
    ) -> Result<Vec<Article>>;
}

/// SQLx-based article repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    /// Create a new SQLx article repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, input: &CreateArticleInput) -> Result<Article> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => create_article_sqlite(pool, input).await,
            Backend::Mysql(pool) => create_article_mysql(pool, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_article_by_id_sqlite(pool, id).await,
            Backend::Mysql(pool) => get_article_by_id_mysql(pool, id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Article>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => list_articles_sqlite(pool, ALL_BOARDS).await,
            Backend::Mysql(pool) => list_articles_mysql(pool, ALL_BOARDS).await,
        }
    }

    async fn list_by_board(&self, board_id: i64) -> Result<Vec<Article>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => list_articles_sqlite(pool, board_id).await,
            Backend::Mysql(pool) => list_articles_mysql(pool, board_id).await,
        }
    }

    async fn update(&self, id: i64, input: &UpdateArticleInput) -> Result<Article> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => update_article_sqlite(pool, id, input).await,
            Backend::Mysql(pool) => update_article_mysql(pool, id, input).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => delete_article_sqlite(pool, id).await,
            Backend::Mysql(pool) => delete_article_mysql(pool, id).await,
        }
    }

    async fn get_previous(&self, board_id: i64, id: i64) -> Result<Option<Article>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_previous_sqlite(pool, board_id, id).await,
            Backend::Mysql(pool) => get_previous_mysql(pool, board_id, id).await,
        }
    }

    async fn get_next(&self, board_id: i64, id: i64) -> Result<Option<Article>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_next_sqlite(pool, board_id, id).await,
            Backend::Mysql(pool) => get_next_mysql(pool, board_id, id).await,
        }
    }

    async fn list_by_hashtag(&self, tag: &str) -> Result<Vec<Article>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => list_by_hashtag_sqlite(pool, tag).await,
            Backend::Mysql(pool) => list_by_hashtag_mysql(pool, tag).await,
        }
    }

    async fn search(
        &self,
        board_id: i64,
        criteria: SearchCriteria,
        query: &str,
    ) -> Result<Vec<Article>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => search_articles_sqlite(pool, board_id, criteria, query).await,
            Backend::Mysql(pool) => search_articles_mysql(pool, board_id, criteria, query).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_article_sqlite(pool: &SqlitePool, input: &CreateArticleInput) -> Result<Article> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO articles (board_id, title, content, password, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.board_id)
    .bind(&input.title)
    .bind(&input.content)
    .bind(&input.password)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(Article {
        id: result.last_insert_rowid(),
        board_id: input.board_id,
        title: input.title.clone(),
        content: input.content.clone(),
        password: input.password.clone(),
        created_at: now,
        updated_at: now,
    })
}

async fn get_article_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(
        r#"
        SELECT id, board_id, title, content, password, created_at, updated_at
        FROM articles
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get article by ID")?;

    Ok(row.map(|row| row_to_article_sqlite(&row)))
}

async fn list_articles_sqlite(pool: &SqlitePool, board_id: i64) -> Result<Vec<Article>> {
    let rows = sqlx::query(
        r#"
        SELECT id, board_id, title, content, password, created_at, updated_at
        FROM articles
        WHERE ? = 0 OR board_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(board_id)
    .bind(board_id)
    .fetch_all(pool)
    .await
    .context("Failed to list articles")?;

    Ok(rows.iter().map(row_to_article_sqlite).collect())
}

async fn update_article_sqlite(
    pool: &SqlitePool,
    id: i64,
    input: &UpdateArticleInput,
) -> Result<Article> {
    sqlx::query("UPDATE articles SET title = ?, content = ?, updated_at = ? WHERE id = ?")
        .bind(&input.title)
        .bind(&input.content)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update article")?;

    get_article_by_id_sqlite(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Article not found after update: {}", id))
}

async fn delete_article_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;

    Ok(())
}

async fn get_previous_sqlite(pool: &SqlitePool, board_id: i64, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(
        r#"
        SELECT id, board_id, title, content, password, created_at, updated_at
        FROM articles
        WHERE id < ? AND (? = 0 OR board_id = ?)
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(id)
    .bind(board_id)
    .bind(board_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get previous article")?;

    Ok(row.map(|row| row_to_article_sqlite(&row)))
}

async fn get_next_sqlite(pool: &SqlitePool, board_id: i64, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(
        r#"
        SELECT id, board_id, title, content, password, created_at, updated_at
        FROM articles
        WHERE id > ? AND (? = 0 OR board_id = ?)
        ORDER BY id ASC
        LIMIT 1
        "#,
    )
    .bind(id)
    .bind(board_id)
    .bind(board_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get next article")?;

    Ok(row.map(|row| row_to_article_sqlite(&row)))
}

async fn list_by_hashtag_sqlite(pool: &SqlitePool, tag: &str) -> Result<Vec<Article>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.board_id, a.title, a.content, a.password, a.created_at, a.updated_at
        FROM articles a
        INNER JOIN article_hashtags ah ON ah.article_id = a.id
        INNER JOIN hashtags h ON h.id = ah.hashtag_id
        WHERE h.tag = ?
        ORDER BY a.id ASC
        "#,
    )
    .bind(tag)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by hashtag")?;

    Ok(rows.iter().map(row_to_article_sqlite).collect())
}

async fn search_articles_sqlite(
    pool: &SqlitePool,
    board_id: i64,
    criteria: SearchCriteria,
    query: &str,
) -> Result<Vec<Article>> {
    // instr() is case-sensitive where LIKE is not
    let sql = match criteria {
        SearchCriteria::Title => {
            r#"
            SELECT id, board_id, title, content, password, created_at, updated_at
            FROM articles
            WHERE instr(title, ?) > 0 AND (? = 0 OR board_id = ?)
            ORDER BY id ASC
            "#
        }
        SearchCriteria::Content => {
            r#"
            SELECT id, board_id, title, content, password, created_at, updated_at
            FROM articles
            WHERE instr(content, ?) > 0 AND (? = 0 OR board_id = ?)
            ORDER BY id ASC
            "#
        }
    };

    let rows = sqlx::query(sql)
        .bind(query)
        .bind(board_id)
        .bind(board_id)
        .fetch_all(pool)
        .await
        .context("Failed to search articles")?;

    Ok(rows.iter().map(row_to_article_sqlite).collect())
}

fn row_to_article_sqlite(row: &sqlx::sqlite::SqliteRow) -> Article {
    Article {
        id: row.get("id"),
        board_id: row.get("board_id"),
        title: row.get("title"),
        content: row.get("content"),
        password: row.get("password"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_article_mysql(pool: &MySqlPool, input: &CreateArticleInput) -> Result<Article> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO articles (board_id, title, content, password, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.board_id)
    .bind(&input.title)
    .bind(&input.content)
    .bind(&input.password)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(Article {
        id: result.last_insert_id() as i64,
        board_id: input.board_id,
        title: input.title.clone(),
        content: input.content.clone(),
        password: input.password.clone(),
        created_at: now,
        updated_at: now,
    })
}

async fn get_article_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(
        r#"
        SELECT id, board_id, title, content, password, created_at, updated_at
        FROM articles
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get article by ID")?;

    Ok(row.map(|row| row_to_article_mysql(&row)))
}

async fn list_articles_mysql(pool: &MySqlPool, board_id: i64) -> Result<Vec<Article>> {
    let rows = sqlx::query(
        r#"
        SELECT id, board_id, title, content, password, created_at, updated_at
        FROM articles
        WHERE ? = 0 OR board_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(board_id)
    .bind(board_id)
    .fetch_all(pool)
    .await
    .context("Failed to list articles")?;

    Ok(rows.iter().map(row_to_article_mysql).collect())
}

async fn update_article_mysql(
    pool: &MySqlPool,
    id: i64,
    input: &UpdateArticleInput,
) -> Result<Article> {
    sqlx::query("UPDATE articles SET title = ?, content = ?, updated_at = ? WHERE id = ?")
        .bind(&input.title)
        .bind(&input.content)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update article")?;

    get_article_by_id_mysql(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Article not found after update: {}", id))
}

async fn delete_article_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;

    Ok(())
}

async fn get_previous_mysql(pool: &MySqlPool, board_id: i64, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(
        r#"
        SELECT id, board_id, title, content, password, created_at, updated_at
        FROM articles
        WHERE id < ? AND (? = 0 OR board_id = ?)
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(id)
    .bind(board_id)
    .bind(board_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get previous article")?;

    Ok(row.map(|row| row_to_article_mysql(&row)))
}

async fn get_next_mysql(pool: &MySqlPool, board_id: i64, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(
        r#"
        SELECT id, board_id, title, content, password, created_at, updated_at
        FROM articles
        WHERE id > ? AND (? = 0 OR board_id = ?)
        ORDER BY id ASC
        LIMIT 1
        "#,
    )
    .bind(id)
    .bind(board_id)
    .bind(board_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get next article")?;

    Ok(row.map(|row| row_to_article_mysql(&row)))
}

async fn list_by_hashtag_mysql(pool: &MySqlPool, tag: &str) -> Result<Vec<Article>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.board_id, a.title, a.content, a.password, a.created_at, a.updated_at
        FROM articles a
        INNER JOIN article_hashtags ah ON ah.article_id = a.id
        INNER JOIN hashtags h ON h.id = ah.hashtag_id
        WHERE h.tag = ?
        ORDER BY a.id ASC
        "#,
    )
    .bind(tag)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by hashtag")?;

    Ok(rows.iter().map(row_to_article_mysql).collect())
}

async fn search_articles_mysql(
    pool: &MySqlPool,
    board_id: i64,
    criteria: SearchCriteria,
    query: &str,
) -> Result<Vec<Article>> {
    // Binary comparison keeps the match case-sensitive under any collation
    let sql = match criteria {
        SearchCriteria::Title => {
            r#"
            SELECT id, board_id, title, content, password, created_at, updated_at
            FROM articles
            WHERE INSTR(CAST(title AS BINARY), CAST(? AS BINARY)) > 0 AND (? = 0 OR board_id = ?)
            ORDER BY id ASC
            "#
        }
        SearchCriteria::Content => {
            r#"
            SELECT id, board_id, title, content, password, created_at, updated_at
            FROM articles
            WHERE INSTR(CAST(content AS BINARY), CAST(? AS BINARY)) > 0 AND (? = 0 OR board_id = ?)
            ORDER BY id ASC
            "#
        }
    };

    let rows = sqlx::query(sql)
        .bind(query)
        .bind(board_id)
        .bind(board_id)
        .fetch_all(pool)
        .await
        .context("Failed to search articles")?;

    Ok(rows.iter().map(row_to_article_mysql).collect())
}

fn row_to_article_mysql(row: &sqlx::mysql::MySqlRow) -> Article {
    Article {
        id: row.get("id"),
        board_id: row.get("board_id"),
        title: row.get("title"),
        content: row.get("content"),
        password: row.get("password"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
