//! Board service
//!
//! Boards are read-only once the application is running. The configured
//! default boards are created by [`BoardService::seed_defaults`] at startup.

use crate::db::repositories::{ArticleRepository, BoardRepository};
use crate::models::{Article, Board};
use anyhow::Context;
use std::sync::Arc;

/// Error types for board service operations
#[derive(Debug, thiserror::Error)]
pub enum BoardServiceError {
    /// Board not found
    #[error("Board not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Longest board name in characters, matching the `boards.name` column
pub const MAX_BOARD_NAME_LEN: usize = 100;

/// A board together with its articles in insertion order
#[derive(Debug, Clone)]
pub struct BoardDetail {
    pub board: Board,
    pub articles: Vec<Article>,
}

/// Board service
pub struct BoardService {
    repo: Arc<dyn BoardRepository>,
    article_repo: Arc<dyn ArticleRepository>,
}

impl BoardService {
    pub fn new(repo: Arc<dyn BoardRepository>, article_repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo, article_repo }
    }

    /// Create every named board that does not exist yet.
    ///
    /// Returns the number of boards created. Running it again creates nothing.
    pub async fn seed_defaults(&self, names: &[String]) -> Result<usize, BoardServiceError> {
        let mut created = 0;

        for name in names {
            let name = name.trim();
            if name.is_empty() {
                return Err(BoardServiceError::ValidationError(
                    "Board name cannot be empty".to_string(),
                ));
            }
            if name.chars().count() > MAX_BOARD_NAME_LEN {
                return Err(BoardServiceError::ValidationError(format!(
                    "Board name exceeds {} characters",
                    MAX_BOARD_NAME_LEN
                )));
            }

            if self
                .repo
                .exists_by_name(name)
                .await
                .context("Failed to check board name")?
            {
                continue;
            }

            let board = self.repo.create(name).await.context("Failed to seed board")?;
            tracing::info!("Created board {} ({})", board.id, board.name);
            created += 1;
        }

        Ok(created)
    }

    /// All boards in insertion order
    pub async fn list_all(&self) -> Result<Vec<Board>, BoardServiceError> {
        Ok(self.repo.list().await.context("Failed to list boards")?)
    }

    /// Get a board by ID
    pub async fn get(&self, board_id: i64) -> Result<Board, BoardServiceError> {
        self.repo
            .get_by_id(board_id)
            .await
            .context("Failed to get board")?
            .ok_or_else(|| BoardServiceError::NotFound(board_id.to_string()))
    }

    /// A board with its articles
    pub async fn read(&self, board_id: i64) -> Result<BoardDetail, BoardServiceError> {
        let board = self.get(board_id).await?;
        let articles = self
            .article_repo
            .list_by_board(board.id)
            .await
            .context("Failed to list board articles")?;

        Ok(BoardDetail { board, articles })
    }
}
