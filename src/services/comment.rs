//! Comment service
//!
//! Comments belong to an article and are deleted with the same password gate
//! as articles, using the comment's own password.

use crate::db::repositories::{ArticleRepository, CommentRepository};
use crate::models::{Comment, CreateCommentInput};
use crate::services::password::{PasswordGate, PasswordRejected};
use anyhow::Context;
use std::sync::Arc;

/// Error types for comment service operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// Comment or article not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Supplied password did not match under the reject policy
    #[error("Password mismatch: {0}")]
    PasswordMismatch(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<PasswordRejected> for CommentServiceError {
    fn from(err: PasswordRejected) -> Self {
        Self::PasswordMismatch(err.0)
    }
}

/// Comment service
pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
    article_repo: Arc<dyn ArticleRepository>,
    gate: PasswordGate,
}

impl CommentService {
    pub fn new(
        repo: Arc<dyn CommentRepository>,
        article_repo: Arc<dyn ArticleRepository>,
        gate: PasswordGate,
    ) -> Self {
        Self {
            repo,
            article_repo,
            gate,
        }
    }

    /// Add a comment to an article
    ///
    /// # Errors
    /// - `NotFound` if the article does not exist
    /// - `ValidationError` if the content is blank
    pub async fn create(
        &self,
        article_id: i64,
        content: String,
        password: String,
    ) -> Result<Comment, CommentServiceError> {
        self.ensure_article(article_id).await?;

        if content.trim().is_empty() {
            return Err(CommentServiceError::ValidationError(
                "Comment content cannot be empty".to_string(),
            ));
        }

        let comment = self
            .repo
            .create(&CreateCommentInput {
                article_id,
                content,
                password,
            })
            .await
            .context("Failed to create comment")?;

        tracing::info!("Created comment {} on article {}", comment.id, article_id);
        Ok(comment)
    }

    /// Delete a comment when the password matches.
    ///
    /// Returns whether the comment was deleted.
    pub async fn delete(&self, id: i64, password: &str) -> Result<bool, CommentServiceError> {
        let comment = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get comment")?
            .ok_or_else(|| CommentServiceError::NotFound(format!("comment {}", id)))?;

        if !self.gate.check(&comment.password, password, &format!("comment {}", id))? {
            return Ok(false);
        }

        self.repo.delete(id).await.context("Failed to delete comment")?;
        tracing::info!("Deleted comment {} of article {}", id, comment.article_id);
        Ok(true)
    }

    /// Comments of an article, oldest first
    pub async fn list_by_article(&self, article_id: i64) -> Result<Vec<Comment>, CommentServiceError> {
        self.ensure_article(article_id).await?;
        Ok(self
            .repo
            .list_by_article(article_id)
            .await
            .context("Failed to list comments")?)
    }

    async fn ensure_article(&self, article_id: i64) -> Result<(), CommentServiceError> {
        self.article_repo
            .get_by_id(article_id)
            .await
            .context("Failed to get article")?
            .map(|_| ())
            .ok_or_else(|| CommentServiceError::NotFound(format!("article {}", article_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordMismatchPolicy;
    use crate::db::repositories::{
        BoardRepository, SqlxArticleRepository, SqlxBoardRepository, SqlxCommentRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::CreateArticleInput;

    async fn setup_with_policy(policy: PasswordMismatchPolicy) -> (CommentService, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let board = SqlxBoardRepository::new(pool.clone())
            .create("Board")
            .await
            .unwrap();
        let articles = SqlxArticleRepository::boxed(pool.clone());
        let article = articles
            .create(&CreateArticleInput::new(board.id, "t", "c", "pw"))
            .await
            .unwrap();

        let service = CommentService::new(
            SqlxCommentRepository::boxed(pool),
            articles,
            PasswordGate::new(policy),
        );
        (service, article.id)
    }

    async fn setup() -> (CommentService, i64) {
        setup_with_policy(PasswordMismatchPolicy::Ignore).await
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (service, article_id) = setup().await;

        service.create(article_id, "first".into(), "a".into()).await.unwrap();
        service.create(article_id, "second".into(), "b".into()).await.unwrap();

        let contents: Vec<String> = service
            .list_by_article(article_id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.content)
            .collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_create_on_missing_article() {
        let (service, _) = setup().await;
        let result = service.create(999, "hi".into(), "a".into()).await;
        assert!(matches!(result, Err(CommentServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_blank_comment_on_missing_article_is_not_found() {
        let (service, _) = setup().await;
        let result = service.create(999, String::new(), "a".into()).await;
        assert!(matches!(result, Err(CommentServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_blank_content() {
        let (service, article_id) = setup().await;
        let result = service.create(article_id, " \n".into(), "a".into()).await;
        assert!(matches!(result, Err(CommentServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete_with_password() {
        let (service, article_id) = setup().await;
        let comment = service.create(article_id, "bye".into(), "Secret".into()).await.unwrap();

        assert!(!service.delete(comment.id, "secret").await.unwrap());
        assert_eq!(service.list_by_article(article_id).await.unwrap().len(), 1);

        assert!(service.delete(comment.id, "Secret").await.unwrap());
        assert!(service.list_by_article(article_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_rejected_under_strict_policy() {
        let (service, article_id) = setup_with_policy(PasswordMismatchPolicy::Reject).await;
        let comment = service.create(article_id, "stay".into(), "a".into()).await.unwrap();

        assert!(matches!(
            service.delete(comment.id, "b").await,
            Err(CommentServiceError::PasswordMismatch(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_comment() {
        let (service, _) = setup().await;
        assert!(matches!(
            service.delete(77, "a").await,
            Err(CommentServiceError::NotFound(_))
        ));
    }
}
