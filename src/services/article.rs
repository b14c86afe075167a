//! Article service
//!
//! Implements business logic for articles:
//! - Create, read, update, delete, with password-gated mutations
//! - Hashtag derivation from content
//! - Previous/next navigation within a board or across all boards
//! - Keyword search by title or content
//! - Image attachments

use crate::db::repositories::{
    ArticleImageRepository, ArticleRepository, BoardRepository, CommentRepository,
    HashTagRepository,
};
use crate::models::{
    Article, ArticleImage, Board, Comment, CreateArticleImageInput, CreateArticleInput, HashTag,
    SearchCriteria, UpdateArticleInput,
};
use crate::services::hashtag::{extract_hashtags, normalize_tag};
use crate::services::password::{PasswordGate, PasswordRejected};
use crate::services::storage::{ImageStorage, ImageUpload, StorageError};
use anyhow::Context;
use std::sync::Arc;

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// Article, board or image not found
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

impl From<PasswordRejected> for ArticleServiceError {
    fn from(err: PasswordRejected) -> Self {
        Self::PasswordMismatch(err.0)
    }
}

impl From<StorageError> for ArticleServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => {
                Self::InternalError(anyhow::Error::new(e).context("Failed to store image"))
            }
            other => Self::ValidationError(other.to_string()),
        }
    }
}

/// An article with everything attached to it
#[derive(Debug, Clone)]
pub struct ArticleDetail {
    pub article: Article,
    pub board: Board,
    pub images: Vec<ArticleImage>,
    pub hashtags: Vec<HashTag>,
    pub comments: Vec<Comment>,
}

/// Article service
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
    board_repo: Arc<dyn BoardRepository>,
    hashtag_repo: Arc<dyn HashTagRepository>,
    image_repo: Arc<dyn ArticleImageRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    storage: ImageStorage,
    gate: PasswordGate,
}

impl ArticleService {
    /// Create a new article service
    pub fn new(
        repo: Arc<dyn ArticleRepository>,
        board_repo: Arc<dyn BoardRepository>,
        hashtag_repo: Arc<dyn HashTagRepository>,
        image_repo: Arc<dyn ArticleImageRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        storage: ImageStorage,
        gate: PasswordGate,
    ) -> Self {
        Self {
            repo,
            board_repo,
            hashtag_repo,
            image_repo,
            comment_repo,
            storage,
            gate,
        }
    }

    /// Create an article on a board and link the hashtags found in its content
    ///
    /// # Errors
    /// - `NotFound` if the board does not exist
    /// - `ValidationError` if the title is blank
    pub async fn create(&self, input: CreateArticleInput) -> Result<ArticleDetail, ArticleServiceError> {
        let board = self.board(input.board_id).await?;

        if input.title.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }

        let article = self
            .repo
            .create(&input)
            .await
            .context("Failed to create article")?;

        let hashtags = self
            .hashtag_repo
            .replace_for_article(article.id, &extract_hashtags(&article.content))
            .await
            .context("Failed to link hashtags")?;

        tracing::info!("Created article {} on board {}", article.id, board.id);

        Ok(ArticleDetail {
            article,
            board,
            images: Vec::new(),
            hashtags,
            comments: Vec::new(),
        })
    }

    /// Every article across all boards, oldest first
    pub async fn read_all(&self) -> Result<Vec<Article>, ArticleServiceError> {
        Ok(self.repo.list().await.context("Failed to list articles")?)
    }

    /// Full view of one article
    pub async fn read_one(&self, id: i64) -> Result<ArticleDetail, ArticleServiceError> {
        let article = self.article(id).await?;
        self.detail(article).await
    }

    /// Overwrite title and content when the password matches.
    ///
    /// On an ignored mismatch the unchanged article is returned.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateArticleInput,
        password: &str,
    ) -> Result<ArticleDetail, ArticleServiceError> {
        let article = self.article(id).await?;

        if !self.gate.check(&article.password, password, &format!("article {}", id))? {
            return self.detail(article).await;
        }

        if input.title.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }

        let article = self
            .repo
            .update(id, &input)
            .await
            .context("Failed to update article")?;

        self.hashtag_repo
            .replace_for_article(id, &extract_hashtags(&article.content))
            .await
            .context("Failed to relink hashtags")?;

        tracing::info!("Updated article {}", id);
        self.detail(article).await
    }

    /// Delete an article, its comments, images and tag links.
    ///
    /// Returns whether the article was deleted.
    pub async fn delete(&self, id: i64, password: &str) -> Result<bool, ArticleServiceError> {
        let article = self.article(id).await?;

        if !self.gate.check(&article.password, password, &format!("article {}", id))? {
            return Ok(false);
        }

        let images = self
            .image_repo
            .list_by_article(id)
            .await
            .context("Failed to list article images")?;

        self.repo.delete(id).await.context("Failed to delete article")?;

        for image in &images {
            self.storage.remove(&image.link).await;
        }

        tracing::info!("Deleted article {} ({} image(s))", id, images.len());
        Ok(true)
    }

    /// The article just before `id`, within `board_id` or globally when it is 0
    pub async fn get_front(
        &self,
        board_id: i64,
        id: i64,
    ) -> Result<Option<Article>, ArticleServiceError> {
        Ok(self
            .repo
            .get_previous(board_id, id)
            .await
            .context("Failed to get previous article")?)
    }

    /// The article just after `id`, within `board_id` or globally when it is 0
    pub async fn get_back(
        &self,
        board_id: i64,
        id: i64,
    ) -> Result<Option<Article>, ArticleServiceError> {
        Ok(self
            .repo
            .get_next(board_id, id)
            .await
            .context("Failed to get next article")?)
    }

    /// Articles tagged with `tag`; a leading `#` is ignored
    pub async fn by_tag(&self, tag: &str) -> Result<Vec<Article>, ArticleServiceError> {
        let tag = normalize_tag(tag);
        if tag.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .repo
            .list_by_hashtag(tag)
            .await
            .context("Failed to list articles by hashtag")?)
    }

    /// Case-sensitive substring search.
    ///
    /// `criteria` is `title` or `content`; `board_id` 0 searches every board.
    pub async fn search(
        &self,
        board_id: i64,
        criteria: &str,
        query: &str,
    ) -> Result<Vec<Article>, ArticleServiceError> {
        let criteria = SearchCriteria::from_str(criteria).ok_or_else(|| {
            ArticleServiceError::ValidationError(format!(
                "Unknown search criteria: {}. Expected title or content",
                criteria
            ))
        })?;

        Ok(self
            .repo
            .search(board_id, criteria, query)
            .await
            .context("Failed to search articles")?)
    }

    /// Store an image and attach it to an article.
    ///
    /// Returns `None` when a password mismatch is ignored.
    pub async fn add_image(
        &self,
        article_id: i64,
        upload: ImageUpload,
        password: &str,
    ) -> Result<Option<ArticleImage>, ArticleServiceError> {
        let article = self.article(article_id).await?;

        if !self
            .gate
            .check(&article.password, password, &format!("article {}", article_id))?
        {
            return Ok(None);
        }

        let link = self.storage.save(&upload).await?;

        let image = self
            .image_repo
            .create(&CreateArticleImageInput { article_id, link })
            .await
            .context("Failed to record article image")?;

        tracing::info!("Attached image {} to article {}", image.id, article_id);
        Ok(Some(image))
    }

    /// Remove one image of an article.
    ///
    /// Returns whether the image was deleted.
    pub async fn delete_image(
        &self,
        article_id: i64,
        image_id: i64,
        password: &str,
    ) -> Result<bool, ArticleServiceError> {
        let article = self.article(article_id).await?;

        let image = self
            .image_repo
            .get_by_id(image_id)
            .await
            .context("Failed to get article image")?
            .filter(|image| image.article_id == article_id)
            .ok_or_else(|| {
                ArticleServiceError::NotFound(format!("image {} of article {}", image_id, article_id))
            })?;

        if !self
            .gate
            .check(&article.password, password, &format!("article {}", article_id))?
        {
            return Ok(false);
        }

        self.image_repo
            .delete(image.id)
            .await
            .context("Failed to delete article image")?;
        self.storage.remove(&image.link).await;

        tracing::info!("Deleted image {} of article {}", image_id, article_id);
        Ok(true)
    }

    async fn article(&self, id: i64) -> Result<Article, ArticleServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get article")?
            .ok_or_else(|| ArticleServiceError::NotFound(format!("article {}", id)))
    }

    async fn board(&self, id: i64) -> Result<Board, ArticleServiceError> {
        self.board_repo
            .get_by_id(id)
            .await
            .context("Failed to get board")?
            .ok_or_else(|| ArticleServiceError::NotFound(format!("board {}", id)))
    }

    async fn detail(&self, article: Article) -> Result<ArticleDetail, ArticleServiceError> {
        let board = self.board(article.board_id).await?;
        let images = self
            .image_repo
            .list_by_article(article.id)
            .await
            .context("Failed to list article images")?;
        let hashtags = self
            .hashtag_repo
            .get_by_article_id(article.id)
            .await
            .context("Failed to list article hashtags")?;
        let comments = self
            .comment_repo
            .list_by_article(article.id)
            .await
            .context("Failed to list article comments")?;

        Ok(ArticleDetail {
            article,
            board,
            images,
            hashtags,
            comments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PasswordMismatchPolicy, UploadConfig};
    use crate::db::repositories::{
        SqlxArticleImageRepository, SqlxArticleRepository, SqlxBoardRepository,
        SqlxCommentRepository, SqlxHashTagRepository, ALL_BOARDS,
    };
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::CreateCommentInput;
    use proptest::prelude::*;
    use tempfile::TempDir;

    struct Fixture {
        pool: DynDatabasePool,
        service: ArticleService,
        boards: Vec<i64>,
        upload_dir: TempDir,
    }

    async fn setup_with_policy(policy: PasswordMismatchPolicy) -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let board_repo = SqlxBoardRepository::boxed(pool.clone());
        let mut boards = Vec::new();
        for name in ["Free", "Dev"] {
            boards.push(board_repo.create(name).await.expect("Failed to create board").id);
        }

        let upload_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = ImageStorage::new(UploadConfig {
            path: upload_dir.path().to_path_buf(),
            ..UploadConfig::default()
        });

        let service = ArticleService::new(
            SqlxArticleRepository::boxed(pool.clone()),
            board_repo,
            SqlxHashTagRepository::boxed(pool.clone()),
            SqlxArticleImageRepository::boxed(pool.clone()),
            SqlxCommentRepository::boxed(pool.clone()),
            storage,
            PasswordGate::new(policy),
        );

        Fixture {
            pool,
            service,
            boards,
            upload_dir,
        }
    }

    async fn setup() -> Fixture {
        setup_with_policy(PasswordMismatchPolicy::Ignore).await
    }

    async fn post(fx: &Fixture, board: usize, title: &str, content: &str) -> Article {
        fx.service
            .create(CreateArticleInput::new(fx.boards[board], title, content, "pw"))
            .await
            .expect("Failed to create article")
            .article
    }

    fn png() -> ImageUpload {
        ImageUpload {
            file_name: Some("cat.png".to_string()),
            content_type: "image/png".to_string(),
            data: b"\x89PNG\r\n".to_vec(),
        }
    }

    fn edit(title: &str, content: &str) -> UpdateArticleInput {
        UpdateArticleInput {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn ids(articles: &[Article]) -> Vec<i64> {
        articles.iter().map(|a| a.id).collect()
    }

    // ========================================================================
    // create / read tests
    // ========================================================================

    #[tokio::test]
    async fn test_create_then_read_one() {
        let fx = setup().await;
        let article = post(&fx, 0, "Hello", "Greetings #intro").await;

        let detail = fx.service.read_one(article.id).await.unwrap();
        assert_eq!(detail.article.title, "Hello");
        assert_eq!(detail.article.content, "Greetings #intro");
        assert_eq!(detail.board.id, fx.boards[0]);
        assert_eq!(detail.hashtags.len(), 1);
        assert_eq!(detail.hashtags[0].tag, "intro");
        assert!(detail.images.is_empty());
        assert!(detail.comments.is_empty());
    }

    #[tokio::test]
    async fn test_hashtag_order_same_on_create_and_read() {
        let fx = setup().await;
        post(&fx, 0, "older", "#zeta").await;

        let created = fx
            .service
            .create(CreateArticleInput::new(fx.boards[0], "newer", "#alpha then #zeta", "pw"))
            .await
            .unwrap();
        let read = fx.service.read_one(created.article.id).await.unwrap();

        let created_tags: Vec<String> = created.hashtags.into_iter().map(|t| t.tag).collect();
        let read_tags: Vec<String> = read.hashtags.into_iter().map(|t| t.tag).collect();
        assert_eq!(created_tags, vec!["alpha", "zeta"]);
        assert_eq!(read_tags, created_tags);
    }

    #[tokio::test]
    async fn test_create_on_missing_board() {
        let fx = setup().await;
        let result = fx
            .service
            .create(CreateArticleInput::new(999, "t", "c", "pw"))
            .await;
        assert!(matches!(result, Err(ArticleServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_with_blank_title() {
        let fx = setup().await;
        let result = fx
            .service
            .create(CreateArticleInput::new(fx.boards[0], "   ", "c", "pw"))
            .await;
        assert!(matches!(result, Err(ArticleServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_read_one_missing() {
        let fx = setup().await;
        assert!(matches!(
            fx.service.read_one(42).await,
            Err(ArticleServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_read_all_spans_boards() {
        let fx = setup().await;
        let a = post(&fx, 0, "a", "").await;
        let b = post(&fx, 1, "b", "").await;

        assert_eq!(ids(&fx.service.read_all().await.unwrap()), vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_read_one_includes_comments() {
        let fx = setup().await;
        let article = post(&fx, 0, "t", "").await;
        SqlxCommentRepository::new(fx.pool.clone())
            .create(&CreateCommentInput {
                article_id: article.id,
                content: "nice".to_string(),
                password: "c".to_string(),
            })
            .await
            .unwrap();

        let detail = fx.service.read_one(article.id).await.unwrap();
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].content, "nice");
    }

    // ========================================================================
    // update / delete tests
    // ========================================================================

    #[tokio::test]
    async fn test_update_with_correct_password() {
        let fx = setup().await;
        let article = post(&fx, 0, "Old", "#old").await;

        let detail = fx
            .service
            .update(article.id, edit("New", "#new #fresh"), "pw")
            .await
            .unwrap();
        assert_eq!(detail.article.title, "New");
        assert_eq!(detail.article.content, "#new #fresh");

        let tags: Vec<String> = detail.hashtags.into_iter().map(|t| t.tag).collect();
        assert_eq!(tags, vec!["new", "fresh"]);
        assert!(fx.service.by_tag("old").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_with_wrong_password_is_ignored() {
        let fx = setup().await;
        let article = post(&fx, 0, "Old", "old").await;

        let detail = fx
            .service
            .update(article.id, edit("New", "new"), "PW")
            .await
            .unwrap();
        assert_eq!(detail.article.title, "Old");

        let stored = fx.service.read_one(article.id).await.unwrap();
        assert_eq!(stored.article.title, "Old");
        assert_eq!(stored.article.content, "old");
    }

    #[tokio::test]
    async fn test_update_with_wrong_password_rejected() {
        let fx = setup_with_policy(PasswordMismatchPolicy::Reject).await;
        let article = post(&fx, 0, "Old", "old").await;

        let result = fx.service.update(article.id, edit("New", "new"), "nope").await;
        assert!(matches!(result, Err(ArticleServiceError::PasswordMismatch(_))));
        assert_eq!(fx.service.read_one(article.id).await.unwrap().article.title, "Old");
    }

    #[tokio::test]
    async fn test_update_missing_article() {
        let fx = setup().await;
        let result = fx.service.update(7, edit("t", "c"), "pw").await;
        assert!(matches!(result, Err(ArticleServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_article_and_children() {
        let fx = setup().await;
        let article = post(&fx, 0, "t", "#gone").await;
        let image = fx
            .service
            .add_image(article.id, png(), "pw")
            .await
            .unwrap()
            .expect("image should be stored");
        let comments = SqlxCommentRepository::new(fx.pool.clone());
        let comment = comments
            .create(&CreateCommentInput {
                article_id: article.id,
                content: "c".to_string(),
                password: "c".to_string(),
            })
            .await
            .unwrap();

        let file = fx
            .upload_dir
            .path()
            .join(image.link.trim_start_matches("/uploads/"));
        assert!(file.exists());

        assert!(fx.service.delete(article.id, "pw").await.unwrap());

        assert!(matches!(
            fx.service.read_one(article.id).await,
            Err(ArticleServiceError::NotFound(_))
        ));
        assert!(comments.get_by_id(comment.id).await.unwrap().is_none());
        assert!(fx.service.by_tag("gone").await.unwrap().is_empty());
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn test_delete_with_wrong_password() {
        let fx = setup().await;
        let article = post(&fx, 0, "t", "").await;

        assert!(!fx.service.delete(article.id, "wrong").await.unwrap());
        assert!(fx.service.read_one(article.id).await.is_ok());

        let strict = setup_with_policy(PasswordMismatchPolicy::Reject).await;
        let article = post(&strict, 0, "t", "").await;
        assert!(matches!(
            strict.service.delete(article.id, "wrong").await,
            Err(ArticleServiceError::PasswordMismatch(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_article() {
        let fx = setup().await;
        assert!(matches!(
            fx.service.delete(1, "pw").await,
            Err(ArticleServiceError::NotFound(_))
        ));
    }

    // ========================================================================
    // navigation tests
    // ========================================================================

    #[tokio::test]
    async fn test_front_and_back_within_board() {
        let fx = setup().await;
        let a = post(&fx, 0, "a", "").await;
        let other = post(&fx, 1, "x", "").await;
        let b = post(&fx, 0, "b", "").await;
        let c = post(&fx, 0, "c", "").await;
        let board = fx.boards[0];

        assert!(fx.service.get_front(board, a.id).await.unwrap().is_none());
        assert_eq!(fx.service.get_back(board, a.id).await.unwrap().unwrap().id, b.id);
        assert_eq!(fx.service.get_front(board, b.id).await.unwrap().unwrap().id, a.id);
        assert_eq!(fx.service.get_back(board, b.id).await.unwrap().unwrap().id, c.id);
        assert!(fx.service.get_back(board, c.id).await.unwrap().is_none());

        assert_eq!(fx.service.get_back(ALL_BOARDS, a.id).await.unwrap().unwrap().id, other.id);
    }

    // ========================================================================
    // tag and search tests
    // ========================================================================

    #[tokio::test]
    async fn test_by_tag() {
        let fx = setup().await;
        let a = post(&fx, 0, "a", "#rust is fun").await;
        post(&fx, 0, "b", "#go").await;
        let c = post(&fx, 1, "c", "more #rust and #rust").await;

        assert!(fx.service.by_tag("python").await.unwrap().is_empty());
        assert_eq!(ids(&fx.service.by_tag("rust").await.unwrap()), vec![a.id, c.id]);
        assert_eq!(ids(&fx.service.by_tag("#rust").await.unwrap()), vec![a.id, c.id]);
        assert!(fx.service.by_tag("#").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_scoping() {
        let fx = setup().await;
        let a = post(&fx, 0, "foo in free", "").await;
        let b = post(&fx, 1, "foo in dev", "").await;
        post(&fx, 1, "bar", "foo only in content").await;

        assert_eq!(ids(&fx.service.search(0, "title", "foo").await.unwrap()), vec![a.id, b.id]);
        assert_eq!(
            ids(&fx.service.search(fx.boards[1], "title", "foo").await.unwrap()),
            vec![b.id]
        );
        assert_eq!(fx.service.search(0, "content", "foo").await.unwrap().len(), 1);
        assert!(fx.service.search(0, "title", "FOO").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_unknown_criteria() {
        let fx = setup().await;
        assert!(matches!(
            fx.service.search(0, "author", "x").await,
            Err(ArticleServiceError::ValidationError(_))
        ));
    }

    // ========================================================================
    // image tests
    // ========================================================================

    #[tokio::test]
    async fn test_add_image_and_read_back() {
        let fx = setup().await;
        let article = post(&fx, 0, "t", "").await;

        let image = fx.service.add_image(article.id, png(), "pw").await.unwrap().unwrap();
        assert!(image.link.starts_with("/uploads/"));

        let detail = fx.service.read_one(article.id).await.unwrap();
        assert_eq!(detail.images.len(), 1);
        assert_eq!(detail.images[0].id, image.id);
        assert_eq!(detail.images[0].link, image.link);
    }

    #[tokio::test]
    async fn test_add_image_wrong_password_stores_nothing() {
        let fx = setup().await;
        let article = post(&fx, 0, "t", "").await;

        assert!(fx.service.add_image(article.id, png(), "bad").await.unwrap().is_none());
        assert!(fx.service.read_one(article.id).await.unwrap().images.is_empty());
        assert_eq!(std::fs::read_dir(fx.upload_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_add_image_invalid_type() {
        let fx = setup().await;
        let article = post(&fx, 0, "t", "").await;
        let mut upload = png();
        upload.content_type = "application/pdf".to_string();

        assert!(matches!(
            fx.service.add_image(article.id, upload, "pw").await,
            Err(ArticleServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_add_image_missing_article() {
        let fx = setup().await;
        assert!(matches!(
            fx.service.add_image(5, png(), "pw").await,
            Err(ArticleServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_image() {
        let fx = setup().await;
        let article = post(&fx, 0, "t", "").await;
        let image = fx.service.add_image(article.id, png(), "pw").await.unwrap().unwrap();

        assert!(!fx.service.delete_image(article.id, image.id, "bad").await.unwrap());
        assert_eq!(fx.service.read_one(article.id).await.unwrap().images.len(), 1);

        assert!(fx.service.delete_image(article.id, image.id, "pw").await.unwrap());
        assert!(fx.service.read_one(article.id).await.unwrap().images.is_empty());
    }

    #[tokio::test]
    async fn test_delete_image_of_other_article() {
        let fx = setup().await;
        let owner = post(&fx, 0, "owner", "").await;
        let other = post(&fx, 0, "other", "").await;
        let image = fx.service.add_image(owner.id, png(), "pw").await.unwrap().unwrap();

        assert!(matches!(
            fx.service.delete_image(other.id, image.id, "pw").await,
            Err(ArticleServiceError::NotFound(_))
        ));
        assert!(matches!(
            fx.service.delete_image(owner.id, image.id + 100, "pw").await,
            Err(ArticleServiceError::NotFound(_))
        ));
    }

    // ========================================================================
    // Property tests
    // ========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Creating an article and reading it back returns the submitted text.
        #[test]
        fn property_article_roundtrip(
            title in "[a-zA-Z][a-zA-Z0-9 ]{0,40}",
            content in "[a-zA-Z0-9 #.,]{0,200}"
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let fx = setup().await;
                let created = fx
                    .service
                    .create(CreateArticleInput::new(fx.boards[0], title.clone(), content.clone(), "pw"))
                    .await
                    .unwrap();

                let read = fx.service.read_one(created.article.id).await.unwrap();
                prop_assert_eq!(&read.article.title, &title);
                prop_assert_eq!(&read.article.content, &content);

                let tags: Vec<String> = read.hashtags.into_iter().map(|t| t.tag).collect();
                prop_assert_eq!(tags, extract_hashtags(&content));
                Ok(())
            });
            result?;
        }

        /// Global search returns the union of the per-board searches.
        #[test]
        fn property_search_scoping(
            placements in proptest::collection::vec((0usize..2, any::<bool>()), 1..8)
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let fx = setup().await;
                let mut expected = Vec::new();
                for (i, (board, matches)) in placements.iter().enumerate() {
                    let title = if *matches { format!("needle {}", i) } else { format!("hay {}", i) };
                    let article = post(&fx, *board, &title, "").await;
                    if *matches {
                        expected.push((article.id, fx.boards[*board]));
                    }
                }

                let global = fx.service.search(ALL_BOARDS, "title", "needle").await.unwrap();
                prop_assert_eq!(ids(&global), expected.iter().map(|(id, _)| *id).collect::<Vec<_>>());

                for board in &fx.boards {
                    let scoped = fx.service.search(*board, "title", "needle").await.unwrap();
                    let want: Vec<i64> = expected
                        .iter()
                        .filter(|(_, b)| b == board)
                        .map(|(id, _)| *id)
                        .collect();
                    prop_assert_eq!(ids(&scoped), want);
                }
                Ok(())
            });
            result?;
        }
    }
}
