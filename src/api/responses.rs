//! Shared API response types
//!
//! Pure projections of model rows and service views into JSON bodies.
//! Passwords never leave the service layer.

use serde::{Deserialize, Serialize};

use crate::models::{Article, ArticleImage, Board, Comment};
use crate::services::ArticleDetail;

// ============================================================================
// Board Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BoardResponse {
    pub id: i64,
    pub name: String,
}

impl From<&Board> for BoardResponse {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id,
            name: board.name.clone(),
        }
    }
}

/// Board listing: every board, the selected one if any, and articles newest first
#[derive(Debug, Serialize, Deserialize)]
pub struct BoardListResponse {
    pub boards: Vec<BoardResponse>,
    pub selected: Option<BoardResponse>,
    pub articles: Vec<ArticleSummary>,
}

// ============================================================================
// Article Response Types
// ============================================================================

/// Article entry in list views
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ArticleSummary {
    pub id: i64,
    pub board_id: i64,
    pub title: String,
    pub created_at: String,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            board_id: article.board_id,
            title: article.title.clone(),
            created_at: article.created_at.to_rfc3339(),
        }
    }
}

/// Project a list of articles, optionally newest first
pub fn summaries(articles: &[Article], newest_first: bool) -> Vec<ArticleSummary> {
    let mut out: Vec<ArticleSummary> = articles.iter().map(ArticleSummary::from).collect();
    if newest_first {
        out.reverse();
    }
    out
}

/// Full article with its board, images, hashtags and comments
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub board: BoardResponse,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    pub images: Vec<ImageResponse>,
    pub hashtags: Vec<String>,
    pub comments: Vec<CommentResponse>,
}

impl From<ArticleDetail> for ArticleResponse {
    fn from(detail: ArticleDetail) -> Self {
        Self {
            id: detail.article.id,
            board: BoardResponse::from(&detail.board),
            title: detail.article.title,
            content: detail.article.content,
            created_at: detail.article.created_at.to_rfc3339(),
            updated_at: detail.article.updated_at.to_rfc3339(),
            images: detail.images.iter().map(ImageResponse::from).collect(),
            hashtags: detail.hashtags.into_iter().map(|t| t.tag).collect(),
            comments: detail.comments.iter().map(CommentResponse::from).collect(),
        }
    }
}

/// Article page: the article plus its neighbours in the navigation scope
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleViewResponse {
    pub article: ArticleResponse,
    /// Board id the neighbours were taken from, 0 for every board
    pub board: i64,
    pub before: Option<ArticleSummary>,
    pub after: Option<ArticleSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HashtagArticlesResponse {
    pub tag: String,
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub criteria: String,
    pub board_id: i64,
    pub board_name: Option<String>,
    pub articles: Vec<ArticleSummary>,
}

// ============================================================================
// Image and Comment Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageResponse {
    pub id: i64,
    pub link: String,
}

impl From<&ArticleImage> for ImageResponse {
    fn from(image: &ArticleImage) -> Self {
        Self {
            id: image.id,
            link: image.link.clone(),
        }
    }
}

/// Result of an image upload; `image` is null when the password was ignored
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    pub article_id: i64,
    pub image: Option<ImageResponse>,
    pub board: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageDeleteResponse {
    pub article_id: i64,
    pub deleted: bool,
    pub board: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CommentResponse {
    pub id: i64,
    pub article_id: i64,
    pub content: String,
    pub created_at: String,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            article_id: comment.article_id,
            content: comment.content.clone(),
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}
