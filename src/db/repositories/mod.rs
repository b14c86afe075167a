//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod article;
pub mod board;
pub mod comment;
pub mod hashtag;
pub mod image;

pub use article::{ArticleRepository, SqlxArticleRepository, ALL_BOARDS};
pub use board::{BoardRepository, SqlxBoardRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use hashtag::{HashTagRepository, SqlxHashTagRepository};
pub use image::{ArticleImageRepository, SqlxArticleImageRepository};
