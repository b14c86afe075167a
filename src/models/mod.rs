//! Data models
//!
//! This module contains the data structures shared by the repositories and
//! services of the community board:
//! - Database entities (Board, Article, Comment, ArticleImage, HashTag)
//! - Input types consumed by the repositories

mod article;
mod board;
mod comment;
mod hashtag;
mod image;

pub use article::{Article, CreateArticleInput, SearchCriteria, UpdateArticleInput};
pub use board::Board;
pub use comment::{Comment, CreateCommentInput};
pub use hashtag::HashTag;
pub use image::{ArticleImage, CreateArticleImageInput};
