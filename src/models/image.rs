//! Article image model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An image attached to an article.
///
/// `link` is the public URL path of the stored file, e.g. `/uploads/<uuid>.png`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleImage {
    pub id: i64,
    pub article_id: i64,
    pub link: String,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a stored image
#[derive(Debug, Clone)]
pub struct CreateArticleImageInput {
    pub article_id: i64,
    pub link: String,
}
