//! Article model
//!
//! This module provides:
//! - `Article` entity representing a post on a board
//! - Input types for creating and updating articles
//! - `SearchCriteria` selecting the field a keyword search matches against

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier, also the insertion order
    pub id: i64,
    /// Owning board ID
    pub board_id: i64,
    /// Article title
    pub title: String,
    /// Plain text content, may contain `#hashtags`
    pub content: String,
    /// Shared secret gating updates and deletes
    #[serde(skip_serializing)]
    pub password: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Exact, case-sensitive comparison against the stored password
    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }
}

/// Input for creating a new article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArticleInput {
    /// Board the article is posted to
    pub board_id: i64,
    /// Article title
    pub title: String,
    /// Article content
    pub content: String,
    /// Password required for later updates and deletes
    pub password: String,
}

impl CreateArticleInput {
    /// Create a new CreateArticleInput
    pub fn new(
        board_id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            board_id,
            title: title.into(),
            content: content.into(),
            password: password.into(),
        }
    }
}

/// Input for updating an existing article
///
/// Only title and content are mutable; the password is checked separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateArticleInput {
    pub title: String,
    pub content: String,
}

/// Field a keyword search is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCriteria {
    Title,
    Content,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self::Title
    }
}

impl SearchCriteria {
    /// String form used in query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchCriteria::Title => "title",
            SearchCriteria::Content => "content",
        }
    }

    /// Parse from a query parameter value (exact, lowercase)
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "title" => Some(SearchCriteria::Title),
            "content" => Some(SearchCriteria::Content),
            _ => None,
        }
    }
}

impl std::fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
