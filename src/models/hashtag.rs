//! HashTag model
//!
//! Hashtags are derived from article content and linked to articles through
//! the `article_hashtags` association table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// HashTag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HashTag {
    /// Unique identifier
    pub id: i64,
    /// Tag text without the leading `#`, unique
    pub tag: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
