//! Board model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A board groups articles under a unique name.
///
/// Boards are only created by seeding at startup and are never updated or
/// deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Board {
    /// Unique identifier
    pub id: i64,
    /// Display name, unique across boards
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Board {
    /// Create a new board with the given name.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0, // Will be set by the database
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
