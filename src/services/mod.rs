//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories. They are
//! responsible for:
//! - Existence checks and validation
//! - The password gate on updates and deletes
//! - Assembling views from rows referenced by id

pub mod article;
pub mod board;
pub mod comment;
pub mod hashtag;
pub mod password;
pub mod storage;

pub use article::{ArticleDetail, ArticleService, ArticleServiceError};
pub use board::{BoardDetail, BoardService, BoardServiceError};
pub use comment::{CommentService, CommentServiceError};
pub use hashtag::{extract_hashtags, normalize_tag};
pub use password::{PasswordGate, PasswordRejected};
pub use storage::{ImageStorage, ImageUpload, StorageError};
