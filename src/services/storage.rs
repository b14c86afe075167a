//! Image file storage
//!
//! Uploaded images are written under the configured upload directory with a
//! random UUID file name and exposed at `/uploads/<file name>`.

use crate::config::UploadConfig;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

/// URL prefix under which stored files are served
pub const PUBLIC_PREFIX: &str = "/uploads";

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Error types for image storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid file type: {content_type}. Allowed types: {allowed:?}")]
    InvalidType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File too large: {size} bytes (maximum {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("Empty file")]
    Empty,

    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes and removes image files for article attachments
#[derive(Debug, Clone)]
pub struct ImageStorage {
    config: UploadConfig,
}

impl ImageStorage {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    /// Check type and size limits without touching the filesystem
    pub fn validate(&self, upload: &ImageUpload) -> Result<(), StorageError> {
        if !self.config.is_type_allowed(&upload.content_type) {
            return Err(StorageError::InvalidType {
                content_type: upload.content_type.clone(),
                allowed: self.config.allowed_types.clone(),
            });
        }

        if upload.data.is_empty() {
            return Err(StorageError::Empty);
        }

        let size = upload.data.len() as u64;
        if size > self.config.max_file_size {
            return Err(StorageError::TooLarge {
                size,
                max: self.config.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate and write an upload, returning its public link
    pub async fn save(&self, upload: &ImageUpload) -> Result<String, StorageError> {
        self.validate(upload)?;

        fs::create_dir_all(&self.config.path).await?;

        let ext = self.config.get_extension(&upload.content_type);
        let file_name = format!("{}.{}", Uuid::new_v4(), ext);
        fs::write(self.config.path.join(&file_name), &upload.data).await?;

        tracing::debug!(
            "Stored upload {:?} as {} ({} bytes)",
            upload.file_name,
            file_name,
            upload.data.len()
        );

        Ok(format!("{}/{}", PUBLIC_PREFIX, file_name))
    }

    /// Remove the file behind a link. Failures are logged, never returned.
    pub async fn remove(&self, link: &str) {
        let Some(path) = self.path_for(link) else {
            tracing::warn!("Refusing to remove file for unexpected link: {}", link);
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => tracing::debug!("Removed stored file {:?}", path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Stored file already gone: {:?}", path)
            }
            Err(e) => tracing::warn!("Failed to remove stored file {:?}: {}", path, e),
        }
    }

    /// Map a public link back to a path inside the upload directory
    fn path_for(&self, link: &str) -> Option<PathBuf> {
        let name = link.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return None;
        }
        Some(self.config.path.join(name))
    }
}
