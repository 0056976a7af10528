//! Storage for validated uploads.
//!
//! Files are written as `<root>/<kind>/<uuid>.<ext>` and referenced in the
//! store by the path relative to the media root.

use std::path::{Path, PathBuf};

use servdesk_core::images::ValidatedImage;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Which kind of image is being stored; each gets its own directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Photos attached to a submitted application.
    Application,
    /// Design images attached when an application is completed.
    Design,
    /// Category pictures.
    Category,
}

impl MediaKind {
    pub fn dir(self) -> &'static str {
        match self {
            Self::Application => "applications",
            Self::Design => "designs",
            Self::Category => "categories",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `image` under its kind's directory and return the stored reference.
    pub async fn save(&self, kind: MediaKind, image: &ValidatedImage) -> AppResult<String> {
        let dir = self.root.join(kind.dir());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to create media dir: {e}")))?;

        let file_name = format!("{}.{}", Uuid::new_v4(), image.extension);
        tokio::fs::write(dir.join(&file_name), &image.bytes)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;

        let reference = format!("{}/{file_name}", kind.dir());
        tracing::debug!(
            %reference,
            bytes = image.bytes.len(),
            width = image.width,
            height = image.height,
            "Stored upload"
        );
        Ok(reference)
    }

    /// Remove a previously stored file. Failures are logged, not returned.
    pub async fn remove(&self, reference: &str) {
        if let Err(e) = tokio::fs::remove_file(self.root.join(reference)).await {
            tracing::warn!(%reference, error = %e, "Failed to remove stored upload");
        }
    }
}
