//! Blob Storage
//!
//! File-backed blob store: uploads land under a root directory and are
//! addressed by a stable public URL. Uploads happen outside the document
//! transaction, so a failed submission can leave an orphaned blob behind;
//! that window is accepted.

use shared::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Maximum blob size (5MB)
const MAX_BLOB_SIZE: usize = 5 * 1024 * 1024;

/// File-backed blob store
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Create a store rooted at `root` (created on first upload)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store `bytes` under `path` (relative, forward-slash separated) and
    /// return the public URL.
    pub async fn upload(&self, path: &str, bytes: &[u8]) -> AppResult<String> {
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(AppError::validation(format!(
                "File too large ({} bytes, max {MAX_BLOB_SIZE})",
                bytes.len()
            )));
        }
        let relative = sanitize_relative(path)?;
        let target = self.root.join(&relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::internal(format!("Failed to create blob dir: {e}")))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| AppError::internal(format!("Failed to write blob: {e}")))?;

        tracing::debug!(path = %relative.display(), size = bytes.len(), "blob stored");
        Ok(format!("/uploads/{}", relative.display()))
    }

    /// Read a blob back by the relative path it was stored under
    pub async fn download(&self, path: &str) -> AppResult<Vec<u8>> {
        let relative = sanitize_relative(path)?;
        tokio::fs::read(self.root.join(&relative))
            .await
            .map_err(|e| AppError::not_found(format!("blob {path}: {e}")))
    }
}

/// Reject traversal segments and absolute paths
fn sanitize_relative(path: &str) -> AppResult<PathBuf> {
    let candidate = Path::new(path);
    if candidate.is_absolute()
        || candidate
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(AppError::invalid(format!("Invalid blob path: {path}")));
    }
    Ok(candidate.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path());
        let url = blobs
            .upload("reviews/u1/12345_photo.jpg", b"jpegbytes")
            .await
            .unwrap();
        assert_eq!(url, "/uploads/reviews/u1/12345_photo.jpg");
        let bytes = blobs.download("reviews/u1/12345_photo.jpg").await.unwrap();
        assert_eq!(bytes, b"jpegbytes");
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path());
        assert!(blobs.upload("../escape.jpg", b"x").await.is_err());
        assert!(blobs.upload("/abs.jpg", b"x").await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_oversized() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path());
        let big = vec![0u8; MAX_BLOB_SIZE + 1];
        let err = blobs.upload("a.jpg", &big).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
