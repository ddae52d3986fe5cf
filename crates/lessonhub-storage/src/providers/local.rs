//! Local filesystem object store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use lessonhub_core::error::{AppError, ErrorKind};
use lessonhub_core::result::AppResult;
use lessonhub_core::traits::ObjectStore;

/// Local filesystem object store.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    /// Root directory for all stored objects.
    root: PathBuf,
    /// Public base URL prefixed to paths when building download URLs.
    public_base_url: String,
}

impl LocalObjectStore {
    /// Create a new local object store rooted at the given path.
    pub async fn new(root_path: &str, public_base_url: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a relative path to an absolute path within the root.
    ///
    /// Rejects traversal components so a key can never escape the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let clean = path.trim_start_matches('/');
        if clean.is_empty() {
            return Err(AppError::validation("Storage path must not be empty"));
        }
        if clean
            .split('/')
            .any(|component| component == ".." || component.is_empty())
        {
            return Err(AppError::validation(format!(
                "Invalid storage path: '{path}'"
            )));
        }
        Ok(self.root.join(clean))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn put(&self, path: &str, data: Bytes) -> AppResult<String> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {path}"),
                e,
            )
        })?;

        debug!(path = %path, size = data.len(), "Object stored");
        Ok(path.trim_start_matches('/').to_string())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path.trim_start_matches('/'))
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        Ok(fs::try_exists(&full_path).await.unwrap_or(false))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::not_found(format!("Object not found: {path}")))
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete object: {path}"),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, LocalObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(
            dir.path().to_str().unwrap(),
            "http://localhost:8080/files",
        )
        .await
        .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_put_exists_delete_round_trip() {
        let (_dir, store) = store().await;

        let path = "content/grade-3/fractions.pdf";
        let stored = store.put(path, Bytes::from_static(b"%PDF-1.7")).await.unwrap();
        assert_eq!(stored, path);
        assert!(store.exists(path).await.unwrap());

        store.delete(path).await.unwrap();
        assert!(!store.exists(path).await.unwrap());
    }

    #[tokio::test]
    async fn test_public_url_joins_base() {
        let (_dir, store) = store().await;
        assert_eq!(
            store.public_url("receipts/abc.png"),
            "http://localhost:8080/files/receipts/abc.png"
        );
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let (_dir, store) = store().await;
        assert!(
            store
                .put("../outside.pdf", Bytes::from_static(b"x"))
                .await
                .is_err()
        );
        assert!(store.exists("a//b").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (_dir, store) = store().await;
        let err = store.delete("nope.pdf").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
