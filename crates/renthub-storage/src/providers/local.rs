//! Local filesystem storage provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use renthub_core::error::{AppError, ErrorKind};
use renthub_core::result::AppResult;
use renthub_core::traits::storage::{ByteStream, StorageProvider};

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored objects.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = path.trim_start_matches('/');
        self.root.join(clean)
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
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<u64> {
        let full_path = self.resolve(path);
        self.ensure_parent(&full_path).await?;

        let size = data.len() as u64;
        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {path}"),
                e,
            )
        })?;

        debug!(path, size, "Stored object");
        Ok(size)
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(path);
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open object: {path}"),
                    e,
                )
            }
        })?;

        let stream = ReaderStream::new(file)
            .map(|chunk| chunk.map_err(AppError::from))
            .boxed();
        Ok(stream)
    }

    async fn delete(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path);
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete object: {path}"),
                e,
            )),
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.resolve(path).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_delete() {
        let root = std::env::temp_dir().join(format!("renthub-storage-{}", uuid::Uuid::new_v4()));
        let provider = LocalStorageProvider::new(root.to_str().unwrap()).await.unwrap();

        provider
            .write("machines/abc/front.jpg", Bytes::from_static(b"jpegdata"))
            .await
            .unwrap();
        assert!(provider.exists("machines/abc/front.jpg").await.unwrap());

        let mut stream = provider.read("machines/abc/front.jpg").await.unwrap();
        let mut collected = Vec::new();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(collected, b"jpegdata");

        assert!(provider.delete("machines/abc/front.jpg").await.unwrap());
        assert!(!provider.delete("machines/abc/front.jpg").await.unwrap());

        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let root = std::env::temp_dir().join(format!("renthub-storage-{}", uuid::Uuid::new_v4()));
        let provider = LocalStorageProvider::new(root.to_str().unwrap()).await.unwrap();

        let err = provider.read("nope.bin").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let _ = fs::remove_dir_all(&root).await;
    }
}
