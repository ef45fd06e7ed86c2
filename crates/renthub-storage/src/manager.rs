//! Storage manager wiring the configured provider and the presigner.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::info;

use renthub_core::config::storage::StorageConfig;
use renthub_core::error::AppError;
use renthub_core::result::AppResult;
use renthub_core::traits::storage::{ByteStream, StorageProvider};

use crate::presign::Presigner;
use crate::providers::local::LocalStorageProvider;

/// A pre-signed upload handed back to the client.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PresignedUpload {
    /// Opaque upload ticket.
    pub ticket: String,
    /// Relative URL to `PUT` the payload to.
    pub upload_url: String,
    /// Storage path the object will land at.
    pub path: String,
    /// Ticket expiry.
    pub expires_at: DateTime<Utc>,
}

/// Manages the configured storage backend and upload tickets.
#[derive(Debug, Clone)]
pub struct StorageManager {
    /// The active provider.
    provider: Arc<dyn StorageProvider>,
    /// Upload ticket signer.
    presigner: Presigner,
    /// Maximum accepted upload size in bytes.
    max_upload_size: u64,
}

impl StorageManager {
    /// Create a storage manager from configuration.
    ///
    /// Tickets are signed with the given secret (shared with the auth
    /// subsystem's JWT secret in the default wiring).
    pub async fn new(config: &StorageConfig, signing_secret: &str) -> AppResult<Self> {
        let provider: Arc<dyn StorageProvider> = match config.provider.as_str() {
            "local" => {
                info!(root = %config.data_root, "Initializing local storage provider");
                Arc::new(LocalStorageProvider::new(&config.data_root).await?)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: '{other}'. Supported: local"
                )));
            }
        };

        Ok(Self {
            provider,
            presigner: Presigner::new(signing_secret, config.presign_ttl_minutes),
            max_upload_size: config.max_upload_size_bytes,
        })
    }

    /// Issue a pre-signed upload for the given path and content type.
    pub fn presign_upload(&self, path: &str, content_type: &str) -> AppResult<PresignedUpload> {
        let path = sanitize_path(path)?;
        let (ticket, expires_at) = self.presigner.issue(&path, content_type)?;
        Ok(PresignedUpload {
            upload_url: format!("/api/uploads/{ticket}"),
            ticket,
            path,
            expires_at,
        })
    }

    /// Accept an uploaded payload against a ticket.
    ///
    /// Verifies the ticket, checks the declared content type and size,
    /// and writes through the provider. Returns the storage path.
    pub async fn store_upload(
        &self,
        ticket: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> AppResult<String> {
        let claims = self.presigner.verify(ticket)?;

        if data.len() as u64 > self.max_upload_size {
            return Err(AppError::validation(format!(
                "Upload exceeds the {} byte limit",
                self.max_upload_size
            )));
        }

        match content_type {
            Some(ct) if ct == claims.content_type => {}
            Some(_) => {
                return Err(AppError::validation(
                    "Content-Type does not match the upload ticket",
                ));
            }
            None => {
                return Err(AppError::validation("Content-Type header is required"));
            }
        }

        self.provider.write(&claims.path, data).await?;
        Ok(claims.path)
    }

    /// Open a stored object for streaming reads.
    pub async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let path = sanitize_path(path)?;
        self.provider.read(&path).await
    }

    /// Check that the backend is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.provider.health_check().await
    }
}

/// Reject traversal segments and normalize leading slashes.
fn sanitize_path(path: &str) -> AppResult<String> {
    let clean = path.trim_start_matches('/');
    if clean.is_empty() {
        return Err(AppError::validation("Storage path cannot be empty"));
    }
    if clean.split('/').any(|seg| seg == ".." || seg.is_empty()) {
        return Err(AppError::validation("Invalid storage path"));
    }
    Ok(clean.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/a/b.png").unwrap(), "a/b.png");
        assert!(sanitize_path("a/../b.png").is_err());
        assert!(sanitize_path("a//b.png").is_err());
        assert!(sanitize_path("").is_err());
    }
}
