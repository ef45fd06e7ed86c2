//! Storage provider trait for pluggable object storage backends.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::result::AppResult;

/// A stream of byte chunks read from storage.
pub type ByteStream = BoxStream<'static, AppResult<Bytes>>;

/// Trait for object storage backends.
///
/// Paths are provider-relative, `/`-separated, and never contain `..`
/// segments (the caller sanitizes before handing them down).
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Short identifier of the backend (`"local"`, ...).
    fn provider_type(&self) -> &str;

    /// Check that the backend is reachable and writable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write an object, replacing any existing one. Returns the byte count.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<u64>;

    /// Open an object for streaming reads.
    async fn read(&self, path: &str) -> AppResult<ByteStream>;

    /// Delete an object. Returns `false` if it did not exist.
    async fn delete(&self, path: &str) -> AppResult<bool>;

    /// Check whether an object exists.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
