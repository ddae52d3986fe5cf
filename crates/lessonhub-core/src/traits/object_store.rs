//! Object storage trait for uploaded PDFs and receipt images.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for object storage backends.
///
/// The trait is defined here in `lessonhub-core` and implemented in
/// `lessonhub-storage` for the local filesystem and S3-compatible
/// services. Paths are forward-slash separated keys relative to the
/// provider root.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store bytes at the given path, returning the storage reference.
    async fn put(&self, path: &str, data: Bytes) -> AppResult<String>;

    /// Build the public download URL for a stored object.
    fn public_url(&self, path: &str) -> String;

    /// Check whether an object exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Delete the object at the given path.
    async fn delete(&self, path: &str) -> AppResult<()>;
}
