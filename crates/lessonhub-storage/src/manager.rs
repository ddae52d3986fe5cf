//! Object store selection from configuration.

use std::sync::Arc;

use tracing::info;

use lessonhub_core::config::storage::StorageConfig;
use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::traits::ObjectStore;

use crate::providers::local::LocalObjectStore;

/// Build the object store named by the configuration.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    match config.provider.as_str() {
        "local" => {
            info!(root = %config.data_root, "Initializing local object store");
            let store =
                LocalObjectStore::new(&config.data_root, &config.public_base_url).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "s3")]
        "s3" => {
            info!(bucket = %config.s3.bucket, "Initializing S3 object store");
            let store = crate::providers::s3::S3ObjectStore::new(&config.s3).await?;
            Ok(Arc::new(store))
        }
        other => Err(AppError::configuration(format!(
            "Unknown storage provider '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builds_local_provider() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_root: dir.path().to_str().unwrap().to_string(),
            ..StorageConfig::default()
        };

        let store = build_object_store(&config).await.unwrap();
        assert_eq!(store.provider_type(), "local");
        assert!(store.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider_is_a_configuration_error() {
        let config = StorageConfig {
            provider: "ftp".to_string(),
            ..StorageConfig::default()
        };
        assert!(build_object_store(&config).await.is_err());
    }
}
