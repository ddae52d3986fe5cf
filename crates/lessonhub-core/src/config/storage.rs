//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which provider to use: `"local"` or `"s3"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Root directory for the local provider.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Public base URL prefixed to stored paths when building download URLs.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// S3 settings (used when `provider = "s3"`).
    #[serde(default)]
    pub s3: S3Config,
}

/// S3-compatible storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct S3Config {
    /// Bucket name.
    #[serde(default)]
    pub bucket: String,
    /// AWS region.
    #[serde(default)]
    pub region: String,
    /// Optional custom endpoint for S3-compatible services.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            data_root: default_data_root(),
            public_base_url: default_public_base_url(),
            s3: S3Config::default(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_data_root() -> String {
    "data/storage".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/files".to_string()
}
