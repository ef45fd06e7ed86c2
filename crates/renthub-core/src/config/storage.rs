//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Storage backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage provider type; currently only `"local"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Root directory for locally stored objects.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Pre-signed upload ticket lifetime in minutes.
    #[serde(default = "default_presign_ttl")]
    pub presign_ttl_minutes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            data_root: default_data_root(),
            max_upload_size_bytes: default_max_upload(),
            presign_ttl_minutes: default_presign_ttl(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_data_root() -> String {
    "data".to_string()
}

fn default_max_upload() -> u64 {
    10 * 1024 * 1024
}

fn default_presign_ttl() -> u64 {
    15
}
