//! Backend selection (memory / local filesystem / S3).

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::{ObjectStoreBackend, S3Settings};
use crate::error::Result;
use crate::memory::MemoryStore;
use crate::store::Store;

/// Configuration for the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-memory storage (for testing); starts with the listed empty buckets
    Memory {
        #[serde(default)]
        buckets: Vec<String>,
    },

    /// Local filesystem storage, one sub-directory per bucket
    Local {
        /// Path to the storage directory
        path: PathBuf,
    },

    /// S3-compatible storage (AWS S3, MinIO, etc.)
    S3 {
        /// S3 endpoint URL (e.g., "http://localhost:9000" for MinIO)
        #[serde(default)]
        endpoint: Option<String>,
        /// Optional region (defaults to "us-east-1")
        #[serde(default)]
        region: Option<String>,
        /// Access key ID (falls back to AWS_ACCESS_KEY_ID)
        #[serde(default)]
        access_key: Option<String>,
        /// Secret access key (falls back to AWS_SECRET_ACCESS_KEY)
        #[serde(default)]
        secret_key: Option<String>,
        /// Buckets exposed through the filesystem
        buckets: Vec<String>,
    },
}

impl StoreConfig {
    /// Build the store client. Done once at startup; the resulting handle is
    /// passed to everything that needs it.
    pub fn open(&self) -> Result<Arc<dyn Store>> {
        let store: Arc<dyn Store> = match self {
            StoreConfig::Memory { buckets } => Arc::new(MemoryStore::with_buckets(buckets.clone())),
            StoreConfig::Local { path } => Arc::new(ObjectStoreBackend::local(path.clone())?),
            StoreConfig::S3 {
                endpoint,
                region,
                access_key,
                secret_key,
                buckets,
            } => {
                let settings = S3Settings {
                    endpoint: endpoint.clone(),
                    region: region.clone(),
                    access_key: access_key.clone(),
                    secret_key: secret_key.clone(),
                };
                Arc::new(ObjectStoreBackend::s3(settings, buckets.clone())?)
            }
        };
        tracing::debug!(config = ?self.kind(), "opened backing store");
        Ok(store)
    }

    fn kind(&self) -> &'static str {
        match self {
            StoreConfig::Memory { .. } => "memory",
            StoreConfig::Local { .. } => "local",
            StoreConfig::S3 { .. } => "s3",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_config_toml_tags() {
        let config: StoreConfig = toml::from_str(
            r#"
            type = "s3"
            endpoint = "http://localhost:9000"
            buckets = ["photos", "backups"]
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            StoreConfig::S3 {
                endpoint: Some("http://localhost:9000".to_string()),
                region: None,
                access_key: None,
                secret_key: None,
                buckets: vec!["photos".to_string(), "backups".to_string()],
            }
        );

        let config: StoreConfig = toml::from_str(r#"type = "memory""#).unwrap();
        assert_eq!(config, StoreConfig::Memory { buckets: vec![] });
    }

    #[test]
    fn test_open_memory() {
        let config = StoreConfig::Memory {
            buckets: vec!["a".to_string(), "b".to_string()],
        };
        let store = config.open().unwrap();
        assert_eq!(store.list_buckets().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_open_local_creates_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("buckets");
        let store = StoreConfig::Local { path: path.clone() }.open().unwrap();
        assert!(path.is_dir());
        assert!(store.list_buckets().unwrap().is_empty());
    }
}
