//! Error types for the backing store.

use std::path::PathBuf;

/// Errors that can occur when talking to the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Object storage error
    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bucket does not exist
    #[error("bucket '{0}' does not exist")]
    BucketNotFound(String),

    /// Bucket already exists
    #[error("bucket '{0}' already exists")]
    BucketAlreadyExists(String),

    /// Bucket still holds objects
    #[error("bucket '{0}' is not empty")]
    BucketNotEmpty(String),

    /// Object not found
    #[error("object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    /// Operation the backend cannot perform
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Path error
    #[error("path error: {0}")]
    Path(PathBuf),
}

impl StoreError {
    pub fn object_not_found(bucket: &str, key: &str) -> Self {
        StoreError::ObjectNotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
