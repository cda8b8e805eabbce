//! Backing store for s3fsr
//!
//! This crate defines the [`Store`] contract the filesystem tree is built
//! against, plus the implementations it ships with:
//!
//! - [`MemoryStore`]: in-process buckets with S3 listing semantics
//! - [`ObjectStoreBackend`]: local filesystem or S3-compatible storage via the
//!   `object_store` crate
//!
//! # Example
//!
//! ```rust
//! use object_store_backend::{ListRequest, MemoryStore, Store};
//!
//! let store = MemoryStore::with_buckets(["photos"]);
//! store
//!     .put_object("photos", "2024/cat.jpg", "meow".into(), &Default::default())
//!     .unwrap();
//!
//! let page = store.list(&ListRequest::new("photos", "", "/", 1000)).unwrap();
//! assert_eq!(page.prefixes, vec!["2024/".to_string()]);
//! ```

mod backend;
mod error;
mod memory;
mod storage;
mod store;
pub mod testkit;

pub use backend::{ObjectStoreBackend, S3Settings};
pub use error::{Result, StoreError};
pub use memory::{fingerprint, MemoryStore};
pub use storage::StoreConfig;
pub use store::{Headers, ListPage, ListRequest, ObjectSummary, Store};

/// Key suffix written by S3 Organizer (and friends) for directory markers.
pub const ORGANIZER_DIR_SUFFIX: &str = "_$folder$";
