use object_store_backend::{Headers, ObjectSummary};

use crate::naming::{last_path_segment, marker_dir_name, marker_dir_prefix, DELIMITER};

/// Stable handle to an entry in a [`Tree`](super::Tree).
///
/// Handles are never reused; once an entry is deleted or its parent's
/// listing is reset, its handle stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) u64);

/// A stored object. Only the metadata captured at discovery is kept; the body
/// is fetched on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub bucket: String,
    pub key: String,
    pub size: u64,
    pub headers: Headers,
}

impl FileEntry {
    pub fn from_summary(bucket: &str, summary: ObjectSummary) -> Self {
        Self {
            bucket: bucket.to_string(),
            key: summary.key,
            size: summary.size,
            headers: summary.headers,
        }
    }
}

/// A node of the virtual filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(FileEntry),
    /// Directory inferred from a common prefix (or created with a `dir/`
    /// marker). `key` ends with the delimiter.
    PrefixDir { bucket: String, key: String },
    /// Directory materialized from a legacy marker object at `key`.
    MarkerDir { bucket: String, key: String },
    /// A whole bucket.
    BucketDir { bucket: String },
    /// The bucket list.
    Root,
}

impl Entry {
    pub fn prefix_dir(bucket: &str, key: impl Into<String>) -> Self {
        Entry::PrefixDir {
            bucket: bucket.to_string(),
            key: key.into(),
        }
    }

    pub fn marker_dir(bucket: &str, key: impl Into<String>) -> Self {
        Entry::MarkerDir {
            bucket: bucket.to_string(),
            key: key.into(),
        }
    }

    pub fn bucket_dir(bucket: impl Into<String>) -> Self {
        Entry::BucketDir {
            bucket: bucket.into(),
        }
    }

    /// Display name, unique among siblings.
    pub fn name(&self) -> &str {
        match self {
            Entry::File(file) => last_path_segment(&file.key),
            Entry::PrefixDir { key, .. } => last_path_segment(key),
            Entry::MarkerDir { key, .. } => marker_dir_name(key),
            Entry::BucketDir { bucket } => bucket,
            Entry::Root => DELIMITER,
        }
    }

    pub fn is_directory(&self) -> bool {
        !self.is_file()
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File(_))
    }

    /// Files can be created directly inside this entry. Only true for
    /// directories living inside a bucket.
    pub fn can_write_files(&self) -> bool {
        matches!(
            self,
            Entry::PrefixDir { .. } | Entry::MarkerDir { .. } | Entry::BucketDir { .. }
        )
    }

    pub fn size(&self) -> u64 {
        match self {
            Entry::File(file) => file.size,
            _ => 0,
        }
    }

    pub fn bucket(&self) -> Option<&str> {
        match self {
            Entry::File(FileEntry { bucket, .. })
            | Entry::PrefixDir { bucket, .. }
            | Entry::MarkerDir { bucket, .. }
            | Entry::BucketDir { bucket } => Some(bucket),
            Entry::Root => None,
        }
    }

    /// The object key backing this entry, if there is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Entry::File(FileEntry { key, .. })
            | Entry::PrefixDir { key, .. }
            | Entry::MarkerDir { key, .. } => Some(key),
            Entry::BucketDir { .. } | Entry::Root => None,
        }
    }

    /// Prefix used to list this directory's children within its bucket.
    pub fn list_prefix(&self) -> Option<String> {
        match self {
            Entry::PrefixDir { key, .. } => Some(key.clone()),
            Entry::MarkerDir { key, .. } => Some(marker_dir_prefix(key)),
            Entry::BucketDir { .. } => Some(String::new()),
            Entry::File(_) | Entry::Root => None,
        }
    }
}
