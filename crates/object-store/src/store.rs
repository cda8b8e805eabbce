//! The backing-store contract consumed by the filesystem tree.
//!
//! Everything here is synchronous: a call blocks until the backend answers.
//! There is no retry, no backoff and no caching at this layer.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::error::Result;

/// Object header metadata (content type and friends), captured at discovery
/// time and replayed on rewrite.
pub type Headers = BTreeMap<String, String>;

/// Parameters of one page-limited list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub bucket: String,
    pub prefix: String,
    pub delimiter: String,
    /// Resume after this key; empty for the first page.
    pub marker: String,
    pub max_keys: usize,
}

impl ListRequest {
    pub fn new(bucket: &str, prefix: &str, delimiter: &str, max_keys: usize) -> Self {
        Self {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            delimiter: delimiter.to_string(),
            marker: String::new(),
            max_keys,
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }
}

/// Listing metadata for a single stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    /// Content checksum as reported by the store (an ETag, possibly quoted).
    pub fingerprint: String,
    pub size: u64,
    /// Empty when the store's list call does not report headers.
    pub headers: Headers,
}

/// One page of a delimited listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Common prefixes, each ending with the delimiter, in ascending order.
    pub prefixes: Vec<String>,
    /// Objects directly under the prefix, in ascending key order.
    pub objects: Vec<ObjectSummary>,
    /// More results follow this page.
    pub truncated: bool,
}

/// A bucket-oriented object store.
pub trait Store: Send + Sync {
    fn list(&self, request: &ListRequest) -> Result<ListPage>;

    /// Fetch the object body. Never served from a cache.
    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectSummary>;

    fn put_object(&self, bucket: &str, key: &str, data: Bytes, headers: &Headers) -> Result<()>;

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    fn list_buckets(&self) -> Result<Vec<String>>;

    fn create_bucket(&self, name: &str) -> Result<()>;

    fn delete_bucket(&self, name: &str) -> Result<()>;
}

/// A single listing result before pagination: either a rolled-up common
/// prefix or a literal object.
#[derive(Debug, Clone)]
pub(crate) enum ListItem {
    Prefix(String),
    Object(ObjectSummary),
}

impl ListItem {
    pub(crate) fn sort_key(&self) -> &str {
        match self {
            ListItem::Prefix(prefix) => prefix,
            ListItem::Object(object) => &object.key,
        }
    }
}

/// Cut one page out of a full delimited listing, S3 style: items sorting at
/// or before `marker` are skipped and at most `max_keys` items are returned.
/// A prefix equal to the marker is skipped together with every key it rolls up.
pub(crate) fn paginate(mut items: Vec<ListItem>, marker: &str, max_keys: usize) -> ListPage {
    items.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
    items.dedup_by(|a, b| a.sort_key() == b.sort_key());

    let limit = max_keys.max(1);
    let mut page = ListPage::default();
    let mut taken = 0;
    for item in items.into_iter().filter(|item| item.sort_key() > marker) {
        if taken == limit {
            page.truncated = true;
            break;
        }
        match item {
            ListItem::Prefix(prefix) => page.prefixes.push(prefix),
            ListItem::Object(object) => page.objects.push(object),
        }
        taken += 1;
    }
    page
}

/// Split `key` (which must start with `prefix`) into the common prefix it
/// rolls up into, if the remainder contains the delimiter.
pub(crate) fn roll_up(key: &str, prefix: &str, delimiter: &str) -> Option<String> {
    if delimiter.is_empty() {
        return None;
    }
    let rest = &key[prefix.len()..];
    rest.find(delimiter)
        .map(|idx| format!("{}{}", prefix, &rest[..idx + delimiter.len()]))
}
