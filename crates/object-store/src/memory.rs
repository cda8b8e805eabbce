//! In-memory store with S3 listing semantics (delimiter roll-up, marker,
//! max-keys, MD5 ETags). Used for tests and the `memory` backend.

use std::collections::{BTreeMap, BTreeSet};

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::{Result, StoreError};
use crate::store::{paginate, roll_up, Headers, ListItem, ListPage, ListRequest, ObjectSummary, Store};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    headers: Headers,
    fingerprint: String,
}

impl StoredObject {
    fn summary(&self, key: &str) -> ObjectSummary {
        ObjectSummary {
            key: key.to_string(),
            // S3 reports ETags quoted
            fingerprint: format!("\"{}\"", self.fingerprint),
            size: self.data.len() as u64,
            headers: self.headers.clone(),
        }
    }
}

type Bucket = BTreeMap<String, StoredObject>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: RwLock<BTreeMap<String, Bucket>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds the given (empty) buckets.
    pub fn with_buckets<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let buckets = names
            .into_iter()
            .map(|name| (name.into(), Bucket::new()))
            .collect();
        Self {
            buckets: RwLock::new(buckets),
        }
    }

    /// Number of objects stored in `bucket`, if it exists.
    pub fn object_count(&self, bucket: &str) -> Option<usize> {
        self.buckets.read().get(bucket).map(|objects| objects.len())
    }
}

/// MD5 hex digest, the ETag S3 assigns to a single-part upload.
pub fn fingerprint(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

impl Store for MemoryStore {
    fn list(&self, request: &ListRequest) -> Result<ListPage> {
        let buckets = self.buckets.read();
        let objects = buckets
            .get(&request.bucket)
            .ok_or_else(|| StoreError::BucketNotFound(request.bucket.clone()))?;

        let mut prefixes = BTreeSet::new();
        let mut items = Vec::new();
        for (key, object) in objects.range(request.prefix.clone()..) {
            if !key.starts_with(&request.prefix) {
                break;
            }
            match roll_up(key, &request.prefix, &request.delimiter) {
                Some(prefix) => {
                    prefixes.insert(prefix);
                }
                None => items.push(ListItem::Object(object.summary(key))),
            }
        }
        items.extend(prefixes.into_iter().map(ListItem::Prefix));

        Ok(paginate(items, &request.marker, request.max_keys))
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let buckets = self.buckets.read();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| StoreError::BucketNotFound(bucket.to_string()))?;
        objects
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| StoreError::object_not_found(bucket, key))
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectSummary> {
        let buckets = self.buckets.read();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| StoreError::BucketNotFound(bucket.to_string()))?;
        objects
            .get(key)
            .map(|object| object.summary(key))
            .ok_or_else(|| StoreError::object_not_found(bucket, key))
    }

    fn put_object(&self, bucket: &str, key: &str, data: Bytes, headers: &Headers) -> Result<()> {
        let mut buckets = self.buckets.write();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::BucketNotFound(bucket.to_string()))?;
        let object = StoredObject {
            fingerprint: fingerprint(&data),
            data,
            headers: headers.clone(),
        };
        objects.insert(key.to_string(), object);
        Ok(())
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let mut buckets = self.buckets.write();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::BucketNotFound(bucket.to_string()))?;
        // S3 deletes are idempotent
        objects.remove(key);
        Ok(())
    }

    fn list_buckets(&self) -> Result<Vec<String>> {
        Ok(self.buckets.read().keys().cloned().collect())
    }

    fn create_bucket(&self, name: &str) -> Result<()> {
        let mut buckets = self.buckets.write();
        if buckets.contains_key(name) {
            return Err(StoreError::BucketAlreadyExists(name.to_string()));
        }
        buckets.insert(name.to_string(), Bucket::new());
        Ok(())
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        let mut buckets = self.buckets.write();
        match buckets.get(name) {
            None => Err(StoreError::BucketNotFound(name.to_string())),
            Some(objects) if !objects.is_empty() => {
                Err(StoreError::BucketNotEmpty(name.to_string()))
            }
            Some(_) => {
                buckets.remove(name);
                Ok(())
            }
        }
    }
}
