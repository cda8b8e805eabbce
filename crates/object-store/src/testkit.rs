//! Store wrappers for tests: observe or script what the tree asks of a store.

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::error::{Result, StoreError};
use crate::store::{Headers, ListPage, ListRequest, ObjectSummary, Store};

/// Wraps a store and records every list request passing through it.
pub struct RecordingStore<S> {
    inner: S,
    lists: Mutex<Vec<ListRequest>>,
    bucket_lists: Mutex<usize>,
}

impl<S: Store> RecordingStore<S> {
    pub fn new(inner: S) -> Arc<Self> {
        Arc::new(Self {
            inner,
            lists: Mutex::new(Vec::new()),
            bucket_lists: Mutex::new(0),
        })
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Every list request seen so far, in order.
    pub fn list_requests(&self) -> Vec<ListRequest> {
        self.lists.lock().clone()
    }

    pub fn list_count(&self) -> usize {
        self.lists.lock().len()
    }

    pub fn bucket_list_count(&self) -> usize {
        *self.bucket_lists.lock()
    }

    pub fn reset(&self) {
        self.lists.lock().clear();
        *self.bucket_lists.lock() = 0;
    }
}

impl<S: Store> Store for RecordingStore<S> {
    fn list(&self, request: &ListRequest) -> Result<ListPage> {
        self.lists.lock().push(request.clone());
        self.inner.list(request)
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.inner.get_object(bucket, key)
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectSummary> {
        self.inner.head_object(bucket, key)
    }

    fn put_object(&self, bucket: &str, key: &str, data: Bytes, headers: &Headers) -> Result<()> {
        self.inner.put_object(bucket, key, data, headers)
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner.delete_object(bucket, key)
    }

    fn list_buckets(&self) -> Result<Vec<String>> {
        *self.bucket_lists.lock() += 1;
        self.inner.list_buckets()
    }

    fn create_bucket(&self, name: &str) -> Result<()> {
        self.inner.create_bucket(name)
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        self.inner.delete_bucket(name)
    }
}

/// Wraps a store and drops object headers from its listings, the way an S3
/// list call reports objects. Counts HEAD requests.
pub struct HeaderlessListStore<S> {
    inner: S,
    heads: Mutex<usize>,
}

impl<S: Store> HeaderlessListStore<S> {
    pub fn new(inner: S) -> Arc<Self> {
        Arc::new(Self {
            inner,
            heads: Mutex::new(0),
        })
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn head_count(&self) -> usize {
        *self.heads.lock()
    }
}

impl<S: Store> Store for HeaderlessListStore<S> {
    fn list(&self, request: &ListRequest) -> Result<ListPage> {
        let mut page = self.inner.list(request)?;
        for object in &mut page.objects {
            object.headers.clear();
        }
        Ok(page)
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.inner.get_object(bucket, key)
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectSummary> {
        *self.heads.lock() += 1;
        self.inner.head_object(bucket, key)
    }

    fn put_object(&self, bucket: &str, key: &str, data: Bytes, headers: &Headers) -> Result<()> {
        self.inner.put_object(bucket, key, data, headers)
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner.delete_object(bucket, key)
    }

    fn list_buckets(&self) -> Result<Vec<String>> {
        self.inner.list_buckets()
    }

    fn create_bucket(&self, name: &str) -> Result<()> {
        self.inner.create_bucket(name)
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        self.inner.delete_bucket(name)
    }
}

/// Serves pre-built list pages in order, regardless of the request, and
/// records the requests. Everything else is unsupported.
#[derive(Default)]
pub struct ScriptedStore {
    pages: Mutex<VecDeque<ListPage>>,
    requests: Mutex<Vec<ListRequest>>,
}

impl ScriptedStore {
    pub fn new(pages: Vec<ListPage>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ListRequest> {
        self.requests.lock().clone()
    }
}

fn unsupported(op: &str) -> StoreError {
    StoreError::Unsupported(format!("scripted store: {}", op))
}

impl Store for ScriptedStore {
    fn list(&self, request: &ListRequest) -> Result<ListPage> {
        self.requests.lock().push(request.clone());
        self.pages
            .lock()
            .pop_front()
            .ok_or_else(|| unsupported("list past the last scripted page"))
    }

    fn get_object(&self, _bucket: &str, _key: &str) -> Result<Bytes> {
        Err(unsupported("get_object"))
    }

    fn head_object(&self, _bucket: &str, _key: &str) -> Result<ObjectSummary> {
        Err(unsupported("head_object"))
    }

    fn put_object(&self, _bucket: &str, _key: &str, _data: Bytes, _headers: &Headers) -> Result<()> {
        Err(unsupported("put_object"))
    }

    fn delete_object(&self, _bucket: &str, _key: &str) -> Result<()> {
        Err(unsupported("delete_object"))
    }

    fn list_buckets(&self) -> Result<Vec<String>> {
        Err(unsupported("list_buckets"))
    }

    fn create_bucket(&self, _name: &str) -> Result<()> {
        Err(unsupported("create_bucket"))
    }

    fn delete_bucket(&self, _name: &str) -> Result<()> {
        Err(unsupported("delete_bucket"))
    }
}
