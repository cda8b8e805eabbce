//! Shared test utilities for filesystem integration tests
#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use common::fs::S3Fs;
use common::tree::RootMode;
use object_store_backend::testkit::RecordingStore;
use object_store_backend::{Headers, ListPage, MemoryStore, ObjectSummary, Store};

pub const BUCKET: &str = "test-bucket";

/// Send tree logs to the test writer; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A recording in-memory store holding `BUCKET` with the given objects.
pub fn seeded_store(objects: &[(&str, &str)]) -> Arc<RecordingStore<MemoryStore>> {
    init_tracing();
    let store = MemoryStore::with_buckets([BUCKET]);
    for (key, body) in objects {
        store
            .put_object(BUCKET, key, Bytes::from(body.to_string()), &Headers::new())
            .unwrap();
    }
    RecordingStore::new(store)
}

/// Filesystem rooted at `BUCKET`.
pub fn bucket_fs(store: &Arc<RecordingStore<MemoryStore>>, page_limit: usize) -> S3Fs {
    S3Fs::new(
        store.clone(),
        RootMode::Bucket(BUCKET.to_string()),
        page_limit,
    )
}

/// Filesystem whose root lists every bucket.
pub fn buckets_fs(store: &Arc<RecordingStore<MemoryStore>>) -> S3Fs {
    S3Fs::new(store.clone(), RootMode::Buckets, 1000)
}

pub fn summary(key: &str) -> ObjectSummary {
    ObjectSummary {
        key: key.to_string(),
        fingerprint: "\"5d41402abc4b2a76b9719d911017c592\"".to_string(),
        size: 5,
        headers: Headers::new(),
    }
}

pub fn page(prefixes: &[&str], objects: &[&str], truncated: bool) -> ListPage {
    ListPage {
        prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
        objects: objects.iter().map(|k| summary(k)).collect(),
        truncated,
    }
}

pub fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}
