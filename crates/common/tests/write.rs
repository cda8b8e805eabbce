//! Integration tests for writing files

mod common;

use ::common::fs::{FsError, S3Fs};
use ::common::tree::RootMode;
use bytes::Bytes;
use object_store_backend::testkit::HeaderlessListStore;
use object_store_backend::{Headers, MemoryStore, Store};

fn text_plain() -> Headers {
    let mut headers = Headers::new();
    headers.insert("content-type".to_string(), "text/plain".to_string());
    headers
}

#[test]
fn test_write_new_file_adds_one_child() {
    let store = common::seeded_store(&[("docs/a.txt", "a")]);
    let mut fs = common::bucket_fs(&store, 1000);

    assert_eq!(fs.contents("/docs").unwrap(), vec!["a.txt"]);
    let before = fs.tree().len();

    assert!(fs.can_write("/docs/b.txt").unwrap());
    fs.write("/docs/b.txt", Bytes::from("bee")).unwrap();

    assert_eq!(fs.tree().len(), before + 1);
    assert_eq!(fs.contents("/docs").unwrap(), vec!["a.txt", "b.txt"]);
    assert_eq!(fs.size("/docs/b.txt").unwrap(), 3);
    assert_eq!(
        store.inner().get_object(common::BUCKET, "docs/b.txt").unwrap(),
        "bee"
    );
}

#[test]
fn test_rewrite_keeps_key_and_entry() {
    let store = common::seeded_store(&[("docs/a.txt", "a")]);
    let mut fs = common::bucket_fs(&store, 1000);

    let id = fs.resolve("/docs/a.txt").unwrap().unwrap();
    let before = fs.tree().len();
    let lists = store.list_count();

    assert!(fs.can_write("/docs/a.txt").unwrap());
    fs.write("/docs/a.txt", Bytes::from("longer body")).unwrap();

    assert_eq!(fs.resolve("/docs/a.txt").unwrap(), Some(id));
    assert_eq!(fs.tree().len(), before);
    assert_eq!(fs.size("/docs/a.txt").unwrap(), 11);
    assert_eq!(store.list_count(), lists);
    assert_eq!(store.inner().object_count(common::BUCKET), Some(1));
    assert_eq!(fs.read("/docs/a.txt").unwrap(), "longer body");
}

#[test]
fn test_rewrite_keeps_discovered_headers() {
    let store = common::seeded_store(&[]);
    store
        .inner()
        .put_object(common::BUCKET, "a.txt", Bytes::from("a"), &text_plain())
        .unwrap();
    let mut fs = common::bucket_fs(&store, 1000);

    assert!(fs.is_file("/a.txt").unwrap());
    fs.write("/a.txt", Bytes::from("rewritten")).unwrap();

    let head = store.inner().head_object(common::BUCKET, "a.txt").unwrap();
    assert_eq!(head.headers, text_plain());
    assert_eq!(head.size, 9);
}

#[test]
fn test_rewrite_fetches_headers_missing_from_listing() {
    common::init_tracing();
    let inner = MemoryStore::with_buckets([common::BUCKET]);
    inner
        .put_object(common::BUCKET, "a.txt", Bytes::from("a"), &text_plain())
        .unwrap();
    let store = HeaderlessListStore::new(inner);
    let mut fs = S3Fs::new(
        store.clone(),
        RootMode::Bucket(common::BUCKET.to_string()),
        1000,
    );

    fs.write("/a.txt", Bytes::from("one")).unwrap();
    assert_eq!(store.head_count(), 1);
    assert_eq!(
        store
            .inner()
            .head_object(common::BUCKET, "a.txt")
            .unwrap()
            .headers,
        text_plain()
    );

    // headers are kept on the entry after the first lookup
    fs.write("/a.txt", Bytes::from("two")).unwrap();
    assert_eq!(store.head_count(), 1);
    assert_eq!(fs.read("/a.txt").unwrap(), "two");
}

#[test]
fn test_can_write_rules() {
    let store = common::seeded_store(&[("docs/a.txt", "a")]);
    let mut fs = common::bucket_fs(&store, 1000);

    // directories are not writable targets
    assert!(!fs.can_write("/docs").unwrap());
    // no parent to create in
    assert!(!fs.can_write("/missing/new.txt").unwrap());
    // a file is not a parent
    assert!(!fs.can_write("/docs/a.txt/new.txt").unwrap());
    assert!(fs.can_write("/top.txt").unwrap());
}

#[test]
fn test_write_without_parent_is_not_found() {
    let store = common::seeded_store(&[]);
    let mut fs = common::bucket_fs(&store, 1000);

    let result = fs.write("/missing/new.txt", Bytes::from("x"));
    assert!(matches!(result, Err(FsError::NotFound(_))));
    assert_eq!(store.inner().object_count(common::BUCKET), Some(0));
}

#[test]
fn test_write_into_bucket_list_mode() {
    let store = common::seeded_store(&[]);
    let mut fs = common::buckets_fs(&store);
    let path = format!("/{}/notes/today.txt", common::BUCKET);

    fs.mkdir(&format!("/{}/notes", common::BUCKET)).unwrap();
    assert!(fs.can_write(&path).unwrap());
    fs.write(&path, Bytes::from("todo")).unwrap();

    // keys drop the bucket segment
    assert_eq!(
        store
            .inner()
            .get_object(common::BUCKET, "notes/today.txt")
            .unwrap(),
        "todo"
    );

    // no files directly under the bucket list
    assert!(!fs.can_write("/loose.txt").unwrap());
}
