//! Integration tests for mkdir

mod common;

use ::common::fs::FsError;
use object_store_backend::Store;

#[test]
fn test_mkdir() {
    let store = common::seeded_store(&[("docs/a.txt", "a")]);
    let mut fs = common::bucket_fs(&store, 1000);

    assert!(fs.can_mkdir("/docs/new").unwrap());
    fs.mkdir("/docs/new").unwrap();

    assert!(fs.is_directory("/docs/new").unwrap());
    assert_eq!(fs.contents("/docs").unwrap(), vec!["a.txt", "new"]);
    assert!(store
        .inner()
        .head_object(common::BUCKET, "docs/new/")
        .is_ok());

    // the marker is not listed inside the new directory
    assert!(fs.contents("/docs/new").unwrap().is_empty());
}

#[test]
fn test_can_mkdir_rules() {
    let store = common::seeded_store(&[("docs/a.txt", "a")]);
    let mut fs = common::bucket_fs(&store, 1000);

    assert!(!fs.can_mkdir("/docs").unwrap());
    assert!(!fs.can_mkdir("/docs/a.txt").unwrap());
    assert!(!fs.can_mkdir("/docs/a.txt/sub").unwrap());
    assert!(!fs.can_mkdir("/missing/sub").unwrap());
    assert!(matches!(fs.mkdir("/missing/sub"), Err(FsError::NotFound(_))));
}

#[test]
fn test_mkdir_creates_bucket_at_bucket_list_root() {
    let store = common::seeded_store(&[]);
    let mut fs = common::buckets_fs(&store);

    assert!(fs.can_mkdir("/fresh").unwrap());
    fs.mkdir("/fresh").unwrap();

    assert_eq!(fs.contents("/").unwrap(), vec!["fresh", common::BUCKET]);
    assert!(store
        .inner()
        .list_buckets()
        .unwrap()
        .contains(&"fresh".to_string()));
    assert!(fs.contents("/fresh").unwrap().is_empty());
}
