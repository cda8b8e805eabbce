//! Integration tests for paged directory listings

mod common;

use ::common::fs::S3Fs;
use ::common::tree::RootMode;
use object_store_backend::testkit::ScriptedStore;

#[test]
fn test_marker_follows_last_object_when_it_sorts_later() {
    let store = ScriptedStore::new(vec![
        common::page(&["a/"], &["b.txt"], true),
        common::page(&["c/"], &[], false),
    ]);
    let mut fs = S3Fs::new(store.clone(), RootMode::Bucket("b".to_string()), 2);

    let names = fs.contents("/").unwrap();
    assert_eq!(common::sorted(names), vec!["a", "b.txt", "c"]);

    let requests = store.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].marker, "");
    assert_eq!(requests[1].marker, "b.txt");
    assert_eq!(requests[1].max_keys, 2);
    assert_eq!(requests[1].delimiter, "/");
}

#[test]
fn test_marker_follows_last_prefix_when_it_sorts_later() {
    let store = ScriptedStore::new(vec![
        common::page(&["z/"], &["a.txt"], true),
        common::page(&[], &["zz.txt"], false),
    ]);
    let mut fs = S3Fs::new(store.clone(), RootMode::Bucket("b".to_string()), 2);

    let names = fs.contents("/").unwrap();
    assert_eq!(common::sorted(names), vec!["a.txt", "z", "zz.txt"]);
    assert_eq!(store.requests()[1].marker, "z/");
}

#[test]
fn test_small_pages_list_everything_once() {
    let store = common::seeded_store(&[
        ("a.txt", "a"),
        ("b/1", "1"),
        ("b/2", "2"),
        ("c.txt", "c"),
        ("d/x", "x"),
        ("e.txt", "e"),
    ]);
    let mut fs = common::bucket_fs(&store, 2);

    let names = fs.contents("/").unwrap();
    assert_eq!(names, vec!["a.txt", "b", "c.txt", "d", "e.txt"]);

    let markers: Vec<_> = store
        .list_requests()
        .into_iter()
        .map(|request| request.marker)
        .collect();
    assert_eq!(markers, vec!["", "b/", "d/"]);

    // cached from here on
    fs.contents("/").unwrap();
    assert!(fs.is_file("/e.txt").unwrap());
    assert_eq!(store.list_count(), 3);
}

#[test]
fn test_nested_listing_uses_directory_prefix() {
    let store = common::seeded_store(&[("docs/a.txt", "a"), ("docs/sub/b.txt", "b")]);
    let mut fs = common::bucket_fs(&store, 1000);

    assert_eq!(fs.contents("/docs").unwrap(), vec!["a.txt", "sub"]);
    assert_eq!(fs.contents("/docs/sub").unwrap(), vec!["b.txt"]);

    let prefixes: Vec<_> = store
        .list_requests()
        .into_iter()
        .map(|request| request.prefix)
        .collect();
    assert_eq!(prefixes, vec!["", "docs/", "docs/sub/"]);
}
