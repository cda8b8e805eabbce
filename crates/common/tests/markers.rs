//! Integration tests for legacy directory markers

mod common;

use ::common::naming::{ORGANIZER_DIR_SUFFIX, SYNC_DIR_CONTENTS};

#[test]
fn test_organizer_marker_becomes_directory() {
    let store = common::seeded_store(&[
        ("photos_$folder$", ""),
        ("photos/cat.jpg", "meow"),
    ]);
    let mut fs = common::bucket_fs(&store, 1000);

    // the marker and the common prefix collapse into one entry
    let names = fs.contents("/").unwrap();
    assert_eq!(names, vec!["photos"]);
    assert!(names.iter().all(|name| !name.contains(ORGANIZER_DIR_SUFFIX)));

    assert!(fs.is_directory("/photos").unwrap());
    assert_eq!(fs.contents("/photos").unwrap(), vec!["cat.jpg"]);
}

#[test]
fn test_empty_organizer_marker_lists_its_prefix() {
    let store = common::seeded_store(&[("archive/2019_$folder$", "")]);
    let mut fs = common::bucket_fs(&store, 1000);

    assert_eq!(fs.contents("/archive").unwrap(), vec!["2019"]);
    assert!(fs.is_directory("/archive/2019").unwrap());
    assert!(fs.contents("/archive/2019").unwrap().is_empty());

    let last = store.list_requests().pop().unwrap();
    assert_eq!(last.prefix, "archive/2019/");
}

#[test]
fn test_sync_marker_becomes_directory() {
    let store = common::seeded_store(&[
        ("backup", SYNC_DIR_CONTENTS),
        ("backup/notes.txt", "hi"),
        ("plain.txt", "not a marker"),
    ]);
    let mut fs = common::bucket_fs(&store, 1000);

    assert_eq!(fs.contents("/").unwrap(), vec!["backup", "plain.txt"]);
    assert!(fs.is_directory("/backup").unwrap());
    assert!(fs.is_file("/plain.txt").unwrap());
    assert_eq!(fs.contents("/backup").unwrap(), vec!["notes.txt"]);
}

#[test]
fn test_self_reference_is_hidden() {
    let store = common::seeded_store(&[("music/", ""), ("music/song.mp3", "la")]);
    let mut fs = common::bucket_fs(&store, 1000);

    assert_eq!(fs.contents("/").unwrap(), vec!["music"]);
    assert_eq!(fs.contents("/music").unwrap(), vec!["song.mp3"]);
}
