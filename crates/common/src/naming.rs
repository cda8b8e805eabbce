//! Key naming rules: how object keys map onto path segments, and which
//! listed objects are really directory markers.
//!
//! Three conventions for "this is a folder" show up in real buckets:
//!
//! - keys ending in `/` (console-created folders), reported by a delimited
//!   listing as common prefixes; the marker object itself is returned as a
//!   self-reference when listing its own prefix
//! - keys ending in `_$folder$` (S3 Organizer and friends)
//! - small sentinel objects with fixed content and no trailing slash (s3sync)

use object_store_backend::ObjectSummary;

pub use object_store_backend::ORGANIZER_DIR_SUFFIX;

/// Path and key separator.
pub const DELIMITER: &str = "/";

/// Body of an s3sync directory marker.
pub const SYNC_DIR_CONTENTS: &str = "{E40327BF-517A-46e8-A6C3-AF51BC263F59}";
/// ETag of an s3sync directory marker.
pub const SYNC_DIR_FINGERPRINT: &str = "d66759af42f282e1ba19144df2d405d0";
/// Length of an s3sync directory marker.
pub const SYNC_DIR_LENGTH: u64 = 38;

/// The final `/`-delimited component of `key`, ignoring one trailing slash.
///
/// ```
/// use common::naming::last_path_segment;
///
/// assert_eq!(last_path_segment("a/b/c"), "c");
/// assert_eq!(last_path_segment("a/b/"), "b");
/// assert_eq!(last_path_segment("nofile"), "nofile");
/// ```
pub fn last_path_segment(key: &str) -> &str {
    let trimmed = key.strip_suffix(DELIMITER).unwrap_or(key);
    match trimmed.rfind(DELIMITER) {
        Some(idx) => &trimmed[idx + DELIMITER.len()..],
        None => trimmed,
    }
}

/// `name` without the organizer suffix, if it carries one.
pub fn strip_dir_suffix(name: &str) -> &str {
    name.strip_suffix(ORGANIZER_DIR_SUFFIX).unwrap_or(name)
}

/// What a listed object turns into in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A legacy marker; becomes a directory named after the stripped key.
    MarkerDir,
    /// The listed directory's own `prefix/` object; not an entry at all.
    SelfReference,
    File,
}

/// Classify a listed object. The organizer-suffix and sync-sentinel checks
/// are an unordered OR.
pub fn classify(object: &ObjectSummary) -> ObjectKind {
    if is_organizer_marker(&object.key) || is_sync_marker(object) {
        ObjectKind::MarkerDir
    } else if object.key.ends_with(DELIMITER) {
        ObjectKind::SelfReference
    } else {
        ObjectKind::File
    }
}

pub fn is_organizer_marker(key: &str) -> bool {
    key.ends_with(ORGANIZER_DIR_SUFFIX)
}

pub fn is_sync_marker(object: &ObjectSummary) -> bool {
    object.fingerprint.trim_matches('"') == SYNC_DIR_FINGERPRINT && object.size == SYNC_DIR_LENGTH
}

/// Directory name shown for a marker object.
pub fn marker_dir_name(key: &str) -> &str {
    strip_dir_suffix(last_path_segment(key))
}

/// Prefix to list the children of a marker directory.
pub fn marker_dir_prefix(key: &str) -> String {
    format!("{}{}", strip_dir_suffix(key), DELIMITER)
}
