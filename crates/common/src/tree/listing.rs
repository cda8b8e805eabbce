//! Fetching a directory's children from the store.
//!
//! A delimited listing returns two streams, common prefixes and objects, each
//! sorted on its own. Pages are merged into one list of entries and the next
//! page resumes after whichever of the two streams reached further.

use object_store_backend::{ListPage, ListRequest, Store};

use super::entry::{Entry, FileEntry};
use super::TreeError;
use crate::naming::{classify, ObjectKind, DELIMITER};

/// Default page size for list calls (the S3 maximum).
pub const DEFAULT_PAGE_LIMIT: usize = 1000;

/// Fetch every child of `prefix` in `bucket`, one page at a time, in merge
/// order. Later entries win over earlier ones with the same name.
pub fn fetch_children(
    store: &dyn Store,
    bucket: &str,
    prefix: &str,
    page_limit: usize,
) -> Result<Vec<Entry>, TreeError> {
    let mut entries = Vec::new();
    let mut request = ListRequest::new(bucket, prefix, DELIMITER, page_limit.max(1));
    let mut pages = 0;

    loop {
        let page = store.list(&request)?;
        pages += 1;
        merge_page(bucket, &page, &mut entries);

        if !page.truncated {
            break;
        }
        let marker = next_marker(&page);
        if marker <= request.marker {
            return Err(TreeError::StalledListing {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                marker,
            });
        }
        request.marker = marker;
    }

    tracing::debug!(bucket, prefix, pages, entries = entries.len(), "listing loaded");
    Ok(entries)
}

/// Fetch every bucket as a directory entry. Bucket listings are not paged.
pub fn fetch_buckets(store: &dyn Store) -> Result<Vec<Entry>, TreeError> {
    let buckets = store.list_buckets()?;
    tracing::debug!(buckets = buckets.len(), "bucket list loaded");
    Ok(buckets.into_iter().map(Entry::bucket_dir).collect())
}

fn merge_page(bucket: &str, page: &ListPage, entries: &mut Vec<Entry>) {
    entries.extend(
        page.prefixes
            .iter()
            .filter(|prefix| prefix.as_str() != DELIMITER)
            .map(|prefix| Entry::prefix_dir(bucket, prefix.clone())),
    );

    for object in &page.objects {
        match classify(object) {
            ObjectKind::MarkerDir => entries.push(Entry::marker_dir(bucket, object.key.clone())),
            ObjectKind::SelfReference => {}
            ObjectKind::File => entries.push(Entry::File(FileEntry::from_summary(
                bucket,
                object.clone(),
            ))),
        }
    }
}

/// Marker for the page after `page`: the later of its last object key and
/// its last common prefix. The two streams are ordered independently, so
/// resuming after only one of them could skip or repeat entries.
pub fn next_marker(page: &ListPage) -> String {
    let last_object = page
        .objects
        .iter()
        .map(|object| object.key.as_str())
        .max()
        .unwrap_or("");
    let last_prefix = page
        .prefixes
        .iter()
        .map(String::as_str)
        .max()
        .unwrap_or("");

    if last_object < last_prefix {
        last_prefix.to_string()
    } else {
        last_object.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use object_store_backend::testkit::ScriptedStore;
    use object_store_backend::{Headers, ObjectSummary};

    fn object(key: &str) -> ObjectSummary {
        ObjectSummary {
            key: key.to_string(),
            fingerprint: "\"0\"".to_string(),
            size: 1,
            headers: Headers::new(),
        }
    }

    fn page(prefixes: &[&str], objects: &[&str], truncated: bool) -> ListPage {
        ListPage {
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            objects: objects.iter().map(|k| object(k)).collect(),
            truncated,
        }
    }

    #[test]
    fn test_next_marker_prefers_later_stream() {
        assert_eq!(next_marker(&page(&["a/"], &["b.txt"], true)), "b.txt");
        assert_eq!(next_marker(&page(&["c/"], &["b.txt"], true)), "c/");
        assert_eq!(next_marker(&page(&[], &["b.txt"], true)), "b.txt");
        assert_eq!(next_marker(&page(&["c/"], &[], true)), "c/");
        assert_eq!(next_marker(&page(&[], &[], true)), "");
    }

    #[test]
    fn test_truncated_page_that_does_not_advance_fails() {
        let store = ScriptedStore::new(vec![
            page(&[], &["a.txt"], true),
            page(&[], &[], true),
        ]);
        let result = fetch_children(store.as_ref(), "b", "", 1);
        assert!(matches!(
            result,
            Err(TreeError::StalledListing { ref marker, .. }) if marker.is_empty()
        ));
        assert_eq!(store.requests().len(), 2);

        let store = ScriptedStore::new(vec![
            page(&[], &["b.txt"], true),
            page(&["a/"], &[], true),
        ]);
        assert!(matches!(
            fetch_children(store.as_ref(), "b", "", 1),
            Err(TreeError::StalledListing { .. })
        ));
    }

    #[test]
    fn test_merge_page_drops_degenerate_prefix_and_self_reference() {
        let mut entries = Vec::new();
        merge_page(
            "b",
            &page(&["/", "docs/photos/"], &["docs/", "docs/a.txt"], false),
            &mut entries,
        );
        let names: Vec<_> = entries.iter().map(Entry::name).collect();
        assert_eq!(names, vec!["photos", "a.txt"]);
        assert!(entries[0].is_directory());
        assert!(entries[1].is_file());
    }
}
