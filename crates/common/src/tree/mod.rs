//! The virtual filesystem tree
//!
//! Entries live in an arena owned by the [`Tree`] and are addressed by
//! [`EntryId`]. A directory owns its listing (child name -> id); children
//! keep their parent's id so a delete can drop itself from that listing.
//!
//! ```text
//! Root (bucket list)
//!   |
//!   +-- BucketDir "photos"          listing: prefix ""
//!         |
//!         +-- PrefixDir "2024/"     listing: prefix "2024/"
//!         +-- MarkerDir "old_$folder$"  listing: prefix "old/"
//!         +-- File "cat.jpg"
//! ```
//!
//! Listings are loaded lazily on first access, all pages at once, and are
//! either absent or complete. Resetting a listing releases the whole subtree
//! below it.
//!
//! Nothing here locks: callers serialize access through `&mut Tree`.

mod entry;
mod listing;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bytes::Bytes;
use object_store_backend::{Headers, Store, StoreError};

pub use entry::{Entry, EntryId, FileEntry};
pub use listing::{fetch_buckets, fetch_children, next_marker, DEFAULT_PAGE_LIMIT};

use crate::naming::DELIMITER;

/// Child name -> entry.
pub type Listing = BTreeMap<String, EntryId>;

const ROOT_ID: EntryId = EntryId(1);

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("the root directory cannot be deleted")]
    ImmutableRoot,
    #[error("cannot create files outside of a bucket")]
    FileOutsideBucket,
    #[error("not a directory: {0}")]
    NotADirectory(String),
    #[error("not a file: {0}")]
    NotAFile(String),
    #[error("entry no longer exists: {0:?}")]
    UnknownEntry(EntryId),
    #[error("listing of {bucket}/{prefix} stopped advancing at marker {marker:?}")]
    StalledListing {
        bucket: String,
        prefix: String,
        marker: String,
    },
}

/// What sits at the top of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootMode {
    /// Every bucket the store knows, one directory each.
    Buckets,
    /// A single bucket is the root.
    Bucket(String),
}

#[derive(Debug)]
struct Node {
    entry: Entry,
    parent: Option<EntryId>,
    listing: Option<Listing>,
}

pub struct Tree {
    store: Arc<dyn Store>,
    nodes: HashMap<EntryId, Node>,
    next_id: u64,
    page_limit: usize,
}

impl Tree {
    pub fn new(store: Arc<dyn Store>, mode: RootMode, page_limit: usize) -> Self {
        let entry = match mode {
            RootMode::Buckets => Entry::Root,
            RootMode::Bucket(bucket) => Entry::bucket_dir(bucket),
        };
        let mut nodes = HashMap::new();
        nodes.insert(
            ROOT_ID,
            Node {
                entry,
                parent: None,
                listing: None,
            },
        );
        Self {
            store,
            nodes,
            next_id: ROOT_ID.0 + 1,
            page_limit: page_limit.max(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn root(&self) -> EntryId {
        ROOT_ID
    }

    pub fn page_limit(&self) -> usize {
        self.page_limit
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.nodes.get(&id).map(|node| &node.entry)
    }

    pub fn parent(&self, id: EntryId) -> Option<EntryId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Number of live entries, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The directory's listing is cached.
    pub fn is_loaded(&self, id: EntryId) -> bool {
        self.nodes
            .get(&id)
            .map(|node| node.listing.is_some())
            .unwrap_or(false)
    }

    pub fn is_directory(&self, id: EntryId) -> bool {
        self.entry(id).map(Entry::is_directory).unwrap_or(false)
    }

    pub fn is_file(&self, id: EntryId) -> bool {
        self.entry(id).map(Entry::is_file).unwrap_or(false)
    }

    pub fn can_write_files(&self, id: EntryId) -> bool {
        self.entry(id).map(Entry::can_write_files).unwrap_or(false)
    }

    pub fn size(&self, id: EntryId) -> u64 {
        self.entry(id).map(Entry::size).unwrap_or(0)
    }

    /// Map a root-relative path (no leading slash) to the key it would have
    /// inside its bucket. In bucket-list mode the first segment names the
    /// bucket and is dropped; a path with a single segment is a bucket name
    /// and comes back unchanged.
    pub fn path_to_key(&self, relative: &str) -> String {
        match self.entry(ROOT_ID) {
            Some(Entry::Root) => match relative.find(DELIMITER) {
                Some(idx) => relative[idx + DELIMITER.len()..].to_string(),
                None => relative.to_string(),
            },
            _ => relative.to_string(),
        }
    }

    fn node(&self, id: EntryId) -> Result<&Node, TreeError> {
        self.nodes.get(&id).ok_or(TreeError::UnknownEntry(id))
    }

    fn node_mut(&mut self, id: EntryId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(&id).ok_or(TreeError::UnknownEntry(id))
    }

    /// Child names of a directory, loading its listing if needed. Files have
    /// no children.
    pub fn contents(&mut self, id: EntryId) -> Result<Vec<String>, TreeError> {
        if self.node(id)?.entry.is_file() {
            return Ok(Vec::new());
        }
        Ok(self.listing(id)?.keys().cloned().collect())
    }

    /// Look up a child by name.
    pub fn get(&mut self, id: EntryId, name: &str) -> Result<Option<EntryId>, TreeError> {
        if self.node(id)?.entry.is_file() {
            return Ok(None);
        }
        Ok(self.listing(id)?.get(name).copied())
    }

    /// Drop the cached listing of a directory; the next access reloads it.
    /// No-op for files.
    pub fn invalidate(&mut self, id: EntryId) -> Result<(), TreeError> {
        let stale = self.node_mut(id)?.listing.take();
        if let Some(stale) = stale {
            tracing::debug!(name = %self.name(id), "listing invalidated");
            for child in stale.into_values() {
                self.release(child);
            }
        }
        Ok(())
    }

    /// Directories drop their listing; touching a file does nothing.
    pub fn touch(&mut self, id: EntryId) -> Result<(), TreeError> {
        self.invalidate(id)
    }

    fn name(&self, id: EntryId) -> String {
        self.entry(id)
            .map(|entry| entry.name().to_string())
            .unwrap_or_default()
    }

    /// The directory's listing, loaded from the store on a miss.
    fn listing(&mut self, id: EntryId) -> Result<&Listing, TreeError> {
        if self.node(id)?.listing.is_none() {
            self.load(id)?;
        }
        self.node(id)?
            .listing
            .as_ref()
            .ok_or(TreeError::UnknownEntry(id))
    }

    fn load(&mut self, id: EntryId) -> Result<(), TreeError> {
        let entry = self.node(id)?.entry.clone();
        let children = match (&entry, entry.bucket(), entry.list_prefix()) {
            (Entry::Root, _, _) => {
                tracing::info!("loading buckets");
                fetch_buckets(self.store.as_ref())?
            }
            (_, Some(bucket), Some(prefix)) => {
                tracing::info!(name = entry.name(), bucket, "loading listing");
                fetch_children(self.store.as_ref(), bucket, &prefix, self.page_limit)?
            }
            _ => return Err(TreeError::NotADirectory(entry.name().to_string())),
        };

        // build the whole listing before swapping it in
        let mut listing = Listing::new();
        for child in children {
            let name = child.name().to_string();
            let child_id = self.alloc(child, id);
            if let Some(replaced) = listing.insert(name, child_id) {
                self.release(replaced);
            }
        }

        let stale = self.node_mut(id)?.listing.replace(listing);
        if let Some(stale) = stale {
            for child in stale.into_values() {
                self.release(child);
            }
        }
        Ok(())
    }

    fn alloc(&mut self, entry: Entry, parent: EntryId) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                entry,
                parent: Some(parent),
                listing: None,
            },
        );
        id
    }

    /// Forget an entry and everything below it.
    fn release(&mut self, id: EntryId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                if let Some(listing) = node.listing {
                    pending.extend(listing.into_values());
                }
            }
        }
    }

    /// Insert a freshly created child into a directory's listing.
    fn adopt(&mut self, dir: EntryId, entry: Entry) -> Result<EntryId, TreeError> {
        // make sure the listing is complete before adding to it
        self.listing(dir)?;
        let name = entry.name().to_string();
        let child = self.alloc(entry, dir);
        let replaced = self
            .node_mut(dir)?
            .listing
            .as_mut()
            .and_then(|listing| listing.insert(name, child));
        if let Some(replaced) = replaced {
            self.release(replaced);
        }
        Ok(child)
    }

    /// Drop a child from its parent's listing after it was deleted.
    fn orphan(&mut self, id: EntryId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        let name = node.entry.name().to_string();
        let parent = node.parent;
        if let Some(parent) = parent {
            if let Some(listing) = self.node_mut(parent)?.listing.as_mut() {
                listing.remove(&name);
            }
        }
        self.release(id);
        Ok(())
    }

    /// Store `content` at `key` and add the new file to `dir`.
    pub fn create_file(
        &mut self,
        dir: EntryId,
        key: &str,
        content: Bytes,
    ) -> Result<EntryId, TreeError> {
        let entry = self.node(dir)?.entry.clone();
        let bucket = match &entry {
            Entry::Root => return Err(TreeError::FileOutsideBucket),
            Entry::File(file) => return Err(TreeError::NotADirectory(file.key.clone())),
            _ => entry.bucket().unwrap_or_default().to_string(),
        };

        self.store
            .put_object(&bucket, key, content, &Headers::new())?;
        let summary = self.store.head_object(&bucket, key)?;
        tracing::debug!(bucket = %bucket, key, size = summary.size, "file created");
        self.adopt(dir, Entry::File(FileEntry::from_summary(&bucket, summary)))
    }

    /// Create a directory under `dir`. At the bucket-list root this creates
    /// a bucket named `key`; elsewhere it stores a `key/` marker object.
    pub fn create_dir(&mut self, dir: EntryId, key: &str) -> Result<EntryId, TreeError> {
        let entry = self.node(dir)?.entry.clone();
        let child = match &entry {
            Entry::Root => {
                self.store.create_bucket(key)?;
                tracing::info!(bucket = key, "bucket created");
                Entry::bucket_dir(key)
            }
            Entry::File(file) => return Err(TreeError::NotADirectory(file.key.clone())),
            _ => {
                let bucket = entry.bucket().unwrap_or_default();
                let marker = format!("{}{}", key, DELIMITER);
                self.store
                    .put_object(bucket, &marker, Bytes::new(), &Headers::new())?;
                tracing::debug!(bucket, key = %marker, "directory created");
                Entry::prefix_dir(bucket, marker)
            }
        };
        self.adopt(dir, child)
    }

    /// Fetch a file's body. Always goes to the store.
    pub fn read(&self, id: EntryId) -> Result<Bytes, TreeError> {
        match &self.node(id)?.entry {
            Entry::File(file) => Ok(self.store.get_object(&file.bucket, &file.key)?),
            other => Err(TreeError::NotAFile(other.name().to_string())),
        }
    }

    /// Replace a file's content in place, keeping its key and headers.
    /// Listings may arrive without headers; those are fetched with a HEAD
    /// before the first rewrite.
    pub fn write(&mut self, id: EntryId, data: Bytes) -> Result<(), TreeError> {
        let store = self.store.clone();
        let file = match &mut self.node_mut(id)?.entry {
            Entry::File(file) => file,
            other => return Err(TreeError::NotAFile(other.name().to_string())),
        };
        if file.headers.is_empty() {
            file.headers = store.head_object(&file.bucket, &file.key)?.headers;
        }
        let size = data.len() as u64;
        store.put_object(&file.bucket, &file.key, data, &file.headers)?;
        file.size = size;
        Ok(())
    }

    /// Delete the backing object (or bucket) and drop the entry from its
    /// parent's listing. Siblings stay cached.
    pub fn delete(&mut self, id: EntryId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        match (&node.entry, node.parent) {
            (Entry::Root, _) | (Entry::BucketDir { .. }, None) => {
                return Err(TreeError::ImmutableRoot)
            }
            (Entry::BucketDir { bucket }, Some(_)) => {
                self.store.delete_bucket(bucket)?;
                tracing::info!(bucket = %bucket, "bucket deleted");
            }
            (Entry::File(FileEntry { bucket, key, .. }), _)
            | (Entry::PrefixDir { bucket, key }, _)
            | (Entry::MarkerDir { bucket, key }, _) => {
                self.store.delete_object(bucket, key)?;
                tracing::debug!(bucket = %bucket, key = %key, "object deleted");
            }
        }
        self.orphan(id)
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("entries", &self.nodes.len())
            .field("page_limit", &self.page_limit)
            .finish()
    }
}
