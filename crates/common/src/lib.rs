/**
 * Rules for reading object keys as paths:
 *  delimiters, last segments, and the legacy
 *  directory-marker conventions.
 */
pub mod naming;
/**
 * The virtual filesystem tree.
 * An arena of entries (buckets, directories, files)
 *  with lazily loaded, fully paginated listings.
 */
pub mod tree;
/**
 * Path-addressed operations over the tree,
 *  the surface a mount layer talks to.
 */
pub mod fs;

pub mod prelude {
    pub use crate::fs::{FsError, S3Fs};
    pub use crate::tree::{Entry, EntryId, RootMode, Tree, TreeError, DEFAULT_PAGE_LIMIT};
    pub use object_store_backend::{Store, StoreConfig, StoreError};
}
