//! Path-addressed filesystem operations over a [`Tree`].
//!
//! This is the surface a mount adapter (or the CLI) talks to. Paths are
//! absolute and `/`-delimited; `/` is the top of the tree. Lookups that run
//! into a missing segment produce "absent", which the predicates turn into
//! `false`/empty answers.
//!
//! Mutating operations do not re-check their preconditions: call the
//! matching `can_*` predicate first.

use std::sync::Arc;

use bytes::Bytes;
use object_store_backend::Store;
use tracing::instrument;

use crate::naming::DELIMITER;
use crate::tree::{EntryId, RootMode, Tree, TreeError};

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("path not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub struct S3Fs {
    tree: Tree,
}

/// Non-empty segments of an absolute path.
fn segments(path: &str) -> Vec<&str> {
    path.split(DELIMITER).filter(|part| !part.is_empty()).collect()
}

impl S3Fs {
    pub fn new(store: Arc<dyn Store>, mode: RootMode, page_limit: usize) -> Self {
        Self::from_tree(Tree::new(store, mode, page_limit))
    }

    pub fn from_tree(tree: Tree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Walk from the root to the entry at `path`.
    pub fn resolve(&mut self, path: &str) -> Result<Option<EntryId>, FsError> {
        self.walk(&segments(path))
    }

    /// Walk to the directory that would contain `path`.
    pub fn resolve_parent(&mut self, path: &str) -> Result<Option<EntryId>, FsError> {
        let parts = segments(path);
        let parent = &parts[..parts.len().saturating_sub(1)];
        self.walk(parent)
    }

    fn walk(&mut self, parts: &[&str]) -> Result<Option<EntryId>, FsError> {
        let mut current = self.tree.root();
        for part in parts {
            match self.tree.get(current, part)? {
                Some(child) => current = child,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    fn require(&mut self, path: &str) -> Result<EntryId, FsError> {
        self.resolve(path)?
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    fn require_parent(&mut self, path: &str) -> Result<EntryId, FsError> {
        self.resolve_parent(path)?
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    /// Key for a new child at `path`, relative to its bucket.
    fn key_for(&self, path: &str) -> String {
        self.tree.path_to_key(&segments(path).join(DELIMITER))
    }

    /// Child names of the directory at `path`; empty for files and absent
    /// paths.
    #[instrument(skip(self), level = "debug")]
    pub fn contents(&mut self, path: &str) -> Result<Vec<String>, FsError> {
        match self.resolve(path)? {
            Some(id) => Ok(self.tree.contents(id)?),
            None => Ok(Vec::new()),
        }
    }

    #[instrument(skip(self), level = "debug")]
    pub fn is_directory(&mut self, path: &str) -> Result<bool, FsError> {
        Ok(self
            .resolve(path)?
            .map(|id| self.tree.is_directory(id))
            .unwrap_or(false))
    }

    #[instrument(skip(self), level = "debug")]
    pub fn is_file(&mut self, path: &str) -> Result<bool, FsError> {
        Ok(self
            .resolve(path)?
            .map(|id| self.tree.is_file(id))
            .unwrap_or(false))
    }

    /// Nothing in a bucket is executable.
    pub fn is_executable(&self, _path: &str) -> bool {
        false
    }

    #[instrument(skip(self), level = "debug")]
    pub fn size(&mut self, path: &str) -> Result<u64, FsError> {
        Ok(self
            .resolve(path)?
            .map(|id| self.tree.size(id))
            .unwrap_or(0))
    }

    /// Fetch a file's content from the store.
    #[instrument(skip(self), level = "debug")]
    pub fn read(&mut self, path: &str) -> Result<Bytes, FsError> {
        let id = self.require(path)?;
        Ok(self.tree.read(id)?)
    }

    /// An existing file can be rewritten; a new one can be created where the
    /// parent directory allows files.
    #[instrument(skip(self), level = "debug")]
    pub fn can_write(&mut self, path: &str) -> Result<bool, FsError> {
        if let Some(id) = self.resolve(path)? {
            return Ok(self.tree.is_file(id));
        }
        Ok(self
            .resolve_parent(path)?
            .map(|parent| self.tree.can_write_files(parent))
            .unwrap_or(false))
    }

    /// Rewrite the file at `path`, or create it under its parent.
    #[instrument(skip(self, data), fields(len = data.len()), level = "debug")]
    pub fn write(&mut self, path: &str, data: Bytes) -> Result<(), FsError> {
        if let Some(id) = self.resolve(path)? {
            self.tree.write(id, data)?;
            return Ok(());
        }
        let parent = self.require_parent(path)?;
        let key = self.key_for(path);
        self.tree.create_file(parent, &key, data)?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    pub fn can_delete(&mut self, path: &str) -> Result<bool, FsError> {
        Ok(self
            .resolve(path)?
            .map(|id| self.tree.is_file(id))
            .unwrap_or(false))
    }

    #[instrument(skip(self), level = "debug")]
    pub fn delete(&mut self, path: &str) -> Result<(), FsError> {
        let id = self.require(path)?;
        Ok(self.tree.delete(id)?)
    }

    /// A directory can be made where nothing exists yet and the parent is a
    /// directory.
    #[instrument(skip(self), level = "debug")]
    pub fn can_mkdir(&mut self, path: &str) -> Result<bool, FsError> {
        if self.resolve(path)?.is_some() {
            return Ok(false);
        }
        Ok(self
            .resolve_parent(path)?
            .map(|parent| self.tree.is_directory(parent))
            .unwrap_or(false))
    }

    #[instrument(skip(self), level = "debug")]
    pub fn mkdir(&mut self, path: &str) -> Result<(), FsError> {
        let parent = self.require_parent(path)?;
        let key = self.key_for(path);
        self.tree.create_dir(parent, &key)?;
        Ok(())
    }

    /// Only existing, empty directories other than the root can be removed.
    #[instrument(skip(self), level = "debug")]
    pub fn can_rmdir(&mut self, path: &str) -> Result<bool, FsError> {
        if segments(path).is_empty() {
            return Ok(false);
        }
        let id = match self.resolve(path)? {
            Some(id) if self.tree.is_directory(id) => id,
            _ => return Ok(false),
        };
        Ok(self.tree.contents(id)?.is_empty())
    }

    #[instrument(skip(self), level = "debug")]
    pub fn rmdir(&mut self, path: &str) -> Result<(), FsError> {
        let id = self.require(path)?;
        Ok(self.tree.delete(id)?)
    }

    /// Refresh an existing directory's listing, or create an empty file.
    #[instrument(skip(self), level = "debug")]
    pub fn touch(&mut self, path: &str) -> Result<(), FsError> {
        match self.resolve(path)? {
            Some(id) => Ok(self.tree.touch(id)?),
            None => self.write(path, Bytes::new()),
        }
    }

    /// Drop the cached listing of the directory at `path`.
    #[instrument(skip(self), level = "debug")]
    pub fn flush(&mut self, path: &str) -> Result<(), FsError> {
        let id = self.require(path)?;
        Ok(self.tree.invalidate(id)?)
    }
}

impl std::fmt::Debug for S3Fs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Fs").field("tree", &self.tree).finish()
    }
}
