//! [`Store`] implementation on top of the `object_store` crate (local
//! filesystem or S3-compatible storage).
//!
//! `object_store` is async and has no notion of buckets, so this backend owns
//! a small runtime, blocks on every call, and keeps one `ObjectStore` handle
//! per bucket. Its paths also cannot end with a slash: directory markers
//! (`dir/`) are written as organizer markers (`dir_$folder$`) instead, which
//! the tree recognizes as directories all the same.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, GetOptions, ObjectMeta, ObjectStore, PutOptions, PutPayload};
use parking_lot::RwLock;
use tokio::runtime::Runtime;

use crate::error::{Result, StoreError};
use crate::store::{
    paginate, roll_up, Headers, ListItem, ListPage, ListRequest, ObjectSummary, Store,
};
use crate::ORGANIZER_DIR_SUFFIX;

const CONTENT_TYPE: &str = "content-type";

/// Connection settings for S3-compatible storage.
#[derive(Debug, Clone, Default)]
pub struct S3Settings {
    /// Endpoint URL (e.g. "http://localhost:9000" for MinIO); AWS when unset
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug)]
enum Layout {
    /// Each bucket is a sub-directory of `root`.
    Local { root: PathBuf },
    /// A fixed set of buckets on one S3 endpoint.
    S3 {
        settings: S3Settings,
        buckets: Vec<String>,
    },
}

impl Layout {
    /// S3 returns keys in ascending order; a local directory walk does not.
    fn lists_in_order(&self) -> bool {
        matches!(self, Layout::S3 { .. })
    }
}

pub struct ObjectStoreBackend {
    rt: Runtime,
    layout: Layout,
    handles: RwLock<BTreeMap<String, Arc<dyn ObjectStore>>>,
}

impl std::fmt::Debug for ObjectStoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreBackend")
            .field("layout", &self.layout)
            .finish()
    }
}

impl ObjectStoreBackend {
    /// Buckets are the sub-directories of `root`, which is created if missing.
    pub fn local(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)?;
        let root = root.canonicalize()?;
        Self::with_layout(Layout::Local { root })
    }

    /// Serve `buckets` from an S3-compatible endpoint. Credentials not given
    /// in `settings` are taken from the usual `AWS_*` environment variables.
    pub fn s3(settings: S3Settings, buckets: Vec<String>) -> Result<Self> {
        if buckets.is_empty() {
            return Err(StoreError::InvalidConfig(
                "at least one S3 bucket must be configured".to_string(),
            ));
        }
        Self::with_layout(Layout::S3 { settings, buckets })
    }

    fn with_layout(layout: Layout) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            rt,
            layout,
            handles: RwLock::new(BTreeMap::new()),
        })
    }

    /// Get (or build) the `ObjectStore` handle serving `bucket`.
    fn bucket(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        if let Some(handle) = self.handles.read().get(bucket) {
            return Ok(handle.clone());
        }

        let handle: Arc<dyn ObjectStore> = match &self.layout {
            Layout::Local { root } => {
                let dir = bucket_dir(root, bucket)?;
                if !dir.is_dir() {
                    return Err(StoreError::BucketNotFound(bucket.to_string()));
                }
                Arc::new(
                    LocalFileSystem::new_with_prefix(&dir)
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                )
            }
            Layout::S3 { settings, buckets } => {
                if !buckets.iter().any(|name| name == bucket) {
                    return Err(StoreError::BucketNotFound(bucket.to_string()));
                }
                let mut builder = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_region(settings.region.as_deref().unwrap_or("us-east-1"));
                if let Some(endpoint) = &settings.endpoint {
                    builder = builder
                        .with_endpoint(endpoint)
                        .with_allow_http(endpoint.starts_with("http://"));
                }
                if let Some(access_key) = &settings.access_key {
                    builder = builder.with_access_key_id(access_key);
                }
                if let Some(secret_key) = &settings.secret_key {
                    builder = builder.with_secret_access_key(secret_key);
                }
                Arc::new(
                    builder
                        .build()
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                )
            }
        };

        self.handles
            .write()
            .insert(bucket.to_string(), handle.clone());
        Ok(handle)
    }
}

fn bucket_dir(root: &std::path::Path, bucket: &str) -> Result<PathBuf> {
    if bucket.is_empty() || bucket.contains('/') || bucket.starts_with('.') {
        return Err(StoreError::Path(PathBuf::from(bucket)));
    }
    Ok(root.join(bucket))
}

/// Map a key onto an `object_store` path, turning `dir/` markers into
/// organizer markers.
fn object_path(key: &str) -> ObjectPath {
    match key.strip_suffix('/') {
        Some(dir) => ObjectPath::from(format!("{}{}", dir, ORGANIZER_DIR_SUFFIX)),
        None => ObjectPath::from(key),
    }
}

fn prefix_path(prefix: &str) -> Option<ObjectPath> {
    if prefix.is_empty() {
        None
    } else {
        Some(ObjectPath::from(prefix))
    }
}

fn summary(meta: &ObjectMeta, headers: Headers) -> ObjectSummary {
    ObjectSummary {
        key: meta.location.to_string(),
        fingerprint: meta.e_tag.clone().unwrap_or_default(),
        size: meta.size as u64,
        headers,
    }
}

/// Read the keys after `request.marker` and roll them up into distinct
/// listing items. When the store streams keys in order, reading stops as soon
/// as one item past the page is seen; otherwise everything after the marker
/// is collected and left for [`paginate`] to sort.
async fn list_items(
    store: &dyn ObjectStore,
    request: &ListRequest,
    ordered: bool,
) -> std::result::Result<Vec<ListItem>, object_store::Error> {
    let prefix = prefix_path(&request.prefix);
    let offset = ObjectPath::from(request.marker.as_str());
    let mut stream = if request.marker.is_empty() {
        store.list(prefix.as_ref())
    } else {
        store.list_with_offset(prefix.as_ref(), &offset)
    };

    let limit = request.max_keys.max(1);
    let mut items: Vec<ListItem> = Vec::new();
    while let Some(meta) = stream.try_next().await? {
        let key = meta.location.to_string();
        if !key.starts_with(&request.prefix) {
            continue;
        }
        let item = match roll_up(&key, &request.prefix, &request.delimiter) {
            Some(common) => ListItem::Prefix(common),
            None => ListItem::Object(summary(&meta, Headers::new())),
        };
        // also skips keys rolled up into a prefix equal to the marker
        if item.sort_key() <= request.marker.as_str() {
            continue;
        }
        if ordered {
            if items.last().map(ListItem::sort_key) == Some(item.sort_key()) {
                continue;
            }
            items.push(item);
            if items.len() > limit {
                break;
            }
        } else {
            items.push(item);
        }
    }
    Ok(items)
}

fn not_found(bucket: &str, key: &str) -> impl FnOnce(object_store::Error) -> StoreError {
    let bucket = bucket.to_string();
    let key = key.to_string();
    move |err| match err {
        object_store::Error::NotFound { .. } => StoreError::ObjectNotFound { bucket, key },
        err => err.into(),
    }
}

impl Store for ObjectStoreBackend {
    fn list(&self, request: &ListRequest) -> Result<ListPage> {
        if request.delimiter != "/" {
            return Err(StoreError::Unsupported(format!(
                "delimiter {:?}",
                request.delimiter
            )));
        }
        let store = self.bucket(&request.bucket)?;
        let ordered = self.layout.lists_in_order();
        let items = self
            .rt
            .block_on(list_items(store.as_ref(), request, ordered))?;

        Ok(paginate(items, &request.marker, request.max_keys))
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let store = self.bucket(bucket)?;
        let path = object_path(key);
        self.rt
            .block_on(async {
                let result = store.get(&path).await?;
                result.bytes().await
            })
            .map_err(not_found(bucket, key))
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectSummary> {
        let store = self.bucket(bucket)?;
        let path = object_path(key);
        let options = GetOptions {
            head: true,
            ..Default::default()
        };
        let result = self
            .rt
            .block_on(async { store.get_opts(&path, options).await })
            .map_err(not_found(bucket, key))?;

        let mut headers = Headers::new();
        if let Some(value) = result.attributes.get(&Attribute::ContentType) {
            headers.insert(
                CONTENT_TYPE.to_string(),
                AsRef::<str>::as_ref(value).to_string(),
            );
        }
        Ok(summary(&result.meta, headers))
    }

    fn put_object(&self, bucket: &str, key: &str, data: Bytes, headers: &Headers) -> Result<()> {
        let store = self.bucket(bucket)?;
        let path = object_path(key);
        let mut attributes = Attributes::new();
        if let Some(content_type) = headers.get(CONTENT_TYPE) {
            attributes.insert(Attribute::ContentType, content_type.clone().into());
        }
        let options = PutOptions {
            attributes,
            ..Default::default()
        };
        self.rt
            .block_on(async { store.put_opts(&path, PutPayload::from(data), options).await })?;
        Ok(())
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let store = self.bucket(bucket)?;
        let path = object_path(key);
        // Ignore NotFound errors - deletes are idempotent
        match self.rt.block_on(async { store.delete(&path).await }) {
            Ok(()) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list_buckets(&self) -> Result<Vec<String>> {
        match &self.layout {
            Layout::Local { root } => {
                let mut names = Vec::new();
                for entry in std::fs::read_dir(root)? {
                    let entry = entry?;
                    if entry.file_type()?.is_dir() {
                        names.push(entry.file_name().to_string_lossy().to_string());
                    }
                }
                names.sort();
                Ok(names)
            }
            Layout::S3 { buckets, .. } => Ok(buckets.clone()),
        }
    }

    fn create_bucket(&self, name: &str) -> Result<()> {
        match &self.layout {
            Layout::Local { root } => {
                let dir = bucket_dir(root, name)?;
                if dir.exists() {
                    return Err(StoreError::BucketAlreadyExists(name.to_string()));
                }
                std::fs::create_dir(&dir)?;
                Ok(())
            }
            Layout::S3 { .. } => Err(StoreError::Unsupported(format!(
                "cannot create S3 bucket '{}'",
                name
            ))),
        }
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        match &self.layout {
            Layout::Local { root } => {
                let dir = bucket_dir(root, name)?;
                if !dir.is_dir() {
                    return Err(StoreError::BucketNotFound(name.to_string()));
                }
                if std::fs::read_dir(&dir)?.next().is_some() {
                    return Err(StoreError::BucketNotEmpty(name.to_string()));
                }
                std::fs::remove_dir(&dir)?;
                self.handles.write().remove(name);
                Ok(())
            }
            Layout::S3 { .. } => Err(StoreError::Unsupported(format!(
                "cannot delete S3 bucket '{}'",
                name
            ))),
        }
    }
}
