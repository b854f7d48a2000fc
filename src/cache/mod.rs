//! Cache module for loaded content
//!
//! Loading the content directory parses and renders every post, so the
//! server keeps the last [`ContentStore`] around. Each entry is keyed by a
//! [`ContentVersion`] fingerprint of the directory (file paths, sizes and
//! modification times); a request that sees a different fingerprint reloads
//! from scratch. [`ContentCache::invalidate`] forces the next reload.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::content::{ContentLoader, ContentStore};
use crate::error::Result;
use crate::Site;

/// Fingerprint of the content directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContentVersion {
    /// Number of files under the content directory
    pub files: usize,
    /// Newest modification time, as nanoseconds since the unix epoch
    pub newest_mtime: u128,
    /// Hash over every file's path, size and modification time
    pub fingerprint: u64,
}

impl ContentVersion {
    /// Scan a directory and compute its version
    ///
    /// A missing directory has the empty version.
    pub fn scan(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            return Ok(Self::default());
        }

        let mut hasher = DefaultHasher::new();
        let mut version = Self::default();

        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = entry.metadata()?;
            let mtime = get_mtime(metadata.modified().ok());

            entry.path().hash(&mut hasher);
            metadata.len().hash(&mut hasher);
            mtime.hash(&mut hasher);

            version.files += 1;
            version.newest_mtime = version.newest_mtime.max(mtime);
        }

        version.fingerprint = hasher.finish();
        Ok(version)
    }
}

/// Modification time as nanoseconds since the unix epoch
fn get_mtime(modified: Option<SystemTime>) -> u128 {
    modified
        .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

struct CacheEntry {
    version: ContentVersion,
    store: Arc<ContentStore>,
}

/// Memoized content store, reloaded when the content directory changes
pub struct ContentCache {
    loader: ContentLoader,
    content_dir: PathBuf,
    entry: RwLock<Option<CacheEntry>>,
}

impl ContentCache {
    /// Create an empty cache for a site; nothing is loaded until [`get`](Self::get)
    pub fn new(site: &Site) -> Self {
        Self {
            loader: ContentLoader::new(site),
            content_dir: site.content_dir.clone(),
            entry: RwLock::new(None),
        }
    }

    /// Return the current content, reloading it if the directory changed
    pub fn get(&self) -> Result<Arc<ContentStore>> {
        let version = ContentVersion::scan(&self.content_dir)?;

        if let Some(entry) = self.read().as_ref() {
            if entry.version == version {
                return Ok(Arc::clone(&entry.store));
            }
            tracing::info!("Content changed, reloading");
        }

        let store = Arc::new(self.loader.load_all()?);
        tracing::debug!("Cached {} posts at {:?}", store.len(), version);

        *self.write() = Some(CacheEntry {
            version,
            store: Arc::clone(&store),
        });

        Ok(store)
    }

    /// Drop the cached content so the next [`get`](Self::get) reloads it
    pub fn invalidate(&self) {
        if self.write().take().is_some() {
            tracing::debug!("Content cache invalidated");
        }
    }

    /// Whether content is currently cached
    pub fn is_loaded(&self) -> bool {
        self.read().is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<CacheEntry>> {
        self.entry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<CacheEntry>> {
        self.entry.write().unwrap_or_else(PoisonError::into_inner)
    }
}
