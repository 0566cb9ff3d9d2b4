//! File-backed key-value store.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use fs2::FileExt;
use parking_lot::Mutex;

use super::KeyValueStore;
use crate::error::{Error, Result};

/// A key-value store persisted as a single JSON object on disk.
///
/// Every `set` rewrites the whole file through a temporary file and a
/// rename. Access from several processes is serialised with an exclusive
/// `fs2` lock on a `.lock` file next to the data file; in-process writers
/// additionally share a mutex so the file lock is held only briefly.
///
/// File I/O runs on tokio's blocking pool.
///
/// # Examples
///
/// ```no_run
/// use trialview::storage::FileStore;
///
/// let store = FileStore::new("dashboard-store.json");
/// ```
#[derive(Clone)]
pub struct FileStore {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    lock_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by `path`.
    ///
    /// The file does not need to exist yet; it is created on the first
    /// write.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut lock_name = path.file_name().unwrap_or_default().to_os_string();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);
        Self {
            inner: Arc::new(Inner {
                path,
                lock_path,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Path of the data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl Inner {
    fn open_lock(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(store_err)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let lock = self.open_lock()?;
        lock.lock_shared().map_err(store_err)?;
        let entries = read_entries(&self.path);
        FileExt::unlock(&lock).map_err(store_err)?;
        Ok(entries?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.write_lock.lock();
        let lock = self.open_lock()?;
        lock.lock_exclusive().map_err(store_err)?;
        let written = read_entries(&self.path).and_then(|mut entries| {
            entries.insert(key.to_string(), value);
            write_entries(&self.path, &entries)
        });
        FileExt::unlock(&lock).map_err(store_err)?;
        written
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let inner = Arc::clone(&self.inner);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || inner.get(&key))
            .await
            .map_err(|e| Error::Store(e.to_string()))?
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || inner.set(&key, value))
            .await
            .map_err(|e| Error::Store(e.to_string()))?
    }
}

/// Read the stored map. A missing file reads as empty.
fn read_entries(path: &Path) -> Result<BTreeMap<String, String>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(store_err(e)),
    };
    serde_json::from_reader(file).map_err(|e| Error::Store(e.to_string()))
}

/// Atomic write: temp file in the same directory, then rename.
fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));
    let file = File::create(&tmp_path).map_err(store_err)?;
    serde_json::to_writer_pretty(&file, entries).map_err(|e| Error::Store(e.to_string()))?;
    file.sync_all().map_err(store_err)?;
    std::fs::rename(&tmp_path, path).map_err(store_err)
}

#[allow(clippy::needless_pass_by_value)]
fn store_err(e: std::io::Error) -> Error {
    Error::Store(e.to_string())
}
