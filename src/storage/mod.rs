//! Client-local key-value stores.
//!
//! The [`KeyValueStore`] trait is the persisted-store collaborator of the
//! cache: a string-keyed, string-valued map with asynchronous access. The
//! [`ObjectiveNameStore`](crate::naming::ObjectiveNameStore) keeps its
//! overrides here.
//!
//! # Available backends
//!
//! | Backend | Description | Feature flag |
//! |---------|-------------|-------------|
//! | [`MemoryStore`] | `HashMap` behind a read-write lock (the default) | none |
//! | `FileStore` | One JSON object on disk, guarded by an `fs2` lock file | `file-store` |
//!
//! # Implementing a custom backend
//!
//! Implement [`get`](KeyValueStore::get) and [`set`](KeyValueStore::set)
//! and hand the store to the cache builder:
//!
//! ```
//! use trialview::prelude::*;
//! use trialview::storage::MemoryStore;
//!
//! # let service = trialview::service::MemoryStudyService::new();
//! let cache = StudyCache::builder(service).store(MemoryStore::new()).build();
//! ```

#[cfg(feature = "file-store")]
mod file;
mod memory;

use async_trait::async_trait;
#[cfg(feature = "file-store")]
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// String-keyed, string-valued persisted store.
///
/// Implementations must be `Send + Sync`; the cache shares its store
/// across tasks.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Return the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;
}
