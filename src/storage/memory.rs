use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::KeyValueStore;
use crate::error::Result;

/// In-memory key-value store (the default).
///
/// This is a thin wrapper around `RwLock<HashMap<String, String>>`.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryStore::new();
        assert!(store.get("k").await.unwrap().is_none());
        store.set("k", "v1".to_string()).await.unwrap();
        store.set("k", "v2".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn prepopulated() {
        let store = MemoryStore::with_entries([("a", "1"), ("b", "2")]);
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
        assert!(!store.is_empty());
    }
}
