use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use super::StudyCache;
use crate::config::CacheConfig;
use crate::naming::ObjectiveNameStore;
use crate::notify::{Notifier, TracingNotifier};
use crate::service::StudyService;
use crate::storage::{KeyValueStore, MemoryStore};

/// Builder for configuring a [`StudyCache`].
///
/// Defaults: an in-memory key-value store, a [`TracingNotifier`], and
/// [`CacheConfig::default`].
///
/// # Examples
///
/// ```
/// use trialview::prelude::*;
/// use trialview::notify::RecordingNotifier;
/// use trialview::service::MemoryStudyService;
/// use trialview::storage::MemoryStore;
///
/// let cache = StudyCache::builder(MemoryStudyService::new())
///     .store(MemoryStore::new())
///     .notifier(RecordingNotifier::new())
///     .name_namespace("objectiveNames")
///     .event_capacity(16)
///     .build();
/// assert_eq!(cache.name_store().key(4), "objectiveNames_4");
/// ```
pub struct StudyCacheBuilder {
    service: Arc<dyn StudyService>,
    store: Option<Arc<dyn KeyValueStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    config: CacheConfig,
}

impl StudyCacheBuilder {
    /// Create a builder around `service`.
    pub fn new(service: impl StudyService + 'static) -> Self {
        Self {
            service: Arc::new(service),
            store: None,
            notifier: None,
            config: CacheConfig::default(),
        }
    }

    /// Set the key-value store holding objective-name overrides.
    #[must_use]
    pub fn store(mut self, store: impl KeyValueStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set a shared key-value store.
    #[must_use]
    pub fn shared_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the notification sink.
    #[must_use]
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the key prefix of persisted objective-name overrides.
    #[must_use]
    pub fn name_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.name_namespace = namespace.into();
        self
    }

    /// Set the capacity of the change-event channel.
    #[must_use]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    /// Build the configured [`StudyCache`].
    #[must_use]
    pub fn build(self) -> StudyCache {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier));
        let (events, _) = broadcast::channel(self.config.event_capacity.max(1));
        StudyCache {
            service: self.service,
            names: ObjectiveNameStore::new(store, self.config.name_namespace),
            notifier,
            details: RwLock::new(HashMap::new()),
            summaries: RwLock::new(Arc::new(Vec::new())),
            epochs: Mutex::new(HashMap::new()),
            events,
        }
    }
}
