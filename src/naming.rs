//! User-assigned objective display names.
//!
//! Overrides are kept in a [`KeyValueStore`] under
//! `"<namespace>_<study_id>"` as a versioned JSON record:
//!
//! ```json
//! {"version":1,"names":["loss","latency"]}
//! ```
//!
//! Position `i` of `names` is the name of objective `i`. Two older shapes
//! are still read: a bare JSON array (positional), and a JSON object keyed
//! by stringified objective index, where position `i` takes the entry
//! under key `"i"` for `i` in `0..key_count`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::KeyValueStore;

/// Default key namespace of the stored overrides.
pub const DEFAULT_NAMESPACE: &str = "savedObjectiveName";

/// Current version of [`ObjectiveNameOverride`].
pub const OVERRIDE_VERSION: u32 = 1;

/// Persisted objective-name override of one study.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveNameOverride {
    /// Record version.
    pub version: u32,
    /// Display name per objective index.
    pub names: Vec<String>,
}

impl ObjectiveNameOverride {
    /// Creates a current-version override.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self {
            version: OVERRIDE_VERSION,
            names,
        }
    }

    /// Decode any supported stored shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if `raw` is not one of the supported shapes.
    pub fn decode(raw: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Stored {
            Versioned(ObjectiveNameOverride),
            Positional(Vec<String>),
            Keyed(BTreeMap<String, String>),
        }

        let stored: Stored =
            serde_json::from_str(raw).map_err(|e| Error::Decode(format!("objective names: {e}")))?;
        Ok(match stored {
            Stored::Versioned(record) => record,
            Stored::Positional(names) => Self::new(names),
            Stored::Keyed(map) => {
                let names = (0..map.len())
                    .map(|i| map.get(&i.to_string()).cloned().unwrap_or_default())
                    .collect();
                Self::new(names)
            }
        })
    }

    /// Encode as the current stored shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the record cannot be serialized for
    /// storage.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Store(format!("objective names: {e}")))
    }

    /// Fit the override onto `defaults`.
    ///
    /// Extra names are dropped, missing or empty positions keep the
    /// default, so the result is always as long as `defaults`.
    #[must_use]
    pub fn apply(&self, defaults: &[String]) -> Vec<String> {
        defaults
            .iter()
            .enumerate()
            .map(|(i, default)| match self.names.get(i) {
                Some(name) if !name.is_empty() => name.clone(),
                _ => default.clone(),
            })
            .collect()
    }
}

/// Reads and writes objective-name overrides through a [`KeyValueStore`].
#[derive(Clone)]
pub struct ObjectiveNameStore {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl ObjectiveNameStore {
    /// Creates a name store over `store` using `namespace` as key prefix.
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Key under which the override of `study_id` is stored.
    #[must_use]
    pub fn key(&self, study_id: u64) -> String {
        format!("{}_{study_id}", self.namespace)
    }

    /// Return the stored names of `study_id`.
    ///
    /// An empty override reads as absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store fails and [`Error::Decode`] if
    /// the stored value is malformed.
    pub async fn get(&self, study_id: u64) -> Result<Option<ObjectiveNameOverride>> {
        let Some(raw) = self.store.get(&self.key(study_id)).await? else {
            return Ok(None);
        };
        let record = ObjectiveNameOverride::decode(&raw)?;
        Ok((!record.names.is_empty()).then_some(record))
    }

    /// Persist the full ordered name list of `study_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store fails.
    pub async fn set(&self, study_id: u64, names: &[String]) -> Result<()> {
        let raw = ObjectiveNameOverride::new(names.to_vec()).encode()?;
        self.store.set(&self.key(study_id), raw).await?;
        trace_debug!(study_id, n_names = names.len(), "objective names stored");
        Ok(())
    }
}
