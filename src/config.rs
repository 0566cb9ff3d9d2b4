//! Cache configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::naming::DEFAULT_NAMESPACE;

/// Default capacity of the cache's change-event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Settings of a [`StudyCache`](crate::cache::StudyCache).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use trialview::CacheConfig;
///
/// let config = CacheConfig::from_json(r#"{"event_capacity": 8}"#).unwrap();
/// assert_eq!(config.event_capacity, 8);
/// assert_eq!(config.name_namespace, "savedObjectiveName");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Key prefix of persisted objective-name overrides.
    pub name_namespace: String,
    /// Number of change events buffered per subscriber before the slowest
    /// subscriber starts missing events.
    pub event_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name_namespace: DEFAULT_NAMESPACE.to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if `raw` is not a valid configuration.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Decode(format!("cache config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(CacheConfig::from_json("{}").unwrap(), CacheConfig::default());
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(CacheConfig::from_json(r#"{"event_capacity":"many"}"#).is_err());
    }
}
