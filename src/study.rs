//! Study records held by the cache.

use serde::{Deserialize, Serialize};

use crate::distribution::SearchSpaceEntry;
use crate::trial::Trial;
use crate::types::Direction;

/// Free-text note attached to a study.
///
/// The service bumps `version` on every save and rejects saves made
/// against an outdated version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Version the note was last saved at.
    pub version: u64,
    /// Note text.
    pub body: String,
}

impl Note {
    /// Creates a note.
    pub fn new(version: u64, body: impl Into<String>) -> Self {
        Self {
            version,
            body: body.into(),
        }
    }
}

/// Lightweight study record used for listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySummary {
    /// Study identifier.
    pub study_id: u64,
    /// Study name.
    pub name: String,
    /// Objective directions.
    pub directions: Vec<Direction>,
}

/// Full view of one study: its trials, search space, and display names.
///
/// The cache owns these and hands out `Arc` snapshots; a detail is never
/// edited after it has been published.
#[derive(Clone, Debug, PartialEq)]
pub struct StudyDetail {
    /// Study identifier.
    pub study_id: u64,
    /// Study name.
    pub name: String,
    /// Objective directions, fixed at study creation.
    pub directions: Vec<Direction>,
    /// Trials, ascending by number.
    pub trials: Vec<Trial>,
    /// Every parameter observed across the trials, keyed by name.
    pub union_search_space: Vec<SearchSpaceEntry>,
    /// Display name per objective; always as long as `directions`.
    pub objective_names: Vec<String>,
    /// Study note.
    pub note: Note,
}

impl StudyDetail {
    /// Number of objectives.
    #[must_use]
    pub fn n_objectives(&self) -> usize {
        self.directions.len()
    }

    /// Returns the search space entry for the parameter called `name`.
    #[must_use]
    pub fn search_space_entry(&self, name: &str) -> Option<&SearchSpaceEntry> {
        self.union_search_space.iter().find(|e| e.name == name)
    }

    /// Returns the summary view of this study.
    #[must_use]
    pub fn summary(&self) -> StudySummary {
        StudySummary {
            study_id: self.study_id,
            name: self.name.clone(),
            directions: self.directions.clone(),
        }
    }
}

/// Default display names: the stringified objective index.
#[must_use]
pub fn default_objective_names(n_objectives: usize) -> Vec<String> {
    (0..n_objectives).map(|i| i.to_string()).collect()
}
