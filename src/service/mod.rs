//! The study service collaborator.
//!
//! [`StudyService`] is the boundary to the backing service that owns the
//! studies. The cache only ever talks to it through this trait; the wire
//! transport behind an implementation is out of this crate's hands, but
//! implementations that speak JSON can use [`wire`](crate::wire) to decode
//! and validate payloads.
//!
//! [`MemoryStudyService`] is a complete in-process implementation, handy
//! for tests, demos, and offline tools.

mod memory;

use std::sync::Arc;

use async_trait::async_trait;
pub use memory::MemoryStudyService;

use crate::error::Result;
use crate::study::{Note, StudyDetail, StudySummary};
use crate::types::Direction;

/// Operations the dashboard needs from the backing service.
#[async_trait]
pub trait StudyService: Send + Sync {
    /// List all studies.
    async fn list_study_summaries(&self) -> Result<Vec<StudySummary>>;

    /// Fetch a study with its trials from index `after_trial_index` onward.
    ///
    /// The returned trials start at that offset of the service's own trial
    /// sequence and may include trials the caller has never seen.
    async fn get_study_detail(&self, study_id: u64, after_trial_index: usize)
    -> Result<StudyDetail>;

    /// Create a study. Fails on a duplicate name or invalid directions.
    async fn create_study(&self, name: &str, directions: &[Direction]) -> Result<StudySummary>;

    /// Delete a study.
    async fn delete_study(&self, study_id: u64) -> Result<()>;

    /// Save a study note.
    ///
    /// `note.version` must be one past the version the caller last saw;
    /// otherwise the call fails with
    /// [`Error::NoteConflict`](crate::Error::NoteConflict) carrying the
    /// service's current note.
    async fn save_note(&self, study_id: u64, note: &Note) -> Result<()>;
}

#[async_trait]
impl<S: StudyService + ?Sized> StudyService for Arc<S> {
    async fn list_study_summaries(&self) -> Result<Vec<StudySummary>> {
        (**self).list_study_summaries().await
    }

    async fn get_study_detail(
        &self,
        study_id: u64,
        after_trial_index: usize,
    ) -> Result<StudyDetail> {
        (**self).get_study_detail(study_id, after_trial_index).await
    }

    async fn create_study(&self, name: &str, directions: &[Direction]) -> Result<StudySummary> {
        (**self).create_study(name, directions).await
    }

    async fn delete_study(&self, study_id: u64) -> Result<()> {
        (**self).delete_study(study_id).await
    }

    async fn save_note(&self, study_id: u64, note: &Note) -> Result<()> {
        (**self).save_note(study_id, note).await
    }
}
