use core::sync::atomic::{AtomicU64, Ordering};
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use super::StudyService;
use crate::distribution::SearchSpaceEntry;
use crate::error::{Error, Result};
use crate::study::{Note, StudyDetail, StudySummary, default_objective_names};
use crate::trial::Trial;
use crate::types::Direction;
use crate::wire::STATUS_CONFLICT;

const STATUS_BAD_REQUEST: u16 = 400;
const STATUS_NOT_FOUND: u16 = 404;

struct StoredStudy {
    name: String,
    directions: Vec<Direction>,
    trials: Vec<Trial>,
    union_search_space: Vec<SearchSpaceEntry>,
    note: Note,
}

#[derive(Default)]
struct Inner {
    studies: RwLock<BTreeMap<u64, StoredStudy>>,
    next_id: AtomicU64,
    detail_requests: Mutex<Vec<(u64, usize)>>,
    injected: Mutex<Option<Error>>,
}

/// In-process study service (the default for tests and demos).
///
/// Studies live in a `BTreeMap` behind a read-write lock. Cloning the
/// service yields another handle to the same studies, so a test can keep a
/// handle to add or finish trials while the cache owns another.
#[derive(Clone, Default)]
pub struct MemoryStudyService {
    inner: Arc<Inner>,
}

impl MemoryStudyService {
    /// Creates a service without studies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a study directly, bypassing name validation.
    pub fn insert_study(&self, name: impl Into<String>, directions: Vec<Direction>) -> u64 {
        let study_id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.studies.write().insert(
            study_id,
            StoredStudy {
                name: name.into(),
                directions,
                trials: Vec::new(),
                union_search_space: Vec::new(),
                note: Note::default(),
            },
        );
        study_id
    }

    /// Appends a trial to a study. Unknown studies are ignored.
    pub fn push_trial(&self, study_id: u64, trial: Trial) {
        if let Some(study) = self.inner.studies.write().get_mut(&study_id) {
            study.trials.push(trial);
        }
    }

    /// Replaces the trial numbered `number`. Returns `false` if not found.
    pub fn replace_trial(&self, study_id: u64, trial: Trial) -> bool {
        let mut studies = self.inner.studies.write();
        let Some(study) = studies.get_mut(&study_id) else {
            return false;
        };
        match study.trials.iter_mut().find(|t| t.number == trial.number) {
            Some(slot) => {
                *slot = trial;
                true
            }
            None => false,
        }
    }

    /// Adds a union search space entry, replacing one with the same name.
    pub fn add_search_space_entry(&self, study_id: u64, entry: SearchSpaceEntry) {
        if let Some(study) = self.inner.studies.write().get_mut(&study_id) {
            study.union_search_space.retain(|e| e.name != entry.name);
            study.union_search_space.push(entry);
        }
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: Error) {
        *self.inner.injected.lock() = Some(error);
    }

    /// Every `(study_id, after_trial_index)` pair requested so far.
    #[must_use]
    pub fn detail_requests(&self) -> Vec<(u64, usize)> {
        self.inner.detail_requests.lock().clone()
    }

    /// The note the service currently holds for `study_id`.
    #[must_use]
    pub fn note(&self, study_id: u64) -> Option<Note> {
        self.inner
            .studies
            .read()
            .get(&study_id)
            .map(|s| s.note.clone())
    }

    fn take_injected(&self) -> Result<()> {
        match self.inner.injected.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn not_found(study_id: u64) -> Error {
    Error::Service {
        status: STATUS_NOT_FOUND,
        reason: Some(format!("study {study_id} not found")),
    }
}

#[async_trait]
impl StudyService for MemoryStudyService {
    async fn list_study_summaries(&self) -> Result<Vec<StudySummary>> {
        self.take_injected()?;
        Ok(self
            .inner
            .studies
            .read()
            .iter()
            .map(|(&study_id, s)| StudySummary {
                study_id,
                name: s.name.clone(),
                directions: s.directions.clone(),
            })
            .collect())
    }

    async fn get_study_detail(
        &self,
        study_id: u64,
        after_trial_index: usize,
    ) -> Result<StudyDetail> {
        self.inner
            .detail_requests
            .lock()
            .push((study_id, after_trial_index));
        self.take_injected()?;
        let studies = self.inner.studies.read();
        let study = studies.get(&study_id).ok_or_else(|| not_found(study_id))?;
        let start = after_trial_index.min(study.trials.len());
        Ok(StudyDetail {
            study_id,
            name: study.name.clone(),
            directions: study.directions.clone(),
            trials: study.trials[start..].to_vec(),
            union_search_space: study.union_search_space.clone(),
            objective_names: default_objective_names(study.directions.len()),
            note: study.note.clone(),
        })
    }

    async fn create_study(&self, name: &str, directions: &[Direction]) -> Result<StudySummary> {
        self.take_injected()?;
        if directions.is_empty() {
            return Err(Error::Service {
                status: STATUS_BAD_REQUEST,
                reason: Some("directions must not be empty".to_string()),
            });
        }
        if self.inner.studies.read().values().any(|s| s.name == name) {
            return Err(Error::Service {
                status: STATUS_BAD_REQUEST,
                reason: Some(format!("study name {name:?} already exists")),
            });
        }
        let study_id = self.insert_study(name, directions.to_vec());
        Ok(StudySummary {
            study_id,
            name: name.to_string(),
            directions: directions.to_vec(),
        })
    }

    async fn delete_study(&self, study_id: u64) -> Result<()> {
        self.take_injected()?;
        self.inner
            .studies
            .write()
            .remove(&study_id)
            .map(|_| ())
            .ok_or_else(|| not_found(study_id))
    }

    async fn save_note(&self, study_id: u64, note: &Note) -> Result<()> {
        self.take_injected()?;
        let mut studies = self.inner.studies.write();
        let study = studies.get_mut(&study_id).ok_or_else(|| not_found(study_id))?;
        if note.version != study.note.version + 1 {
            return Err(Error::NoteConflict {
                current: study.note.clone(),
                reason: Some(format!(
                    "note was updated concurrently (status {STATUS_CONFLICT})"
                )),
            });
        }
        study.note = note.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrialState;

    #[tokio::test]
    async fn detail_from_offset() {
        let service = MemoryStudyService::new();
        let id = service.insert_study("s", vec![Direction::Minimize]);
        for n in 0..4 {
            service.push_trial(id, Trial::new(n, TrialState::Complete).with_values(vec![0.0]));
        }
        let detail = service.get_study_detail(id, 3).await.unwrap();
        assert_eq!(detail.trials.len(), 1);
        assert_eq!(detail.trials[0].number, 3);
        let beyond = service.get_study_detail(id, 10).await.unwrap();
        assert!(beyond.trials.is_empty());
        assert_eq!(service.detail_requests(), vec![(id, 3), (id, 10)]);
    }

    #[tokio::test]
    async fn duplicate_name_rejected() {
        let service = MemoryStudyService::new();
        service
            .create_study("a", &[Direction::Maximize])
            .await
            .unwrap();
        let err = service
            .create_study("a", &[Direction::Maximize])
            .await
            .unwrap_err();
        assert!(err.reason().is_some_and(|r| r.contains("already exists")));
    }

    #[tokio::test]
    async fn stale_note_conflicts() {
        let service = MemoryStudyService::new();
        let id = service.insert_study("s", vec![Direction::Minimize]);
        service.save_note(id, &Note::new(1, "first")).await.unwrap();
        let err = service.save_note(id, &Note::new(1, "second")).await.unwrap_err();
        match err {
            Error::NoteConflict { current, .. } => assert_eq!(current, Note::new(1, "first")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn injected_failure_is_consumed() {
        let service = MemoryStudyService::new();
        service.fail_next(Error::Transport("down".to_string()));
        assert!(service.list_study_summaries().await.is_err());
        assert!(service.list_study_summaries().await.is_ok());
    }
}
