//! Incremental, per-study synchronization cache.
//!
//! [`StudyCache`] holds the authoritative in-memory view of every study
//! the dashboard has opened. A refresh only asks the
//! [`StudyService`] for trials that may still change: the
//! finalized prefix of the cached sequence (everything before the first
//! `Running`/`Waiting` trial) is kept and never requested again.
//!
//! Snapshots are handed out as `Arc<StudyDetail>` and replaced wholesale,
//! so a reader never observes a half-merged study. Changes are announced on
//! a broadcast channel (see [`StudyCache::subscribe`]).
//!
//! Each refresh is stamped with a per-study epoch when it is issued. A
//! completion whose epoch is no longer the latest one issued for that study
//! is discarded, so a slow response cannot overwrite a newer one. Local
//! edits (notes, objective names) and deletions also invalidate refreshes
//! still in flight.
//!
//! # Example
//!
//! ```
//! use trialview::prelude::*;
//! use trialview::service::MemoryStudyService;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let service = MemoryStudyService::new();
//! let id = service.insert_study("demo", vec![Direction::Minimize, Direction::Maximize]);
//! service.push_trial(id, Trial::new(0, TrialState::Complete).with_values(vec![1.0, 2.0]));
//!
//! let cache = StudyCache::builder(service).build();
//! cache.refresh(id).await.unwrap();
//!
//! let study = cache.snapshot(id).unwrap();
//! assert_eq!(study.trials.len(), 1);
//! assert_eq!(study.objective_names, vec!["0", "1"]);
//! # });
//! ```

mod builder;
mod merge;

use std::collections::HashMap;
use std::sync::Arc;

pub use builder::StudyCacheBuilder;
pub use merge::{fixed_count, merge_trials};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use crate::error::{Error, Result};
use crate::naming::ObjectiveNameStore;
use crate::notify::{Notifier, Severity};
use crate::service::StudyService;
use crate::study::{Note, StudyDetail, StudySummary, default_objective_names};
use crate::types::Direction;

/// A change published by the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheEvent {
    /// The cached detail of a study was replaced.
    DetailReplaced {
        /// The study whose detail changed.
        study_id: u64,
    },
    /// The cached study list was replaced.
    SummariesReplaced,
    /// A study was deleted and dropped from the cache.
    StudyRemoved {
        /// The deleted study.
        study_id: u64,
    },
}

/// Result of a successful [`StudyCache::refresh`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum RefreshOutcome {
    /// The merged detail was published.
    Applied {
        /// The published snapshot.
        detail: Arc<StudyDetail>,
        /// Number of cached trials that were kept without re-requesting.
        reused: usize,
        /// Number of trials received from the service.
        fetched: usize,
    },
    /// A newer request for the same study was issued meanwhile; this
    /// response was dropped and the cache left as it was.
    Stale,
}

impl RefreshOutcome {
    /// Returns the published snapshot, if the response was applied.
    #[must_use]
    pub fn detail(&self) -> Option<&Arc<StudyDetail>> {
        match self {
            Self::Applied { detail, .. } => Some(detail),
            Self::Stale => None,
        }
    }
}

/// Per-study cache of [`StudyDetail`]s plus the study list.
///
/// Build one with [`StudyCache::builder`].
pub struct StudyCache {
    service: Arc<dyn StudyService>,
    names: ObjectiveNameStore,
    notifier: Arc<dyn Notifier>,
    details: RwLock<HashMap<u64, Arc<StudyDetail>>>,
    summaries: RwLock<Arc<Vec<StudySummary>>>,
    /// Epoch bookkeeping of studies with a refresh in flight. Always locked
    /// before `details` when both are needed.
    epochs: Mutex<HashMap<u64, EpochState>>,
    events: broadcast::Sender<CacheEvent>,
}

impl StudyCache {
    /// Return a [`StudyCacheBuilder`] around `service`.
    pub fn builder(service: impl StudyService + 'static) -> StudyCacheBuilder {
        StudyCacheBuilder::new(service)
    }

    /// The current snapshot of `study_id`, if cached.
    #[must_use]
    pub fn snapshot(&self, study_id: u64) -> Option<Arc<StudyDetail>> {
        self.details.read().get(&study_id).cloned()
    }

    /// The current study list.
    #[must_use]
    pub fn summaries(&self) -> Arc<Vec<StudySummary>> {
        Arc::clone(&self.summaries.read())
    }

    /// Ids of all cached studies, ascending.
    #[must_use]
    pub fn cached_study_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.details.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Subscribe to change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// The objective name store used by this cache.
    #[must_use]
    pub fn name_store(&self) -> &ObjectiveNameStore {
        &self.names
    }

    /// Bring the cached detail of `study_id` up to date.
    ///
    /// Only trials at or after the first unfinished cached trial are
    /// requested; the finalized prefix is reused as is. Objective names are
    /// reset to their defaults and then overridden from the name store.
    ///
    /// # Errors
    ///
    /// Returns the service error if the request fails. The cache is left
    /// unchanged and the failure is reported to the notifier.
    pub async fn refresh(&self, study_id: u64) -> Result<RefreshOutcome> {
        let ticket = self.issue_epoch(study_id);
        let cached = self.snapshot(study_id);
        let cached_trials = cached.as_deref().map_or(&[][..], |d| d.trials.as_slice());
        let fixed = fixed_count(cached_trials);
        trace_debug!(study_id, epoch = ticket.epoch, fixed, "refreshing study");

        let mut detail = match self.service.get_study_detail(study_id, fixed).await {
            Ok(detail) => detail,
            Err(e) => {
                trace_warn!(study_id, error = %e, "study refresh failed");
                self.report_failure(&e, || format!("Failed to fetch study (id={study_id})"));
                return Err(e);
            }
        };

        let fetched = detail.trials.len();
        detail.study_id = study_id;
        detail.trials = merge_trials(cached_trials, fixed, core::mem::take(&mut detail.trials));
        detail.objective_names = self
            .objective_names_for(study_id, detail.directions.len())
            .await;

        let detail = Arc::new(detail);
        {
            let epochs = self.epochs.lock();
            if epochs.get(&study_id).map(|s| s.latest) != Some(ticket.epoch) {
                trace_debug!(study_id, epoch = ticket.epoch, "dropping stale study refresh");
                return Ok(RefreshOutcome::Stale);
            }
            self.details.write().insert(study_id, Arc::clone(&detail));
        }
        self.publish(CacheEvent::DetailReplaced { study_id });
        trace_info!(study_id, reused = fixed, fetched, "study refreshed");

        Ok(RefreshOutcome::Applied {
            detail,
            reused: fixed,
            fetched,
        })
    }

    /// Replace the cached study list.
    ///
    /// `success_message` is sent to the notifier when the list was
    /// fetched.
    ///
    /// # Errors
    ///
    /// Returns the service error; the cached list is left unchanged.
    pub async fn refresh_summaries(
        &self,
        success_message: Option<&str>,
    ) -> Result<Arc<Vec<StudySummary>>> {
        let summaries = match self.service.list_study_summaries().await {
            Ok(s) => Arc::new(s),
            Err(e) => {
                trace_warn!(error = %e, "study list refresh failed");
                self.notifier
                    .notify("Failed to fetch study list.", Severity::Error);
                return Err(e);
            }
        };
        *self.summaries.write() = Arc::clone(&summaries);
        self.publish(CacheEvent::SummariesReplaced);
        if let Some(message) = success_message {
            self.notifier.notify(message, Severity::Success);
        }
        Ok(summaries)
    }

    /// Create a study and append it to the cached list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDirections`] without calling the service when
    /// `directions` is empty, or the service error.
    pub async fn create_study(&self, name: &str, directions: &[Direction]) -> Result<StudySummary> {
        let failure = || format!("Failed to create a study (study_name={name})");
        if directions.is_empty() {
            self.notifier.notify(&failure(), Severity::Error);
            return Err(Error::EmptyDirections);
        }
        let summary = match self.service.create_study(name, directions).await {
            Ok(s) => s,
            Err(e) => {
                trace_warn!(name, error = %e, "study creation failed");
                self.report_failure(&e, failure);
                return Err(e);
            }
        };
        {
            let mut summaries = self.summaries.write();
            let mut next = summaries.as_ref().clone();
            next.push(summary.clone());
            *summaries = Arc::new(next);
        }
        self.publish(CacheEvent::SummariesReplaced);
        self.notifier.notify(
            &format!("Created a study (study_name={name})"),
            Severity::Success,
        );
        Ok(summary)
    }

    /// Delete a study and drop it from the cache.
    ///
    /// Any refresh of the study still in flight is invalidated.
    ///
    /// # Errors
    ///
    /// Returns the service error; the cache is left unchanged.
    pub async fn delete_study(&self, study_id: u64) -> Result<()> {
        if let Err(e) = self.service.delete_study(study_id).await {
            trace_warn!(study_id, error = %e, "study deletion failed");
            self.report_failure(&e, || format!("Failed to delete study (id={study_id})"));
            return Err(e);
        }
        {
            let mut epochs = self.epochs.lock();
            invalidate(&mut epochs, study_id);
            self.details.write().remove(&study_id);
        }
        {
            let mut summaries = self.summaries.write();
            let next: Vec<StudySummary> = summaries
                .iter()
                .filter(|s| s.study_id != study_id)
                .cloned()
                .collect();
            *summaries = Arc::new(next);
        }
        self.publish(CacheEvent::StudyRemoved { study_id });
        self.notifier.notify(
            &format!("Deleted a study (id={study_id})"),
            Severity::Success,
        );
        Ok(())
    }

    /// Persist display names for the objectives of `study_id` and apply
    /// them to the cached detail.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStudy`] if the study is not cached,
    /// [`Error::ObjectiveNamesLength`] if `names` does not have one entry
    /// per objective, or the store error.
    pub async fn set_objective_names(&self, study_id: u64, names: Vec<String>) -> Result<()> {
        let snapshot = self
            .snapshot(study_id)
            .ok_or(Error::UnknownStudy(study_id))?;
        if names.len() != snapshot.n_objectives() {
            return Err(Error::ObjectiveNamesLength {
                expected: snapshot.n_objectives(),
                got: names.len(),
            });
        }
        self.names.set(study_id, &names).await?;
        if self.replace_detail(study_id, |d| d.objective_names = names) {
            self.publish(CacheEvent::DetailReplaced { study_id });
        }
        Ok(())
    }

    /// Save the note of `study_id`.
    ///
    /// On success the cached note becomes `note`. On a conflict the
    /// service's current note is written into the cache before the
    /// conflict is returned, so the caller can show it and retry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoteConflict`] on a concurrent modification, or the
    /// service error.
    pub async fn save_note(&self, study_id: u64, note: Note) -> Result<()> {
        match self.service.save_note(study_id, &note).await {
            Ok(()) => {
                if self.replace_detail(study_id, |d| d.note = note) {
                    self.publish(CacheEvent::DetailReplaced { study_id });
                }
                self.notifier.notify("Saved the note", Severity::Success);
                Ok(())
            }
            Err(Error::NoteConflict { current, reason }) => {
                trace_warn!(study_id, "note conflict");
                let applied = current.clone();
                if self.replace_detail(study_id, |d| d.note = applied) {
                    self.publish(CacheEvent::DetailReplaced { study_id });
                }
                if let Some(reason) = &reason {
                    self.notifier
                        .notify(&format!("Failed: {reason}"), Severity::Error);
                }
                Err(Error::NoteConflict { current, reason })
            }
            Err(e) => {
                trace_warn!(study_id, error = %e, "note save failed");
                self.report_failure(&e, || "Failed to save the note".to_string());
                Err(e)
            }
        }
    }

    /// Issue the next epoch for `study_id`.
    fn issue_epoch(&self, study_id: u64) -> EpochTicket<'_> {
        let mut epochs = self.epochs.lock();
        let state = epochs.entry(study_id).or_default();
        state.latest += 1;
        state.pending += 1;
        EpochTicket {
            epochs: &self.epochs,
            study_id,
            epoch: state.latest,
        }
    }

    /// Default names overridden from the name store.
    ///
    /// A broken or unreachable store degrades to the default names.
    async fn objective_names_for(&self, study_id: u64, n_objectives: usize) -> Vec<String> {
        let defaults = default_objective_names(n_objectives);
        match self.names.get(study_id).await {
            Ok(Some(record)) => record.apply(&defaults),
            Ok(None) => defaults,
            Err(e) => {
                trace_warn!(study_id, error = %e, "ignoring unreadable objective names");
                #[cfg(not(feature = "tracing"))]
                let _ = e;
                defaults
            }
        }
    }

    /// Clone-modify-swap the cached detail of `study_id`.
    ///
    /// Refreshes still in flight for the study are invalidated, so they
    /// cannot publish data fetched before this edit. Returns `false` if the
    /// study is not cached.
    fn replace_detail(&self, study_id: u64, edit: impl FnOnce(&mut StudyDetail)) -> bool {
        let mut epochs = self.epochs.lock();
        invalidate(&mut epochs, study_id);
        let mut details = self.details.write();
        let Some(current) = details.get(&study_id) else {
            return false;
        };
        let mut next = current.as_ref().clone();
        edit(&mut next);
        details.insert(study_id, Arc::new(next));
        true
    }

    fn report_failure(&self, error: &Error, generic: impl FnOnce() -> String) {
        let message = match error.reason() {
            Some(reason) => format!("{} (reason={reason})", generic()),
            None => generic(),
        };
        self.notifier.notify(&message, Severity::Error);
    }

    fn publish(&self, event: CacheEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

/// Epochs of one study. The entry exists only while `pending > 0`.
#[derive(Default)]
struct EpochState {
    latest: u64,
    pending: usize,
}

/// Make every in-flight refresh of `study_id` stale.
fn invalidate(epochs: &mut HashMap<u64, EpochState>, study_id: u64) {
    if let Some(state) = epochs.get_mut(&study_id) {
        state.latest += 1;
    }
}

/// One issued refresh epoch. Dropping it retires the refresh however it
/// ended.
struct EpochTicket<'a> {
    epochs: &'a Mutex<HashMap<u64, EpochState>>,
    study_id: u64,
    epoch: u64,
}

impl Drop for EpochTicket<'_> {
    fn drop(&mut self) {
        let mut epochs = self.epochs.lock();
        if let Some(state) = epochs.get_mut(&self.study_id) {
            state.pending -= 1;
            if state.pending == 0 {
                epochs.remove(&self.study_id);
            }
        }
    }
}
