//! Incremental merge of a cached trial sequence with a service fragment.

use crate::trial::Trial;

/// Number of leading trials that can no longer change.
///
/// This is the index of the first `Running` or `Waiting` trial, or the
/// whole length when every trial is finished.
#[must_use]
pub fn fixed_count(trials: &[Trial]) -> usize {
    trials
        .iter()
        .position(|t| !t.is_finished())
        .unwrap_or(trials.len())
}

/// Concatenate the finalized prefix `cached[..fixed]` with `fetched`.
///
/// `fetched` is expected to start at index `fixed` of the service's trial
/// sequence. The concatenation is positional; trial numbers are not
/// re-checked.
#[must_use]
pub fn merge_trials(cached: &[Trial], fixed: usize, fetched: Vec<Trial>) -> Vec<Trial> {
    let prefix = &cached[..fixed.min(cached.len())];
    let mut merged = Vec::with_capacity(prefix.len() + fetched.len());
    merged.extend_from_slice(prefix);
    merged.extend(fetched);
    merged
}
