//! Trial eligibility predicates for the two dashboard panels.

use crate::trial::Trial;
use crate::types::{Direction, TrialState};

/// Returns `true` if `trial` can be placed on the Pareto-front panel.
///
/// The trial must be complete, carry exactly one value per objective, and
/// none of those values may be infinite.
#[must_use]
pub fn front_filter(trial: &Trial, directions: &[Direction]) -> bool {
    if trial.state != TrialState::Complete {
        return false;
    }
    let Some(values) = &trial.values else {
        return false;
    };
    values.len() == directions.len() && values.iter().all(|v| !v.is_infinite())
}

/// Returns `true` if `trial` can be placed on the slice panel for the
/// given objective and parameter.
///
/// Pruned trials are kept: their last reported values still say something
/// about the parameter.
#[must_use]
pub fn slice_filter(trial: &Trial, objective: usize, param: &str) -> bool {
    if !matches!(trial.state, TrialState::Complete | TrialState::Pruned) {
        return false;
    }
    if trial.param(param).is_none() {
        return false;
    }
    trial.value(objective).is_some_and(|v| !v.is_infinite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_MIN: [Direction; 2] = [Direction::Minimize, Direction::Minimize];

    #[test]
    fn front_requires_complete() {
        let running = Trial::new(0, TrialState::Running).with_values(vec![1.0, 2.0]);
        let pruned = Trial::new(1, TrialState::Pruned).with_values(vec![1.0, 2.0]);
        let complete = Trial::new(2, TrialState::Complete).with_values(vec![1.0, 2.0]);
        assert!(!front_filter(&running, &TWO_MIN));
        assert!(!front_filter(&pruned, &TWO_MIN));
        assert!(front_filter(&complete, &TWO_MIN));
    }

    #[test]
    fn front_rejects_length_mismatch_and_infinities() {
        let short = Trial::new(0, TrialState::Complete).with_values(vec![1.0]);
        let inf = Trial::new(1, TrialState::Complete).with_values(vec![1.0, f64::INFINITY]);
        let neg_inf = Trial::new(2, TrialState::Complete).with_values(vec![f64::NEG_INFINITY, 0.0]);
        let missing = Trial::new(3, TrialState::Complete);
        assert!(!front_filter(&short, &TWO_MIN));
        assert!(!front_filter(&inf, &TWO_MIN));
        assert!(!front_filter(&neg_inf, &TWO_MIN));
        assert!(!front_filter(&missing, &TWO_MIN));
    }

    #[test]
    fn slice_accepts_pruned_with_param() {
        let trial = Trial::new(0, TrialState::Pruned)
            .with_values(vec![0.5])
            .with_param("x", "1.0");
        assert!(slice_filter(&trial, 0, "x"));
        assert!(!slice_filter(&trial, 0, "y"));
        assert!(!slice_filter(&trial, 1, "x"));
    }

    #[test]
    fn slice_checks_only_selected_objective_for_infinity() {
        let trial = Trial::new(0, TrialState::Complete)
            .with_values(vec![f64::INFINITY, 2.0])
            .with_param("x", "a");
        assert!(!slice_filter(&trial, 0, "x"));
        assert!(slice_filter(&trial, 1, "x"));
    }

    #[test]
    fn slice_rejects_failed_and_waiting() {
        for state in [TrialState::Fail, TrialState::Waiting, TrialState::Running] {
            let trial = Trial::new(0, state)
                .with_values(vec![1.0])
                .with_param("x", "1");
            assert!(!slice_filter(&trial, 0, "x"));
        }
    }
}
