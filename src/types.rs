//! Core enums shared across the crate.

use serde::{Deserialize, Serialize};

/// The direction of an objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Lower objective values are better.
    Minimize,
    /// Higher objective values are better.
    Maximize,
}

impl Direction {
    /// Map `value` into minimize-orientation.
    #[must_use]
    pub fn normalize(self, value: f64) -> f64 {
        match self {
            Self::Minimize => value,
            Self::Maximize => -value,
        }
    }
}

/// The state of a trial in its lifecycle.
///
/// A trial only moves from `Running`/`Waiting` to one of the finished
/// states and never back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrialState {
    /// The trial is being evaluated.
    Running,
    /// The trial is queued and has not started yet.
    Waiting,
    /// The trial finished with objective values.
    Complete,
    /// The trial was stopped early.
    Pruned,
    /// The trial failed.
    Fail,
}

impl TrialState {
    /// Returns `true` once the trial can no longer change.
    #[must_use]
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Running | Self::Waiting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_states() {
        assert!(!TrialState::Running.is_finished());
        assert!(!TrialState::Waiting.is_finished());
        assert!(TrialState::Complete.is_finished());
        assert!(TrialState::Pruned.is_finished());
        assert!(TrialState::Fail.is_finished());
    }

    #[test]
    fn direction_wire_names() {
        let dirs: Vec<Direction> = serde_json::from_str(r#"["minimize","maximize"]"#).unwrap();
        assert_eq!(dirs, vec![Direction::Minimize, Direction::Maximize]);
        assert_eq!(Direction::Maximize.normalize(2.5), -2.5);
        assert_eq!(Direction::Minimize.normalize(2.5), 2.5);
    }
}
