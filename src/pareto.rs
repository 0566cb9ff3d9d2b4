//! Pareto-front classification for the objective-vs-objective panel.
//!
//! Every eligible trial (see [`front_filter`](crate::filter::front_filter))
//! is labelled either [`ParetoClass::Optimal`] or [`ParetoClass::Dominated`].
//! Trials that fail the filter do not appear in the result at all.
//!
//! Dominance here is the **weak** rule: trial `i` is dominated when some
//! other trial `j` is at least as good in every objective. Two trials with
//! identical objective vectors therefore dominate each other and both end
//! up `Dominated`.
//!
//! # Example
//!
//! ```
//! use trialview::pareto::{ParetoClass, classify};
//! use trialview::{Direction, Trial, TrialState};
//!
//! let trials = vec![
//!     Trial::new(0, TrialState::Complete).with_values(vec![1.0, 2.0]),
//!     Trial::new(1, TrialState::Complete).with_values(vec![2.0, 1.0]),
//!     Trial::new(2, TrialState::Complete).with_values(vec![1.0, 1.0]),
//! ];
//! let dirs = [Direction::Minimize, Direction::Minimize];
//!
//! let classes: Vec<_> = classify(&trials, &dirs).into_iter().map(|(_, c)| c).collect();
//! assert_eq!(
//!     classes,
//!     vec![ParetoClass::Dominated, ParetoClass::Dominated, ParetoClass::Optimal]
//! );
//! ```

use serde::Serialize;

use crate::error::{Error, Result};
use crate::filter::front_filter;
use crate::series::{Axis, ScatterSeries};
use crate::study::StudyDetail;
use crate::trial::Trial;
use crate::types::Direction;

/// Pareto label of a trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParetoClass {
    /// Some other trial is at least as good in every objective.
    Dominated,
    /// No other trial is at least as good in every objective.
    Optimal,
}

/// Returns `true` if `a` is at least as good as `b` in every objective.
///
/// Both vectors must already be in minimize-space.
pub(crate) fn weakly_dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).all(|(&av, &bv)| av <= bv)
}

/// Map objective values into minimize-space (negate maximized objectives).
pub(crate) fn normalize(values: &[f64], directions: &[Direction]) -> Vec<f64> {
    values
        .iter()
        .zip(directions)
        .map(|(&v, dir)| dir.normalize(v))
        .collect()
}

/// Classify the eligible trials of `trials`.
///
/// Returns one entry per trial that passes the front filter, in input
/// order. Complexity: O(M × N²) for M objectives and N eligible trials.
#[must_use]
pub fn classify<'a>(
    trials: &'a [Trial],
    directions: &[Direction],
) -> Vec<(&'a Trial, ParetoClass)> {
    let eligible: Vec<&Trial> = trials
        .iter()
        .filter(|t| front_filter(t, directions))
        .collect();

    let normalized: Vec<Vec<f64>> = eligible
        .iter()
        .map(|t| normalize(t.values.as_deref().unwrap_or_default(), directions))
        .collect();

    eligible
        .iter()
        .enumerate()
        .map(|(i, &trial)| {
            let dominated = normalized
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && weakly_dominates(other, &normalized[i]));
            let class = if dominated {
                ParetoClass::Dominated
            } else {
                ParetoClass::Optimal
            };
            (trial, class)
        })
        .collect()
}

/// Trial numbers of the Pareto-optimal trials, in input order.
#[must_use]
pub fn pareto_front_numbers(trials: &[Trial], directions: &[Direction]) -> Vec<u64> {
    classify(trials, directions)
        .into_iter()
        .filter(|(_, class)| *class == ParetoClass::Optimal)
        .map(|(t, _)| t.number)
        .collect()
}

/// Scatter of two objectives with a Pareto label per point.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrontSeries {
    /// Point coordinates and axes.
    pub series: ScatterSeries,
    /// Pareto label of each point, parallel to `series.x`.
    pub classes: Vec<ParetoClass>,
}

/// Build the front panel's series for objectives `x_objective` and
/// `y_objective` of `study`.
///
/// An empty series is returned when no trial is eligible.
///
/// # Errors
///
/// Returns [`Error::ObjectiveOutOfRange`] if either objective index is not
/// an objective of the study.
pub fn front_series(
    study: &StudyDetail,
    x_objective: usize,
    y_objective: usize,
) -> Result<FrontSeries> {
    let n_objectives = study.n_objectives();
    for index in [x_objective, y_objective] {
        if index >= n_objectives {
            return Err(Error::ObjectiveOutOfRange {
                index,
                n_objectives,
            });
        }
    }

    let title = |i: usize| {
        study
            .objective_names
            .get(i)
            .cloned()
            .unwrap_or_else(|| i.to_string())
    };

    let classified = classify(&study.trials, &study.directions);
    let mut front = FrontSeries {
        series: ScatterSeries {
            x_axis: Axis::numeric(title(x_objective)),
            y_axis: Axis::numeric(title(y_objective)),
            ..ScatterSeries::default()
        },
        classes: Vec::with_capacity(classified.len()),
    };
    for (trial, class) in classified {
        // Eligible trials carry exactly one value per objective.
        let (Some(x), Some(y)) = (trial.value(x_objective), trial.value(y_objective)) else {
            continue;
        };
        front.series.x.push(x);
        front.series.y.push(y);
        front.series.trial_numbers.push(trial.number);
        front.classes.push(class);
    }
    Ok(front)
}
