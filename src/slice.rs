//! Parameter-vs-objective ("slice") series.
//!
//! [`transform`] turns a study's trials into scatter coordinates for one
//! parameter against one objective. The x axis is numeric when every raw
//! parameter value parses as a number and categorical otherwise; a
//! categorical axis encodes each value as its index in a first-occurrence
//! vocabulary.

use serde::Serialize;

use crate::distribution::SearchSpaceEntry;
use crate::filter::slice_filter;
use crate::series::{Axis, AxisKind, AxisScale, ScatterSeries};
use crate::study::StudyDetail;
use crate::trial::Trial;

/// Title of the slice panel's y axis.
pub const OBJECTIVE_AXIS_TITLE: &str = "Objective Value";

/// User selections of the slice panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SliceOptions {
    /// Objective shown on the y axis.
    pub objective: usize,
    /// Parameter shown on the x axis.
    pub param: Option<String>,
    /// Whether the y axis uses a log scale.
    pub log_y: bool,
}

impl SliceOptions {
    /// Options for `param` against objective 0 on a linear y axis.
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            objective: 0,
            param: Some(param.into()),
            log_y: false,
        }
    }

    /// Selects the objective.
    #[must_use]
    pub fn objective(mut self, objective: usize) -> Self {
        self.objective = objective;
        self
    }

    /// Toggles the y log scale.
    #[must_use]
    pub fn log_y(mut self, log_y: bool) -> Self {
        self.log_y = log_y;
        self
    }
}

/// Output of the slice transform.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SliceSeries {
    /// Coordinates; x holds parameter values or category indices.
    pub series: ScatterSeries,
}

impl SliceSeries {
    /// Returns `true` if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Returns `true` if the x axis is categorical.
    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(self.series.x_axis.kind, AxisKind::Categorical { .. })
    }
}

/// Parameter the slice panel selects before the user picks one: the first
/// entry of the union search space.
#[must_use]
pub fn default_param(study: &StudyDetail) -> Option<&str> {
    study.union_search_space.first().map(|e| e.name.as_str())
}

/// Build the slice series of `study` for the given selections.
///
/// The parameter's distribution descriptor decides whether the x axis is
/// log-scaled; a categorical axis is always linear.
#[must_use]
pub fn slice_series(study: &StudyDetail, options: &SliceOptions) -> SliceSeries {
    let entry = options
        .param
        .as_deref()
        .and_then(|name| study.search_space_entry(name));
    transform(
        &study.trials,
        options.objective,
        options.param.as_deref(),
        entry,
        options.log_y,
    )
}

/// Build a slice series from raw trials.
///
/// Returns an empty (but renderable) series when no parameter is selected or
/// no trial passes the slice filter.
#[must_use]
pub fn transform(
    trials: &[Trial],
    objective: usize,
    param: Option<&str>,
    entry: Option<&SearchSpaceEntry>,
    log_y: bool,
) -> SliceSeries {
    let log_x = entry.is_some_and(|e| e.distribution.is_log());
    let x_axis = Axis::numeric(param.unwrap_or_default()).with_scale(AxisScale::from_log(log_x));
    let y_axis = Axis::numeric(OBJECTIVE_AXIS_TITLE).with_scale(AxisScale::from_log(log_y));

    let empty = || SliceSeries {
        series: ScatterSeries {
            x_axis: x_axis.clone(),
            y_axis: y_axis.clone(),
            ..ScatterSeries::default()
        },
    };

    let Some(param) = param else {
        return empty();
    };

    let mut y = Vec::new();
    let mut raw = Vec::new();
    let mut trial_numbers = Vec::new();
    for trial in trials.iter().filter(|t| slice_filter(t, objective, param)) {
        // The filter guarantees both lookups succeed.
        let (Some(value), Some(raw_param)) = (trial.value(objective), trial.param(param)) else {
            continue;
        };
        y.push(value);
        raw.push(raw_param);
        trial_numbers.push(trial.number);
    }
    if y.is_empty() {
        return empty();
    }

    let numeric: Option<Vec<f64>> = raw.iter().map(|v| parse_number(v)).collect();
    let (x, x_axis) = match numeric {
        Some(x) => (x, x_axis),
        None => {
            let (x, labels) = encode_categories(&raw);
            #[allow(clippy::cast_precision_loss)]
            let values = (0..labels.len()).map(|i| i as f64).collect();
            let axis = Axis {
                kind: AxisKind::Categorical { values, labels },
                scale: AxisScale::Linear,
                ..x_axis
            };
            (x, axis)
        }
    };

    trace_debug!(param, objective, points = x.len(), "slice series built");

    SliceSeries {
        series: ScatterSeries {
            x,
            y,
            trial_numbers,
            x_axis,
            y_axis,
        },
    }
}

/// Parse a raw parameter value as a number.
///
/// Surrounding whitespace is ignored. Empty strings, NaN, and infinities
/// are not numbers.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Encode `raw` as indices into its first-occurrence vocabulary.
#[allow(clippy::cast_precision_loss)]
fn encode_categories(raw: &[&str]) -> (Vec<f64>, Vec<String>) {
    let mut vocabulary: Vec<String> = Vec::new();
    let indices = raw
        .iter()
        .map(|&value| {
            let index = vocabulary
                .iter()
                .position(|v| v == value)
                .unwrap_or_else(|| {
                    vocabulary.push(value.to_string());
                    vocabulary.len() - 1
                });
            index as f64
        })
        .collect();
    (indices, vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Distribution;
    use crate::types::TrialState;

    fn trials_with(values: &[&str]) -> Vec<Trial> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                #[allow(clippy::cast_precision_loss)]
                let objective = i as f64;
                Trial::new(i as u64, TrialState::Complete)
                    .with_values(vec![objective])
                    .with_param("p", *v)
            })
            .collect()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("2.5"), Some(2.5));
        assert_eq!(parse_number(" 3 "), Some(3.0));
        assert_eq!(parse_number("1e-3"), Some(0.001));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("adam"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-Infinity"), None);
        assert_eq!(parse_number("+INF"), None);
    }

    #[test]
    fn test_numeric_axis() {
        let trials = trials_with(&["1", "2.5", "3"]);
        let out = transform(&trials, 0, Some("p"), None, false);
        assert!(!out.is_categorical());
        assert_eq!(out.series.x, vec![1.0, 2.5, 3.0]);
        assert_eq!(out.series.y, vec![0.0, 1.0, 2.0]);
        assert!(out.series.x_axis.tick_labels().is_none());
    }

    #[test]
    fn test_categorical_axis_first_seen_order() {
        let trials = trials_with(&["a", "b", "a", "c"]);
        let out = transform(&trials, 0, Some("p"), None, false);
        assert_eq!(out.series.x, vec![0.0, 1.0, 0.0, 2.0]);
        match &out.series.x_axis.kind {
            AxisKind::Categorical { values, labels } => {
                assert_eq!(values, &vec![0.0, 1.0, 2.0]);
                assert_eq!(labels, &vec!["a", "b", "c"]);
            }
            AxisKind::Numeric => panic!("expected categorical axis"),
        }
    }

    #[test]
    fn test_mixed_values_are_categorical() {
        let trials = trials_with(&["1", "two", "3"]);
        let out = transform(&trials, 0, Some("p"), None, false);
        assert!(out.is_categorical());
        assert_eq!(out.series.x, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_log_x_from_distribution() {
        let entry = SearchSpaceEntry {
            name: "p".to_string(),
            distribution: Distribution::IntLogUniform,
        };
        let numeric = transform(&trials_with(&["1", "10"]), 0, Some("p"), Some(&entry), true);
        assert_eq!(numeric.series.x_axis.scale, AxisScale::Log);
        assert_eq!(numeric.series.y_axis.scale, AxisScale::Log);

        let categorical = transform(&trials_with(&["x", "y"]), 0, Some("p"), Some(&entry), false);
        assert_eq!(categorical.series.x_axis.scale, AxisScale::Linear);
    }

    #[test]
    fn test_no_param_selected_is_empty() {
        let trials = trials_with(&["1"]);
        let out = transform(&trials, 0, None, None, false);
        assert!(out.is_empty());
    }

    #[test]
    fn test_labels_are_trial_numbers() {
        let mut trials = trials_with(&["1", "2"]);
        trials[0].number = 7;
        let out = transform(&trials, 0, Some("p"), None, false);
        assert_eq!(out.series.trial_numbers, vec![7, 1]);
        assert_eq!(out.series.label(0).as_deref(), Some("Trial (number=7)"));
    }
}
