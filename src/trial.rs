use crate::types::TrialState;

/// One evaluation run within a study, as seen by the dashboard.
///
/// `values` holds one entry per objective once the trial has been
/// evaluated. Infinite results are kept as `f64::INFINITY` and
/// `f64::NEG_INFINITY`; the panel filters drop them.
#[derive(Clone, Debug, PartialEq)]
pub struct Trial {
    /// Trial number, unique within the study and assigned in ascending order.
    pub number: u64,
    /// Lifecycle state.
    pub state: TrialState,
    /// Objective values, absent until the trial has been evaluated.
    pub values: Option<Vec<f64>>,
    /// Parameter values as raw strings, in the order the service reported them.
    pub params: Vec<TrialParam>,
}

/// A parameter value of a trial, kept in its raw string form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialParam {
    /// Parameter name.
    pub name: String,
    /// Raw value as reported by the service.
    pub value: String,
}

impl TrialParam {
    /// Creates a parameter entry.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Trial {
    /// Creates a trial without values or parameters.
    #[must_use]
    pub fn new(number: u64, state: TrialState) -> Self {
        Self {
            number,
            state,
            values: None,
            params: Vec::new(),
        }
    }

    /// Sets the objective values.
    #[must_use]
    pub fn with_values(mut self, values: Vec<f64>) -> Self {
        self.values = Some(values);
        self
    }

    /// Appends a parameter value.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(TrialParam::new(name, value));
        self
    }

    /// Returns the raw value of the parameter called `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Returns the value of objective `index`, if evaluated.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.as_ref().and_then(|v| v.get(index).copied())
    }

    /// Returns `true` once the trial's state can no longer change.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_lookup_by_name() {
        let trial = Trial::new(3, TrialState::Complete)
            .with_param("lr", "0.01")
            .with_param("optimizer", "adam");
        assert_eq!(trial.param("optimizer"), Some("adam"));
        assert_eq!(trial.param("momentum"), None);
    }

    #[test]
    fn value_out_of_range() {
        let trial = Trial::new(0, TrialState::Complete).with_values(vec![1.0]);
        assert_eq!(trial.value(0), Some(1.0));
        assert_eq!(trial.value(1), None);
        assert_eq!(Trial::new(1, TrialState::Running).value(0), None);
    }
}
