//! JSON payloads of the study service and their validation.
//!
//! The service speaks loosely-typed JSON: objective values arrive either as
//! numbers or as the strings `"inf"`/`"-inf"`, parameters as name/value
//! pairs with the value already rendered to a string, and error bodies as
//! `{"reason": ...}`. The `Wire*` structs mirror those shapes; the
//! `decode_*` functions convert them into the crate's domain types and
//! reject payloads that break the model's invariants.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::distribution::{Distribution, SearchSpaceEntry};
use crate::error::{Error, Result};
use crate::study::{Note, StudyDetail, StudySummary, default_objective_names};
use crate::trial::{Trial, TrialParam};
use crate::types::{Direction, TrialState};

/// HTTP-style status code the service uses for note conflicts.
pub const STATUS_CONFLICT: u16 = 409;

/// An objective value: a JSON number or an infinity sentinel string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    /// A finite number.
    Number(f64),
    /// `"inf"` or `"-inf"`.
    Sentinel(String),
}

impl WireValue {
    fn to_f64(&self) -> Result<f64> {
        match self {
            Self::Number(v) => Ok(*v),
            Self::Sentinel(s) if s == "inf" => Ok(f64::INFINITY),
            Self::Sentinel(s) if s == "-inf" => Ok(f64::NEG_INFINITY),
            Self::Sentinel(s) => Err(Error::Decode(format!("invalid objective value {s:?}"))),
        }
    }
}

impl From<f64> for WireValue {
    fn from(v: f64) -> Self {
        if v == f64::INFINITY {
            Self::Sentinel("inf".to_string())
        } else if v == f64::NEG_INFINITY {
            Self::Sentinel("-inf".to_string())
        } else {
            Self::Number(v)
        }
    }
}

/// A parameter as sent by the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireParam {
    /// Parameter name.
    pub name: String,
    /// Rendered parameter value.
    pub value: String,
}

/// A trial as sent by the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireTrial {
    /// Trial number.
    pub number: u64,
    /// Trial state.
    pub state: TrialState,
    /// Objective values, absent before evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<WireValue>>,
    /// Parameters.
    #[serde(default)]
    pub params: Vec<WireParam>,
}

/// A distribution descriptor: a bare name or `{"type": ..., "log": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireDistribution {
    /// Legacy descriptor name such as `"LogUniformDistribution"`.
    Name(String),
    /// Unified descriptor with an explicit log flag.
    Typed {
        /// Descriptor name such as `"FloatDistribution"`.
        #[serde(rename = "type")]
        kind: String,
        /// Whether the distribution is log-scaled.
        #[serde(default)]
        log: bool,
    },
}

/// A union search space entry as sent by the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSearchSpaceEntry {
    /// Parameter name.
    pub name: String,
    /// Distribution descriptor.
    pub distribution: WireDistribution,
}

/// A study detail fragment as sent by the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireStudyDetail {
    /// Study name.
    pub name: String,
    /// Objective directions.
    pub directions: Vec<Direction>,
    /// Trials from the requested offset onward.
    #[serde(default)]
    pub trials: Vec<WireTrial>,
    /// Union search space.
    #[serde(default)]
    pub union_search_space: Vec<WireSearchSpaceEntry>,
    /// Study note.
    #[serde(default)]
    pub note: Note,
}

/// A study summary as sent by the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStudySummary {
    /// Study identifier.
    pub study_id: u64,
    /// Study name.
    pub study_name: String,
    /// Objective directions.
    pub directions: Vec<Direction>,
}

/// Response body of the study list endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStudySummaries {
    /// Studies.
    pub study_summaries: Vec<WireStudySummary>,
}

/// Error response body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    /// Human-readable reason.
    #[serde(default)]
    pub reason: Option<String>,
    /// Current note, present on note conflicts.
    #[serde(default)]
    pub note: Option<Note>,
}

impl TryFrom<WireTrial> for Trial {
    type Error = Error;

    fn try_from(wire: WireTrial) -> Result<Self> {
        {
            let mut seen = HashSet::with_capacity(wire.params.len());
            for p in &wire.params {
                if !seen.insert(p.name.as_str()) {
                    return Err(Error::Decode(format!(
                        "trial {} repeats parameter {:?}",
                        wire.number, p.name
                    )));
                }
            }
        }
        let values = wire
            .values
            .map(|vs| vs.iter().map(WireValue::to_f64).collect::<Result<Vec<_>>>())
            .transpose()?;
        Ok(Self {
            number: wire.number,
            state: wire.state,
            values,
            params: wire
                .params
                .into_iter()
                .map(|p| TrialParam {
                    name: p.name,
                    value: p.value,
                })
                .collect(),
        })
    }
}

impl From<&Trial> for WireTrial {
    fn from(trial: &Trial) -> Self {
        Self {
            number: trial.number,
            state: trial.state,
            values: trial
                .values
                .as_ref()
                .map(|vs| vs.iter().copied().map(WireValue::from).collect()),
            params: trial
                .params
                .iter()
                .map(|p| WireParam {
                    name: p.name.clone(),
                    value: p.value.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<WireSearchSpaceEntry> for SearchSpaceEntry {
    type Error = Error;

    fn try_from(wire: WireSearchSpaceEntry) -> Result<Self> {
        let (kind, log) = match &wire.distribution {
            WireDistribution::Name(name) => (name.as_str(), false),
            WireDistribution::Typed { kind, log } => (kind.as_str(), *log),
        };
        let distribution = Distribution::from_wire_name(kind, log)
            .ok_or_else(|| Error::Decode(format!("unknown distribution {kind:?}")))?;
        Ok(Self {
            name: wire.name,
            distribution,
        })
    }
}

impl From<WireStudySummary> for StudySummary {
    fn from(wire: WireStudySummary) -> Self {
        Self {
            study_id: wire.study_id,
            name: wire.study_name,
            directions: wire.directions,
        }
    }
}

/// Convert a decoded detail fragment into a [`StudyDetail`].
///
/// Trials must be strictly ascending by number; search space names must be
/// unique. Objective names are initialised to their defaults.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the fragment violates the model.
pub fn detail_from_wire(study_id: u64, wire: WireStudyDetail) -> Result<StudyDetail> {
    if wire.directions.is_empty() {
        return Err(Error::Decode(format!("study {study_id} has no directions")));
    }
    let trials = wire
        .trials
        .into_iter()
        .map(Trial::try_from)
        .collect::<Result<Vec<_>>>()?;
    if let Some(pair) = trials.windows(2).find(|w| w[0].number >= w[1].number) {
        return Err(Error::Decode(format!(
            "trial numbers not ascending: {} then {}",
            pair[0].number, pair[1].number
        )));
    }

    let mut names = HashSet::new();
    let mut union_search_space = Vec::with_capacity(wire.union_search_space.len());
    for entry in wire.union_search_space {
        if !names.insert(entry.name.clone()) {
            return Err(Error::Decode(format!(
                "search space repeats parameter {:?}",
                entry.name
            )));
        }
        union_search_space.push(SearchSpaceEntry::try_from(entry)?);
    }

    Ok(StudyDetail {
        study_id,
        name: wire.name,
        objective_names: default_objective_names(wire.directions.len()),
        directions: wire.directions,
        trials,
        union_search_space,
        note: wire.note,
    })
}

/// Decode a study detail response body.
///
/// # Errors
///
/// Returns [`Error::Decode`] on malformed JSON or an invalid fragment.
pub fn decode_study_detail(study_id: u64, body: &[u8]) -> Result<StudyDetail> {
    let wire: WireStudyDetail =
        serde_json::from_slice(body).map_err(|e| Error::Decode(format!("study detail: {e}")))?;
    detail_from_wire(study_id, wire)
}

/// Decode a study list response body.
///
/// # Errors
///
/// Returns [`Error::Decode`] on malformed JSON.
pub fn decode_study_summaries(body: &[u8]) -> Result<Vec<StudySummary>> {
    let wire: WireStudySummaries = serde_json::from_slice(body)
        .map_err(|e| Error::Decode(format!("study summaries: {e}")))?;
    Ok(wire
        .study_summaries
        .into_iter()
        .map(StudySummary::from)
        .collect())
}

/// Decode a study summary response body, as returned on study creation.
///
/// # Errors
///
/// Returns [`Error::Decode`] on malformed JSON.
pub fn decode_study_summary(body: &[u8]) -> Result<StudySummary> {
    let wire: WireStudySummary = serde_json::from_slice(body)
        .map_err(|e| Error::Decode(format!("study summary: {e}")))?;
    Ok(wire.into())
}

/// Turn an error response into an [`Error`].
///
/// A conflict status carrying a note becomes [`Error::NoteConflict`];
/// everything else becomes [`Error::Service`]. Bodies that are not JSON are
/// treated as carrying no reason.
#[must_use]
pub fn decode_error(status: u16, body: &[u8]) -> Error {
    let wire: WireError = serde_json::from_slice(body).unwrap_or_default();
    match (status, wire.note) {
        (STATUS_CONFLICT, Some(current)) => Error::NoteConflict {
            current,
            reason: wire.reason,
        },
        _ => Error::Service {
            status,
            reason: wire.reason,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_with_sentinels() {
        let wire: WireTrial = serde_json::from_str(
            r#"{"number":0,"state":"Complete","values":[1.5,"inf","-inf"],"params":[]}"#,
        )
        .unwrap();
        let trial = Trial::try_from(wire).unwrap();
        let values = trial.values.unwrap();
        assert_eq!(values[0], 1.5);
        assert_eq!(values[1], f64::INFINITY);
        assert_eq!(values[2], f64::NEG_INFINITY);
    }

    #[test]
    fn test_bad_sentinel_rejected() {
        let wire: WireTrial =
            serde_json::from_str(r#"{"number":0,"state":"Complete","values":["big"]}"#).unwrap();
        assert!(matches!(Trial::try_from(wire), Err(Error::Decode(_))));
    }

    #[test]
    fn test_duplicate_param_rejected() {
        let wire: WireTrial = serde_json::from_str(
            r#"{"number":4,"state":"Running","params":[{"name":"x","value":"1"},{"name":"x","value":"2"}]}"#,
        )
        .unwrap();
        assert!(matches!(Trial::try_from(wire), Err(Error::Decode(_))));
    }

    #[test]
    fn test_sentinels_round_trip_through_wire_value() {
        assert_eq!(WireValue::from(f64::INFINITY), WireValue::Sentinel("inf".into()));
        assert_eq!(WireValue::from(2.0), WireValue::Number(2.0));
    }

    #[test]
    fn test_conflict_error() {
        let err = decode_error(409, br#"{"reason":"stale","note":{"version":3,"body":"hi"}}"#);
        match err {
            Error::NoteConflict { current, reason } => {
                assert_eq!(current, Note::new(3, "hi"));
                assert_eq!(reason.as_deref(), Some("stale"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_error_without_json_body() {
        let err = decode_error(500, b"Internal Server Error");
        assert!(matches!(
            err,
            Error::Service {
                status: 500,
                reason: None
            }
        ));
    }
}
