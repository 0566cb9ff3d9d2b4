use crate::study::Note;

/// Errors produced by the study cache, its collaborators, and the panel
/// transforms.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the study service could not be reached or the
    /// exchange broke off before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// Returned when a service payload or a persisted record does not
    /// match the expected schema.
    #[error("decode error: {0}")]
    Decode(String),

    /// Returned when the study service answered with an error response.
    #[error("service error (status {status}){}", reason_suffix(.reason.as_deref()))]
    Service {
        /// The status code of the response.
        status: u16,
        /// The reason string carried by the response body, if any.
        reason: Option<String>,
    },

    /// Returned when a note was modified concurrently on the service side.
    ///
    /// `current` is the service's authoritative note, which has already
    /// been applied to the cache by the time the caller sees this error.
    #[error("note conflict{}", reason_suffix(.reason.as_deref()))]
    NoteConflict {
        /// The note currently held by the service.
        current: Note,
        /// The reason string carried by the response body, if any.
        reason: Option<String>,
    },

    /// Returned when the client-local key-value store fails.
    #[error("store error: {0}")]
    Store(String),

    /// Returned when an operation needs a cached study that is not present.
    #[error("study {0} is not cached")]
    UnknownStudy(u64),

    /// Returned when a study is created without any objective direction.
    #[error("a study needs at least one direction")]
    EmptyDirections,

    /// Returned when objective names do not line up with the directions.
    #[error("objective names mismatch: study has {expected} objectives, got {got} names")]
    ObjectiveNamesLength {
        /// The number of objectives of the study.
        expected: usize,
        /// The number of names supplied.
        got: usize,
    },

    /// Returned when a panel asks for an objective the study does not have.
    #[error("objective index {index} out of range for {n_objectives} objectives")]
    ObjectiveOutOfRange {
        /// The requested objective index.
        index: usize,
        /// The number of objectives of the study.
        n_objectives: usize,
    },
}

impl Error {
    /// Return the reason string a service attached to this error, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Service { reason, .. } | Self::NoteConflict { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }
}

fn reason_suffix(reason: Option<&str>) -> String {
    reason.map_or_else(String::new, |r| format!(": {r}"))
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_display_includes_reason() {
        let err = Error::Service {
            status: 404,
            reason: Some("study not found".to_string()),
        };
        assert_eq!(err.to_string(), "service error (status 404): study not found");
        assert_eq!(err.reason(), Some("study not found"));
    }

    #[test]
    fn transport_error_has_no_reason() {
        let err = Error::Transport("connection refused".to_string());
        assert!(err.reason().is_none());
    }
}
