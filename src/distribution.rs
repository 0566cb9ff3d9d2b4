//! Parameter distribution descriptors and the union search space.

use serde::{Deserialize, Serialize};

/// Distribution descriptor of a parameter, as reported by the study service.
///
/// The legacy descriptor names carry their scale in the name; the unified
/// `Float`/`Int` descriptors carry an explicit `log` flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distribution {
    /// Uniform floating-point distribution.
    Uniform,
    /// Log-uniform floating-point distribution.
    LogUniform,
    /// Uniform floating-point distribution with a step.
    DiscreteUniform,
    /// Uniform integer distribution.
    IntUniform,
    /// Log-uniform integer distribution.
    IntLogUniform,
    /// Categorical distribution.
    Categorical,
    /// Floating-point distribution.
    Float {
        /// Whether the distribution is sampled in log space.
        log: bool,
    },
    /// Integer distribution.
    Int {
        /// Whether the distribution is sampled in log space.
        log: bool,
    },
}

impl Distribution {
    /// Returns `true` if values are log-uniformly distributed.
    #[must_use]
    pub fn is_log(&self) -> bool {
        match self {
            Self::LogUniform | Self::IntLogUniform => true,
            Self::Float { log } | Self::Int { log } => *log,
            Self::Uniform | Self::DiscreteUniform | Self::IntUniform | Self::Categorical => false,
        }
    }

    /// Parse a descriptor name as sent on the wire.
    ///
    /// Returns `None` for unknown names.
    #[must_use]
    pub fn from_wire_name(name: &str, log: bool) -> Option<Self> {
        Some(match name {
            "UniformDistribution" => Self::Uniform,
            "LogUniformDistribution" => Self::LogUniform,
            "DiscreteUniformDistribution" => Self::DiscreteUniform,
            "IntUniformDistribution" => Self::IntUniform,
            "IntLogUniformDistribution" => Self::IntLogUniform,
            "CategoricalDistribution" => Self::Categorical,
            "FloatDistribution" => Self::Float { log },
            "IntDistribution" => Self::Int { log },
            _ => return None,
        })
    }
}

/// One entry of a study's union search space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpaceEntry {
    /// Parameter name, unique within the search space.
    pub name: String,
    /// The parameter's distribution descriptor.
    pub distribution: Distribution,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_flags() {
        assert!(Distribution::LogUniform.is_log());
        assert!(Distribution::IntLogUniform.is_log());
        assert!(Distribution::Float { log: true }.is_log());
        assert!(!Distribution::Int { log: false }.is_log());
        assert!(!Distribution::Categorical.is_log());
        assert!(!Distribution::DiscreteUniform.is_log());
    }

    #[test]
    fn wire_names() {
        assert_eq!(
            Distribution::from_wire_name("IntLogUniformDistribution", false),
            Some(Distribution::IntLogUniform)
        );
        assert_eq!(
            Distribution::from_wire_name("FloatDistribution", true),
            Some(Distribution::Float { log: true })
        );
        assert_eq!(Distribution::from_wire_name("Bogus", false), None);
    }
}
