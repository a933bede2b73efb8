//! Error type shared by every stage of the engine.
//!
//! Configuration problems are reported before any trial starts. Local
//! infeasibility during a matching round is not an error: the affected
//! agents are reported as unmatched instead.

use thiserror::Error;

/// Errors raised by the allocation engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Preference weights do not sum to 1.
    #[error("preference weights must sum to 1, got {sum}")]
    InvalidWeights { sum: f64 },

    /// A weight or agent refers to a dimension with no declared alphabet.
    #[error("dimension '{dimension}' has no declared alphabet")]
    UnknownDimension { dimension: String },

    /// An agent lacks a code for a weighted dimension.
    #[error("agent '{agent}' has no code for dimension '{dimension}'")]
    MissingPreference { agent: String, dimension: String },

    /// An agent's code is not part of the dimension's alphabet.
    #[error("agent '{agent}' has code {code} outside the alphabet of dimension '{dimension}'")]
    CodeOutOfAlphabet {
        agent: String,
        dimension: String,
        code: u32,
    },

    /// An agent is not eligible for any declared pool.
    #[error("agent '{agent}' is not eligible for any declared pool")]
    NoEligiblePool { agent: String },

    /// A population has nothing to allocate.
    #[error("population '{population}' is empty")]
    EmptyPopulation { population: String },

    /// Every accessibility agent needs a group of its own.
    #[error(
        "population '{population}' has {agents} accessibility agents but only {groups} groups"
    )]
    TooManyAccessibilityAgents {
        population: String,
        agents: usize,
        groups: usize,
    },

    /// Pools cannot host every group.
    #[error("pools provide {available} group places but {required} groups need one")]
    InsufficientPoolCapacity { required: usize, available: usize },

    /// Pools cannot host every accessibility group.
    #[error(
        "pools provide {available} accessibility places but {required} accessibility groups need one"
    )]
    InsufficientAccessibilityCapacity { required: usize, available: usize },

    /// No pool assignment satisfies eligibility and capacity.
    #[error(
        "no pool can host association '{association}' (groups {groups:?}); eligible pools with capacity: {candidates:?}"
    )]
    PoolAssignmentInfeasible {
        association: String,
        groups: Vec<String>,
        candidates: Vec<String>,
    },

    /// A scalar configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_entities() {
        let err = Error::MissingPreference {
            agent: "A0001".into(),
            dimension: "sleep".into(),
        };
        assert_eq!(
            err.to_string(),
            "agent 'A0001' has no code for dimension 'sleep'"
        );

        let err = Error::PoolAssignmentInfeasible {
            association: "Association 03".into(),
            groups: vec!["F 01".into(), "M 04".into()],
            candidates: vec![],
        };
        let msg = err.to_string();
        assert!(msg.contains("Association 03"));
        assert!(msg.contains("M 04"));
    }
}
