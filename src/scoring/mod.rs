//! Compatibility scoring.
//!
//! Two families of scores live here:
//!
//! - **Matching-time** scores ([`Scorer::match_score`],
//!   [`Scorer::association_score`]) are lower-is-better. A preference term in
//!   [0, 1] is combined with additive penalties that each exceed 1, so any
//!   constraint violation outranks any preference difference.
//! - **Reporting-time** fitness ([`Scorer::group_fitness`]) is
//!   higher-is-better in [0, 1] and blends demographic diversity with
//!   preference similarity. Trial selection uses the mean over groups.
//!
//! Preference similarity is built from the [`pairwise_spread`] of ordinal
//! codes, normalized per dimension by a [`Normalizer`] built once up front.
//!
//! # Key Types
//!
//! - [`ScoringConfig`]: weights, penalties, composition rules
//! - [`Scorer`]: validated config plus normalization table
//! - [`GroupFitness`]: per-group fitness breakdown

mod config;
pub mod demographic;
mod fitness;
mod normalizer;
mod scorer;
mod spread;

pub use config::{
    Composition, CountryExclusion, DemographicWeights, Penalties, PreferenceWeights,
    ScoringConfig, DEFAULT_DEMOGRAPHIC_WEIGHT, WEIGHT_TOLERANCE,
};
pub use fitness::{mean_fitness, GroupFitness};
pub use normalizer::{Dimension, Normalizer};
pub use scorer::Scorer;
pub use spread::pairwise_spread;
