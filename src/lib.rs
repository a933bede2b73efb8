//! Batched stable-matching engine for group allocation.
//!
//! Partitions a population of agents into fixed-capacity groups under
//! diversity, eligibility and capacity constraints, then pairs the groups of
//! two populations into associations placed in capacity-limited pools:
//!
//! - **Scoring**: pairwise-spread preference similarity, demographic
//!   diversity sub-scores, and penalty-based matching scores.
//! - **Matching**: a quota-aware deferred-acceptance (Gale–Shapley)
//!   primitive shared by both stages.
//! - **Allocation**: stratified batching, first-batch seeding and
//!   successive matching rounds, repeated over independent randomized
//!   trials with the best kept.
//! - **Association**: one-to-one pairing of groups across populations and
//!   bounded, constraint-checked pool assignment.
//!
//! # Example
//!
//! ```
//! use suite_alloc::allocation::{AllocationConfig, AllocationOptimizer};
//! use suite_alloc::model::{Agent, Population, Sex};
//! use suite_alloc::scoring::{Dimension, PreferenceWeights, Scorer, ScoringConfig};
//!
//! let agents: Vec<Agent> = (0..12)
//!     .map(|i| {
//!         let country = if i % 2 == 0 { "Singapore" } else { "India" };
//!         Agent::new(format!("s{i}"), Sex::Female, format!("School {i}"), [country], "Singapore")
//!             .with_preference("sleep", (i % 3) as u32)
//!     })
//!     .collect();
//! let population = Population::new("females", agents);
//!
//! let scoring = ScoringConfig::default().with_weights(PreferenceWeights::uniform(["sleep"]));
//! let scorer = Scorer::new(scoring, &[Dimension::new("sleep", ["early", "mid", "late"])], 6).unwrap();
//!
//! let config = AllocationConfig::default().with_trials(4).with_seed(1);
//! let result = AllocationOptimizer::run(&scorer, &population, &config).unwrap();
//! assert_eq!(result.best.groups.len(), 2);
//! assert!(result.best.unmatched.is_empty());
//! ```
//!
//! Logging goes through `tracing`; install a subscriber to see it.

pub mod allocation;
pub mod association;
pub mod error;
pub mod matching;
pub mod model;
pub mod random;
pub mod scoring;

pub use error::{Error, Result};
