//! Batched group allocation.
//!
//! Fills one population's groups with a randomized, batched sequence of
//! deferred-acceptance rounds, repeated over many independent trials.
//!
//! # Trial
//!
//! 1. Shuffle the population and order it by stratum (see [`Strata`]).
//! 2. Cut the order into `batch_count` batches.
//! 3. Seat the first batch directly, one agent per group.
//! 4. Match every later batch against the groups that still have room,
//!    keeping accessibility groups out of the last round.
//! 5. Score the trial by the mean [`GroupFitness`](crate::scoring::GroupFitness)
//!    of its groups.
//!
//! # Key Types
//!
//! - [`AllocationConfig`]: sizing, batching and trial parameters
//! - [`AllocationTrial`]: one validated problem; runs single trials
//! - [`AllocationOptimizer`]: runs many trials and keeps the best
//! - [`Allocation`]: one complete partition with its fitness

mod batch;
mod config;
mod round;
mod runner;
mod trial;
mod types;

pub use batch::{split_into_batches, stratify, Strata};
pub use config::AllocationConfig;
pub use round::{seed_first_batch, RoundOutcome, SuiteRound};
pub use runner::{AllocationOptimizer, AllocationResult};
pub use trial::AllocationTrial;
pub use types::{Allocation, GroupReport};
