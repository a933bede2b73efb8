//! Generic stable matching.
//!
//! One deferred-acceptance primitive serves both stages of the engine:
//! filling groups with agents (groups hold several agents) and pairing
//! groups into associations (one to one). Members of each side are plain
//! indices; callers translate scores into [`Preferences`] with
//! [`rank_by_score`] or [`Preferences::from_scores`].
//!
//! # Key Types
//!
//! - [`Preferences`]: ranked partner lists for one side
//! - [`DeferredAcceptance`]: quota-aware Gale–Shapley runner
//! - [`StableMatching`]: the resulting assignment
//!
//! # References
//!
//! - Gale & Shapley (1962), *College Admissions and the Stability of Marriage*
//! - Roth & Sotomayor (1990), *Two-Sided Matching*

mod runner;
mod types;

pub use runner::DeferredAcceptance;
pub use types::{rank_by_score, Preferences, StableMatching};
