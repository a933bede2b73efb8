//! Cross-population association of groups.
//!
//! After both populations' groups are final, groups of the first population
//! are paired one-to-one with groups of the second, and every resulting
//! association (pair or singleton) is assigned to a [`ResourcePool`].
//!
//! Pools hold two separate counters. A non-accessibility group consumes one
//! paired unit and an accessibility group one accessibility unit, so a
//! regular pair takes two paired units and a mixed pair one of each.
//!
//! [`AssociationConfig::validate_populations`] checks pool eligibility and
//! capacity up front; call it before allocating either population.
//!
//! # Key Types
//!
//! - [`AssociationConfig`]: pools, proposing side, retry budgets
//! - [`AssociationMatcher`]: pairs groups and assigns pools
//! - [`AssociationResult`]: associations and per-pool usage

mod config;
mod pools;
mod runner;

pub use config::AssociationConfig;
pub use pools::{PoolDemand, PoolLedger, PoolUsage, ResourcePool};
pub use runner::{
    Association, AssociationMatcher, AssociationReport, AssociationResult, GroupSide,
};
