//! Data model: agents, populations and destination groups.
//!
//! Agents are read-only inputs. Groups are created fresh for every trial
//! and only grow.

mod agent;
mod eligibility;
mod group;
mod population;

pub use agent::{Agent, AgentId, Citizenship, Sex};
pub use eligibility::PoolSet;
pub use group::GroupSlot;
pub use population::Population;
