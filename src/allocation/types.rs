//! Allocation outputs.

use crate::model::{AgentId, GroupSlot, PoolSet, Population};
use crate::scoring::GroupFitness;

/// One complete partition of a population, as produced by a trial.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    /// Final groups, in label order.
    pub groups: Vec<GroupSlot>,

    /// Fitness breakdown of each group, parallel to `groups`.
    pub fitness: Vec<GroupFitness>,

    /// Agents no group could take.
    pub unmatched: Vec<AgentId>,

    /// Mean group fitness; the value trials are compared by.
    pub score: f64,
}

impl Allocation {
    /// Group currently holding `agent`, if any.
    pub fn group_of(&self, agent: AgentId) -> Option<&GroupSlot> {
        self.groups.iter().find(|g| g.occupants().contains(&agent))
    }

    /// Number of placed agents.
    pub fn placed(&self) -> usize {
        self.groups.iter().map(GroupSlot::len).sum()
    }

    /// Export rows, one per group.
    pub fn reports(&self, population: &Population) -> Vec<GroupReport> {
        self.groups
            .iter()
            .zip(&self.fitness)
            .map(|(group, fitness)| GroupReport {
                label: group.label().to_string(),
                occupants: group
                    .occupants()
                    .iter()
                    .map(|&id| population.get(id).key().to_string())
                    .collect(),
                accessibility: group.is_accessibility(),
                eligible_pools: group.eligible_pools().clone(),
                fitness: fitness.clone(),
            })
            .collect()
    }
}

/// Export row describing one finalized group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupReport {
    pub label: String,
    /// Agent keys, in joining order.
    pub occupants: Vec<String>,
    pub accessibility: bool,
    pub eligible_pools: PoolSet,
    pub fitness: GroupFitness,
}
