//! Capacity-tracked destination groups.

use super::agent::{Agent, AgentId};
use super::eligibility::PoolSet;

/// One destination group (a suite).
///
/// Occupants are only ever added. The first accessibility agent to join
/// flags the group and reduces its capacity by the accessibility cost; this
/// happens at most once. The eligible-pool set is the running intersection
/// of the occupants' eligible sets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupSlot {
    label: String,
    base_capacity: usize,
    accessibility_cost: usize,
    capacity: usize,
    occupants: Vec<AgentId>,
    accessibility: bool,
    eligible_pools: PoolSet,
}

impl GroupSlot {
    /// Creates an empty group.
    ///
    /// `accessibility_cost` is the number of extra places an accessibility
    /// occupant takes up.
    pub fn new(label: impl Into<String>, base_capacity: usize, accessibility_cost: usize) -> Self {
        Self {
            label: label.into(),
            base_capacity,
            accessibility_cost,
            capacity: base_capacity,
            occupants: Vec::with_capacity(base_capacity),
            accessibility: false,
            eligible_pools: PoolSet::Any,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn base_capacity(&self) -> usize {
        self.base_capacity
    }

    /// Current capacity, after any accessibility reduction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn vacancies(&self) -> usize {
        self.capacity.saturating_sub(self.occupants.len())
    }

    pub fn is_full(&self) -> bool {
        self.vacancies() == 0
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn occupants(&self) -> &[AgentId] {
        &self.occupants
    }

    pub fn is_accessibility(&self) -> bool {
        self.accessibility
    }

    pub fn eligible_pools(&self) -> &PoolSet {
        &self.eligible_pools
    }

    /// Whether `agent` fits without exceeding capacity.
    pub fn admits(&self, agent: &Agent) -> bool {
        if agent.needs_accessibility() && !self.accessibility {
            let reduced = self.base_capacity.saturating_sub(self.accessibility_cost);
            self.occupants.len() < reduced
        } else {
            self.occupants.len() < self.capacity
        }
    }

    /// Adds an occupant. Returns `false` and leaves the group untouched if
    /// the agent does not fit.
    #[must_use]
    pub fn try_add(&mut self, id: AgentId, agent: &Agent) -> bool {
        if !self.admits(agent) {
            return false;
        }
        if agent.needs_accessibility() && !self.accessibility {
            self.accessibility = true;
            self.capacity = self.base_capacity.saturating_sub(self.accessibility_cost);
        }
        self.eligible_pools = self.eligible_pools.intersect(agent.eligible_pools());
        self.occupants.push(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sex;

    fn agent(access: bool) -> Agent {
        Agent::new("x", Sex::Female, "S", ["Singapore"], "Singapore").with_accessibility(access)
    }

    #[test]
    fn test_fill_to_capacity() {
        let mut group = GroupSlot::new("G 01", 3, 2);
        let a = agent(false);
        for i in 0..3 {
            assert!(group.try_add(AgentId(i), &a));
        }
        assert!(group.is_full());
        assert!(!group.try_add(AgentId(3), &a));
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn test_accessibility_reduces_capacity_once() {
        let mut group = GroupSlot::new("G 01", 6, 4);
        assert!(group.try_add(AgentId(0), &agent(true)));
        assert!(group.is_accessibility());
        assert_eq!(group.capacity(), 2);
        assert_eq!(group.vacancies(), 1);

        // A second accessibility occupant does not reduce capacity again.
        assert!(group.try_add(AgentId(1), &agent(true)));
        assert_eq!(group.capacity(), 2);
        assert!(group.is_full());
    }

    #[test]
    fn test_reference_sizing_holds_single_accessibility_agent() {
        let mut group = GroupSlot::new("G 01", 6, 5);
        assert!(group.try_add(AgentId(0), &agent(true)));
        assert_eq!(group.capacity(), 1);
        assert!(group.is_full());
        assert!(!group.try_add(AgentId(1), &agent(false)));
    }

    #[test]
    fn test_accessibility_agent_rejected_when_group_too_full() {
        let mut group = GroupSlot::new("G 01", 6, 5);
        assert!(group.try_add(AgentId(0), &agent(false)));
        assert!(!group.admits(&agent(true)));
        assert!(!group.try_add(AgentId(1), &agent(true)));
        assert!(!group.is_accessibility());
        assert_eq!(group.capacity(), 6);
    }

    #[test]
    fn test_eligible_pools_intersect_on_add() {
        let mut group = GroupSlot::new("G 01", 6, 5);
        assert_eq!(group.eligible_pools(), &PoolSet::Any);

        let a = agent(false).with_eligible_pools(["Saga", "Elm"]);
        let b = agent(false).with_eligible_pools(["Elm", "Cendana"]);
        assert!(group.try_add(AgentId(0), &a));
        assert!(group.try_add(AgentId(1), &b));
        assert_eq!(group.eligible_pools(), &PoolSet::only(["Elm"]));
    }
}
