//! A named list of agents allocated together.

use super::agent::{Agent, AgentId, Sex};

/// One population of agents, e.g. all female first-years.
///
/// Agent handles ([`AgentId`]) are indices into this population and are
/// only meaningful together with it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    name: String,
    agents: Vec<Agent>,
}

impl Population {
    pub fn new(name: impl Into<String>, agents: Vec<Agent>) -> Self {
        Self {
            name: name.into(),
            agents,
        }
    }

    /// Splits one agent list into a female and a male population.
    pub fn partition_by_sex(
        agents: impl IntoIterator<Item = Agent>,
        female_name: impl Into<String>,
        male_name: impl Into<String>,
    ) -> (Population, Population) {
        let (female, male): (Vec<Agent>, Vec<Agent>) =
            agents.into_iter().partition(|a| a.sex() == Sex::Female);
        (
            Population::new(female_name, female),
            Population::new(male_name, male),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Looks up an agent by handle.
    ///
    /// # Panics
    /// Panics if the handle belongs to another population.
    pub fn get(&self, id: AgentId) -> &Agent {
        &self.agents[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.agents.len()).map(AgentId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &Agent)> + '_ {
        self.agents.iter().enumerate().map(|(i, a)| (AgentId(i), a))
    }

    /// Resolves a list of handles into agent references.
    pub fn resolve(&self, ids: &[AgentId]) -> Vec<&Agent> {
        ids.iter().map(|&id| self.get(id)).collect()
    }

    /// Number of agents needing an accessibility group.
    pub fn accessibility_count(&self) -> usize {
        self.agents.iter().filter(|a| a.needs_accessibility()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(key: &str, sex: Sex) -> Agent {
        Agent::new(key, sex, "S", ["Singapore"], "Singapore")
    }

    #[test]
    fn test_partition_by_sex_keeps_order() {
        let agents = vec![
            agent("f1", Sex::Female),
            agent("m1", Sex::Male),
            agent("f2", Sex::Female),
        ];
        let (female, male) = Population::partition_by_sex(agents, "females", "males");
        assert_eq!(female.name(), "females");
        assert_eq!(female.len(), 2);
        assert_eq!(female.get(AgentId(1)).key(), "f2");
        assert_eq!(male.len(), 1);
        assert_eq!(male.get(AgentId(0)).key(), "m1");
    }

    #[test]
    fn test_resolve_and_counts() {
        let pop = Population::new(
            "p",
            vec![
                agent("a", Sex::Male).with_accessibility(true),
                agent("b", Sex::Male),
            ],
        );
        let resolved = pop.resolve(&[AgentId(1), AgentId(0)]);
        assert_eq!(resolved[0].key(), "b");
        assert_eq!(pop.accessibility_count(), 1);
        assert_eq!(pop.ids().count(), 2);
        assert!(!pop.is_empty());
    }
}
