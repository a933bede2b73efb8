//! Association configuration.

use super::pools::ResourcePool;
use crate::allocation::AllocationConfig;
use crate::error::{Error, Result};
use crate::model::{PoolSet, Population};
use std::collections::BTreeSet;

/// Configuration for pairing groups and assigning pools.
///
/// # Examples
///
/// ```
/// use suite_alloc::association::{AssociationConfig, ResourcePool};
///
/// let config = AssociationConfig::default()
///     .with_pool(ResourcePool::new("Saga", 8, 1))
///     .with_pool(ResourcePool::new("Elm", 8, 1))
///     .with_pool(ResourcePool::new("Cendana", 8, 1))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssociationConfig {
    /// Pools associations are assigned to.
    pub pools: Vec<ResourcePool>,

    /// Whether the first population's groups propose. The second
    /// population's groups propose when `false`.
    pub first_proposes: bool,

    /// Random seed. `None` uses a random seed.
    pub seed: Option<u64>,

    /// Number of randomized pool-assignment attempts before falling back
    /// to the exhaustive search.
    pub restart_budget: usize,

    /// Maximum number of pool trials the fallback search may make.
    pub search_node_budget: usize,

    /// Association labels are `"{prefix} {i:02}"`, numbered from 1.
    pub label_prefix: String,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            pools: Vec::new(),
            first_proposes: true,
            seed: None,
            restart_budget: 50,
            search_node_budget: 100_000,
            label_prefix: "Association".into(),
        }
    }
}

impl AssociationConfig {
    pub fn with_pool(mut self, pool: ResourcePool) -> Self {
        self.pools.push(pool);
        self
    }

    pub fn with_pools(mut self, pools: Vec<ResourcePool>) -> Self {
        self.pools = pools;
        self
    }

    pub fn with_first_proposes(mut self, first_proposes: bool) -> Self {
        self.first_proposes = first_proposes;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_restart_budget(mut self, attempts: usize) -> Self {
        self.restart_budget = attempts;
        self
    }

    pub fn with_search_node_budget(mut self, nodes: usize) -> Self {
        self.search_node_budget = nodes;
        self
    }

    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }

    pub fn association_label(&self, index: usize) -> String {
        format!("{} {:02}", self.label_prefix, index + 1)
    }

    pub fn total_paired_capacity(&self) -> usize {
        self.pools.iter().map(ResourcePool::paired_capacity).sum()
    }

    pub fn total_accessibility_capacity(&self) -> usize {
        self.pools.iter().map(ResourcePool::accessibility_capacity).sum()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.pools.is_empty() {
            return Err(Error::InvalidConfig("at least one pool is required".into()));
        }
        let mut labels = BTreeSet::new();
        for pool in &self.pools {
            if !labels.insert(pool.label()) {
                return Err(Error::InvalidConfig(format!(
                    "pool '{}' is declared twice",
                    pool.label()
                )));
            }
        }
        if self.restart_budget == 0 && self.search_node_budget == 0 {
            return Err(Error::InvalidConfig(
                "restart_budget and search_node_budget cannot both be 0".into(),
            ));
        }
        Ok(())
    }

    /// Whether any declared pool is in `pools`.
    pub fn declares(&self, pools: &PoolSet) -> bool {
        self.pools.iter().any(|p| pools.contains(p.label()))
    }

    /// Fails if the pools cannot hold `paired` regular groups and
    /// `accessibility` accessibility groups.
    pub fn check_capacity(&self, paired: usize, accessibility: usize) -> Result<()> {
        let available = self.total_paired_capacity();
        if available < paired {
            return Err(Error::InsufficientPoolCapacity {
                required: paired,
                available,
            });
        }
        let available = self.total_accessibility_capacity();
        if available < accessibility {
            return Err(Error::InsufficientAccessibilityCapacity {
                required: accessibility,
                available,
            });
        }
        Ok(())
    }

    /// Checks both populations against the pools before any allocation
    /// runs.
    ///
    /// Every agent must be eligible for a declared pool, and the pools must
    /// hold the groups `allocation` will form: one accessibility group per
    /// accessibility agent and regular groups for the rest. Call this
    /// before [`AllocationOptimizer::run`](crate::allocation::AllocationOptimizer::run)
    /// so a shortfall surfaces before any trial is spent.
    pub fn validate_populations(
        &self,
        first: &Population,
        second: &Population,
        allocation: &AllocationConfig,
    ) -> Result<()> {
        self.validate()?;
        let mut paired = 0;
        let mut accessibility = 0;
        for population in [first, second] {
            if let Some(agent) = population
                .agents()
                .iter()
                .find(|a| !self.declares(a.eligible_pools()))
            {
                return Err(Error::NoEligiblePool {
                    agent: agent.key().to_string(),
                });
            }
            let access = population.accessibility_count();
            let groups = allocation.group_count(population.len(), access);
            accessibility += access.min(groups);
            paired += groups - access.min(groups);
        }
        self.check_capacity(paired, accessibility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Agent, Sex};

    fn agent(key: &str, pools: &[&str]) -> Agent {
        let agent = Agent::new(key, Sex::Female, key, ["Singapore"], "Singapore");
        if pools.is_empty() {
            agent
        } else {
            agent.with_eligible_pools(pools.iter().copied())
        }
    }

    fn population(name: &str, n: usize, accessibility: usize) -> Population {
        let agents = (0..n)
            .map(|i| agent(&format!("{name}{i}"), &[]).with_accessibility(i < accessibility))
            .collect();
        Population::new(name, agents)
    }

    #[test]
    fn test_validate_populations_capacity() {
        let allocation = AllocationConfig::default();
        let females = population("f", 36, 0);
        let males = population("m", 36, 1);

        // 6 + 6 regular groups and 1 accessibility group.
        let tight = AssociationConfig::default()
            .with_pool(ResourcePool::new("Saga", 6, 1))
            .with_pool(ResourcePool::new("Elm", 6, 0));
        assert!(tight.validate_populations(&females, &males, &allocation).is_ok());

        let short = AssociationConfig::default()
            .with_pool(ResourcePool::new("Saga", 6, 1))
            .with_pool(ResourcePool::new("Elm", 5, 0));
        assert_eq!(
            short.validate_populations(&females, &males, &allocation),
            Err(Error::InsufficientPoolCapacity {
                required: 12,
                available: 11
            })
        );

        let no_access = AssociationConfig::default().with_pool(ResourcePool::new("Saga", 12, 0));
        assert_eq!(
            no_access.validate_populations(&females, &males, &allocation),
            Err(Error::InsufficientAccessibilityCapacity {
                required: 1,
                available: 0
            })
        );
    }

    #[test]
    fn test_validate_populations_undeclared_pool() {
        let allocation = AllocationConfig::default();
        let females = Population::new("f", vec![agent("f0", &["Saga"]), agent("f1", &["Nowhere"])]);
        let males = population("m", 2, 0);
        let config = AssociationConfig::default()
            .with_pool(ResourcePool::new("Saga", 4, 1))
            .with_pool(ResourcePool::new("Elm", 4, 1));
        assert_eq!(
            config.validate_populations(&females, &males, &allocation),
            Err(Error::NoEligiblePool { agent: "f1".into() })
        );
    }

    #[test]
    fn test_validate() {
        assert!(AssociationConfig::default().validate().is_err());

        let dup = AssociationConfig::default()
            .with_pool(ResourcePool::new("Elm", 2, 0))
            .with_pool(ResourcePool::new("Elm", 2, 0));
        assert!(dup.validate().is_err());

        let no_budget = AssociationConfig::default()
            .with_pool(ResourcePool::new("Elm", 2, 0))
            .with_restart_budget(0)
            .with_search_node_budget(0);
        assert!(no_budget.validate().is_err());
    }

    #[test]
    fn test_totals_and_labels() {
        let config = AssociationConfig::default()
            .with_pools(vec![
                ResourcePool::new("Saga", 8, 1),
                ResourcePool::new("Elm", 6, 2),
            ]);
        assert_eq!(config.total_paired_capacity(), 14);
        assert_eq!(config.total_accessibility_capacity(), 3);
        assert_eq!(config.association_label(0), "Association 01");
    }
}
