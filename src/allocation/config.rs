//! Allocation configuration.
//!
//! [`AllocationConfig`] holds the group sizing, batching and trial
//! parameters of one optimizer run.

use crate::error::{Error, Result};

/// Configuration for filling one population's groups.
///
/// # Defaults
///
/// ```
/// use suite_alloc::allocation::AllocationConfig;
///
/// let config = AllocationConfig::default();
/// assert_eq!(config.group_capacity, 6);
/// assert_eq!(config.accessibility_cost, 5);
/// assert_eq!(config.batch_count, 6);
/// assert_eq!(config.trials, 20);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use suite_alloc::allocation::AllocationConfig;
///
/// let config = AllocationConfig::default()
///     .with_trials(50)
///     .with_seed(7)
///     .with_label_prefix("FY Female Suite");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationConfig {
    /// Base capacity of every group.
    pub group_capacity: usize,

    /// Places an accessibility occupant takes up beyond its own.
    ///
    /// With capacity 6 and cost 5 an accessibility group holds one agent.
    pub accessibility_cost: usize,

    /// Number of batches a population is split into.
    pub batch_count: usize,

    /// Number of independent trials.
    pub trials: usize,

    /// Whether groups propose to agents in each round. Agents propose when
    /// `false`.
    pub groups_propose: bool,

    /// Master random seed. `None` uses a random seed.
    pub seed: Option<u64>,

    /// Whether to run trials on the rayon pool. Only honored with the
    /// `parallel` feature.
    pub parallel: bool,

    /// Optional wall-clock limit in milliseconds.
    ///
    /// Checked before each trial starts; trials already running finish.
    /// At least one trial always runs.
    pub time_limit_ms: Option<u64>,

    /// Group labels are `"{prefix} {i:02}"`, numbered from 1.
    pub label_prefix: String,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            group_capacity: 6,
            accessibility_cost: 5,
            batch_count: 6,
            trials: 20,
            groups_propose: true,
            seed: None,
            parallel: true,
            time_limit_ms: None,
            label_prefix: "Suite".into(),
        }
    }
}

impl AllocationConfig {
    pub fn with_group_capacity(mut self, capacity: usize) -> Self {
        self.group_capacity = capacity;
        self
    }

    pub fn with_accessibility_cost(mut self, cost: usize) -> Self {
        self.accessibility_cost = cost;
        self
    }

    pub fn with_batch_count(mut self, n: usize) -> Self {
        self.batch_count = n;
        self
    }

    pub fn with_trials(mut self, n: usize) -> Self {
        self.trials = n;
        self
    }

    /// Sets which side proposes in each deferred-acceptance round.
    pub fn with_groups_propose(mut self, groups_propose: bool) -> Self {
        self.groups_propose = groups_propose;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }

    /// Number of groups needed for `agents` agents of which `accessibility`
    /// need an accessibility group.
    pub fn group_count(&self, agents: usize, accessibility: usize) -> usize {
        let places = agents + self.accessibility_cost * accessibility;
        places.div_ceil(self.group_capacity)
    }

    /// Label of the group at zero-based `index`.
    pub fn group_label(&self, index: usize) -> String {
        format!("{} {:02}", self.label_prefix, index + 1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.group_capacity == 0 {
            return Err(Error::InvalidConfig("group_capacity must be > 0".into()));
        }
        if self.accessibility_cost >= self.group_capacity {
            return Err(Error::InvalidConfig(format!(
                "accessibility_cost ({}) must be less than group_capacity ({})",
                self.accessibility_cost, self.group_capacity
            )));
        }
        if self.batch_count < 2 {
            return Err(Error::InvalidConfig("batch_count must be >= 2".into()));
        }
        if self.trials == 0 {
            return Err(Error::InvalidConfig("trials must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_count() {
        let config = AllocationConfig::default();
        assert_eq!(config.group_count(36, 0), 6);
        assert_eq!(config.group_count(31, 1), 6);
        assert_eq!(config.group_count(37, 0), 7);
        assert_eq!(config.group_count(0, 0), 0);
    }

    #[test]
    fn test_group_label() {
        let config = AllocationConfig::default().with_label_prefix("FY Male Suite");
        assert_eq!(config.group_label(0), "FY Male Suite 01");
        assert_eq!(config.group_label(11), "FY Male Suite 12");
    }

    #[test]
    fn test_validate() {
        assert!(AllocationConfig::default().validate().is_ok());
        assert!(AllocationConfig::default().with_trials(0).validate().is_err());
        assert!(AllocationConfig::default()
            .with_accessibility_cost(6)
            .validate()
            .is_err());
        assert!(AllocationConfig::default()
            .with_batch_count(1)
            .validate()
            .is_err());
        assert!(AllocationConfig::default()
            .with_group_capacity(0)
            .validate()
            .is_err());
    }
}
