//! Resource pools and their capacity bookkeeping.

use crate::model::PoolSet;

/// A named capacity bucket that associations are assigned to.
///
/// Paired units are consumed by non-accessibility groups, accessibility
/// units by accessibility groups.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    label: String,
    paired_capacity: usize,
    accessibility_capacity: usize,
}

impl ResourcePool {
    pub fn new(label: impl Into<String>, paired_capacity: usize, accessibility_capacity: usize) -> Self {
        Self {
            label: label.into(),
            paired_capacity,
            accessibility_capacity,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn paired_capacity(&self) -> usize {
        self.paired_capacity
    }

    pub fn accessibility_capacity(&self) -> usize {
        self.accessibility_capacity
    }
}

/// Units one association needs from its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolDemand {
    pub paired: usize,
    pub accessibility: usize,
}

impl PoolDemand {
    /// One paired unit per non-accessibility group, one accessibility unit
    /// per accessibility group.
    pub fn for_groups<I: IntoIterator<Item = bool>>(accessibility_flags: I) -> Self {
        let mut demand = PoolDemand::default();
        for access in accessibility_flags {
            if access {
                demand.accessibility += 1;
            } else {
                demand.paired += 1;
            }
        }
        demand
    }
}

/// Final consumption of one pool.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolUsage {
    pub label: String,
    pub paired_used: usize,
    pub paired_capacity: usize,
    pub accessibility_used: usize,
    pub accessibility_capacity: usize,
}

/// Remaining capacity of every pool during one assignment attempt.
#[derive(Debug, Clone)]
pub struct PoolLedger<'a> {
    pools: &'a [ResourcePool],
    paired_used: Vec<usize>,
    accessibility_used: Vec<usize>,
}

impl<'a> PoolLedger<'a> {
    pub fn new(pools: &'a [ResourcePool]) -> Self {
        Self {
            pools,
            paired_used: vec![0; pools.len()],
            accessibility_used: vec![0; pools.len()],
        }
    }

    pub fn remaining_paired(&self, pool: usize) -> usize {
        self.pools[pool].paired_capacity - self.paired_used[pool]
    }

    pub fn remaining_accessibility(&self, pool: usize) -> usize {
        self.pools[pool].accessibility_capacity - self.accessibility_used[pool]
    }

    pub fn can_take(&self, pool: usize, demand: PoolDemand) -> bool {
        self.remaining_paired(pool) >= demand.paired
            && self.remaining_accessibility(pool) >= demand.accessibility
    }

    /// Consumes `demand` from `pool`. Returns `false` and changes nothing if
    /// it does not fit.
    pub fn take(&mut self, pool: usize, demand: PoolDemand) -> bool {
        if !self.can_take(pool, demand) {
            return false;
        }
        self.paired_used[pool] += demand.paired;
        self.accessibility_used[pool] += demand.accessibility;
        true
    }

    /// Returns units previously taken from `pool`.
    pub fn release(&mut self, pool: usize, demand: PoolDemand) {
        self.paired_used[pool] = self.paired_used[pool].saturating_sub(demand.paired);
        self.accessibility_used[pool] =
            self.accessibility_used[pool].saturating_sub(demand.accessibility);
    }

    /// Indices of pools in `eligible` that can take `demand` now.
    pub fn candidates(&self, eligible: &PoolSet, demand: PoolDemand) -> Vec<usize> {
        (0..self.pools.len())
            .filter(|&i| eligible.contains(self.pools[i].label()) && self.can_take(i, demand))
            .collect()
    }

    pub fn usage(&self) -> Vec<PoolUsage> {
        self.pools
            .iter()
            .enumerate()
            .map(|(i, p)| PoolUsage {
                label: p.label.clone(),
                paired_used: self.paired_used[i],
                paired_capacity: p.paired_capacity,
                accessibility_used: self.accessibility_used[i],
                accessibility_capacity: p.accessibility_capacity,
            })
            .collect()
    }
}
