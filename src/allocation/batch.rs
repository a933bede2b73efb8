//! Batch construction.
//!
//! A trial orders its population once: a seeded shuffle, then a stable
//! split into four strata merged in a fixed order. The merged order is cut
//! into consecutive batches, one per matching round.

use crate::model::{AgentId, Population};
use rand::seq::SliceRandom;
use rand::Rng;

/// A population split by accessibility need and citizenship.
///
/// Each list keeps the order of the input sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Strata {
    pub local_accessibility: Vec<AgentId>,
    pub local: Vec<AgentId>,
    pub international: Vec<AgentId>,
    pub international_accessibility: Vec<AgentId>,
}

impl Strata {
    /// Splits `order` into strata.
    pub fn partition(population: &Population, order: &[AgentId]) -> Self {
        let mut strata = Strata::default();
        for &id in order {
            let agent = population.get(id);
            let list = match (agent.needs_accessibility(), agent.is_local()) {
                (true, true) => &mut strata.local_accessibility,
                (true, false) => &mut strata.international_accessibility,
                (false, true) => &mut strata.local,
                (false, false) => &mut strata.international,
            };
            list.push(id);
        }
        strata
    }

    /// Merges the strata into one order.
    ///
    /// Local accessibility agents come first, international accessibility
    /// agents right after them, then local agents, then international
    /// agents. Every accessibility agent therefore precedes every other
    /// agent and lands in the first batch.
    pub fn merge(self) -> Vec<AgentId> {
        let mut order = self.local_accessibility;
        order.extend(self.international_accessibility);
        order.extend(self.local);
        order.extend(self.international);
        order
    }

    pub fn accessibility_len(&self) -> usize {
        self.local_accessibility.len() + self.international_accessibility.len()
    }
}

/// Shuffles the population and returns its stratified order.
pub fn stratify<R: Rng + ?Sized>(population: &Population, rng: &mut R) -> Vec<AgentId> {
    let mut order: Vec<AgentId> = population.ids().collect();
    order.shuffle(rng);
    Strata::partition(population, &order).merge()
}

/// Cuts `order` into exactly `batch_count` consecutive batches.
///
/// Every batch but the last holds `ceil(n / batch_count)` agents; the last
/// takes whatever remains. The first batch is widened to at least
/// `min_first` agents so it can hold every accessibility agent. Trailing
/// batches may be empty.
///
/// # Examples
///
/// ```
/// use suite_alloc::allocation::split_into_batches;
/// use suite_alloc::model::AgentId;
///
/// let order: Vec<AgentId> = (0..31).map(AgentId).collect();
/// let sizes: Vec<usize> = split_into_batches(&order, 6, 0).iter().map(Vec::len).collect();
/// assert_eq!(sizes, vec![6, 6, 6, 6, 6, 1]);
/// ```
pub fn split_into_batches(
    order: &[AgentId],
    batch_count: usize,
    min_first: usize,
) -> Vec<Vec<AgentId>> {
    if batch_count == 0 {
        return Vec::new();
    }
    let size = order.len().div_ceil(batch_count);
    let mut batches = Vec::with_capacity(batch_count);
    let mut start = 0;
    for b in 0..batch_count {
        let end = if b + 1 == batch_count {
            order.len()
        } else if b == 0 {
            (start + size.max(min_first)).min(order.len())
        } else {
            (start + size).min(order.len())
        };
        batches.push(order[start..end].to_vec());
        start = end;
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Agent, Sex};
    use crate::random::create_rng;

    fn population() -> Population {
        let mut agents = Vec::new();
        for i in 0..10 {
            let (country, access) = match i {
                0 => ("Japan", true),
                1 => ("Singapore", true),
                i if i % 2 == 0 => ("India", false),
                _ => ("Singapore", false),
            };
            agents.push(
                Agent::new(format!("a{i}"), Sex::Female, "S", [country], "Singapore")
                    .with_accessibility(access),
            );
        }
        Population::new("p", agents)
    }

    #[test]
    fn test_partition_keeps_input_order() {
        let pop = population();
        let order: Vec<AgentId> = (0..10).rev().map(AgentId).collect();
        let strata = Strata::partition(&pop, &order);
        assert_eq!(strata.local_accessibility, vec![AgentId(1)]);
        assert_eq!(strata.international_accessibility, vec![AgentId(0)]);
        assert_eq!(
            strata.local,
            vec![AgentId(9), AgentId(7), AgentId(5), AgentId(3)]
        );
        assert_eq!(
            strata.international,
            vec![AgentId(8), AgentId(6), AgentId(4), AgentId(2)]
        );
        assert_eq!(strata.accessibility_len(), 2);
    }

    #[test]
    fn test_merge_order() {
        let strata = Strata {
            local_accessibility: vec![AgentId(1)],
            local: vec![AgentId(3), AgentId(5)],
            international: vec![AgentId(4)],
            international_accessibility: vec![AgentId(0), AgentId(2)],
        };
        assert_eq!(
            strata.merge(),
            vec![AgentId(1), AgentId(0), AgentId(2), AgentId(3), AgentId(5), AgentId(4)]
        );
    }

    #[test]
    fn test_stratify_front_loads_accessibility() {
        let pop = population();
        let order = stratify(&pop, &mut create_rng(3));
        assert_eq!(order.len(), 10);
        assert!(order[..2]
            .iter()
            .all(|&id| pop.get(id).needs_accessibility()));
        assert!(pop.get(order[0]).is_local());
        let first_intl = order[2..]
            .iter()
            .position(|&id| !pop.get(id).is_local())
            .unwrap();
        assert!(order[2..2 + first_intl]
            .iter()
            .all(|&id| pop.get(id).is_local()));
        assert!(order[2 + first_intl..]
            .iter()
            .all(|&id| !pop.get(id).is_local()));
    }

    #[test]
    fn test_seeded_stratification_is_reproducible() {
        let pop = population();
        let a = split_into_batches(&stratify(&pop, &mut create_rng(11)), 6, 2);
        let b = split_into_batches(&stratify(&pop, &mut create_rng(11)), 6, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_sizes() {
        let order: Vec<AgentId> = (0..36).map(AgentId).collect();
        let batches = split_into_batches(&order, 6, 0);
        assert!(batches.iter().all(|b| b.len() == 6));
        assert_eq!(batches.concat(), order);

        let order: Vec<AgentId> = (0..7).map(AgentId).collect();
        let sizes: Vec<usize> = split_into_batches(&order, 6, 0).iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 2, 1, 0, 0]);
    }

    #[test]
    fn test_first_batch_widened() {
        let order: Vec<AgentId> = (0..7).map(AgentId).collect();
        let sizes: Vec<usize> = split_into_batches(&order, 6, 3).iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 2, 2, 0, 0, 0]);
        assert!(split_into_batches(&[], 6, 0).iter().all(Vec::is_empty));
    }
}
