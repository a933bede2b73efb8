//! One full attempt at filling a population's groups.

use super::batch::{split_into_batches, stratify};
use super::config::AllocationConfig;
use super::round::{seed_first_batch, SuiteRound};
use super::types::Allocation;
use crate::error::{Error, Result};
use crate::model::{AgentId, GroupSlot, Population};
use crate::scoring::{mean_fitness, Scorer};
use rand::seq::SliceRandom;
use rand::Rng;

/// A validated allocation problem for one population.
///
/// Holds only shared references, so one instance can drive any number of
/// trials, concurrently if needed. Each call to [`run`](Self::run) builds
/// fresh groups and draws all randomness from the generator it is given.
#[derive(Debug, Clone, Copy)]
pub struct AllocationTrial<'a> {
    scorer: &'a Scorer,
    population: &'a Population,
    config: &'a AllocationConfig,
    group_count: usize,
    accessibility: usize,
}

impl<'a> AllocationTrial<'a> {
    /// Checks every precondition of a trial.
    ///
    /// Fails if the configuration is invalid, the population is empty or
    /// has malformed agents, the scorer was built for another group size,
    /// or there are more accessibility agents than groups.
    pub fn new(
        scorer: &'a Scorer,
        population: &'a Population,
        config: &'a AllocationConfig,
    ) -> Result<Self> {
        config.validate()?;
        if population.is_empty() {
            return Err(Error::EmptyPopulation {
                population: population.name().to_string(),
            });
        }
        if scorer.normalizer().group_size() != config.group_capacity {
            return Err(Error::InvalidConfig(format!(
                "scorer normalizes groups of {} but group_capacity is {}",
                scorer.normalizer().group_size(),
                config.group_capacity
            )));
        }
        scorer.validate_population(population)?;

        let accessibility = population.accessibility_count();
        let group_count = config.group_count(population.len(), accessibility);
        if accessibility > group_count {
            return Err(Error::TooManyAccessibilityAgents {
                population: population.name().to_string(),
                agents: accessibility,
                groups: group_count,
            });
        }
        Ok(Self {
            scorer,
            population,
            config,
            group_count,
            accessibility,
        })
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    fn fresh_groups(&self) -> Vec<GroupSlot> {
        (0..self.group_count)
            .map(|i| {
                GroupSlot::new(
                    self.config.group_label(i),
                    self.config.group_capacity,
                    self.config.accessibility_cost,
                )
            })
            .collect()
    }

    /// Runs one trial.
    ///
    /// The first batch is seated directly, one agent per group. Every later
    /// batch is matched against the groups that still have room; the last
    /// batch may not enter accessibility groups.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Allocation> {
        let order = stratify(self.population, rng);
        let batches = split_into_batches(&order, self.config.batch_count, self.accessibility);
        let mut groups = self.fresh_groups();
        let round = SuiteRound::new(self.scorer, self.population, self.config.groups_propose);
        let mut unmatched = Vec::new();

        let last = batches.len().saturating_sub(1);
        for (b, batch) in batches.iter().enumerate() {
            if batch.is_empty() {
                continue;
            }
            let pending = if b == 0 {
                seed_first_batch(&mut groups, batch, self.population)
            } else {
                batch.clone()
            };
            if pending.is_empty() {
                continue;
            }
            let open: Vec<usize> = groups
                .iter()
                .enumerate()
                .filter(|(_, g)| !g.is_full() && !(b == last && g.is_accessibility()))
                .map(|(i, _)| i)
                .collect();
            let outcome = round.run(b, &mut groups, &open, &pending)?;
            unmatched.extend(outcome.unmatched);
        }

        Ok(self.finish(groups, unmatched))
    }

    /// Baseline without matching: shuffles the population and seats agents
    /// round-robin across the groups, skipping any group that refuses.
    pub fn allocate_randomly<R: Rng + ?Sized>(&self, rng: &mut R) -> Allocation {
        let mut order: Vec<AgentId> = self.population.ids().collect();
        order.shuffle(rng);
        // Accessibility agents first, so each lands in an empty group.
        order.sort_by_key(|&id| !self.population.get(id).needs_accessibility());

        let mut groups = self.fresh_groups();
        let mut unmatched = Vec::new();
        let n = groups.len();
        for (i, id) in order.into_iter().enumerate() {
            let agent = self.population.get(id);
            let placed = (0..n).any(|step| groups[(i + step) % n].try_add(id, agent));
            if !placed {
                unmatched.push(id);
            }
        }
        self.finish(groups, unmatched)
    }

    fn finish(&self, groups: Vec<GroupSlot>, unmatched: Vec<AgentId>) -> Allocation {
        let fitness: Vec<_> = groups
            .iter()
            .map(|g| {
                self.scorer
                    .group_fitness(&self.population.resolve(g.occupants()))
            })
            .collect();
        let score = mean_fitness(&fitness);
        Allocation {
            groups,
            fitness,
            unmatched,
            score,
        }
    }
}
