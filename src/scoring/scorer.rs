//! Scoring entry points.

use super::config::ScoringConfig;
use super::demographic::{
    citizenship_ratio_score, composition, country_duplication_score, exclusion_violations,
    overseas_duplicates, school_duplicates, school_duplication_score,
};
use super::fitness::GroupFitness;
use super::normalizer::{Dimension, Normalizer};
use super::spread::pairwise_spread;
use crate::error::{Error, Result};
use crate::model::{Agent, GroupSlot, Population};

/// Validated scoring configuration bundled with its normalization table.
///
/// Build one before any trial starts and share it by reference; it is
/// never mutated afterwards.
///
/// # Examples
///
/// ```
/// use suite_alloc::model::{Agent, Sex};
/// use suite_alloc::scoring::{Dimension, PreferenceWeights, Scorer, ScoringConfig};
///
/// let config = ScoringConfig::default().with_weights(PreferenceWeights::uniform(["sleep"]));
/// let scorer = Scorer::new(config, &[Dimension::with_size("sleep", 4)], 6).unwrap();
///
/// let a = Agent::new("a", Sex::Male, "X", ["Singapore"], "Singapore").with_preference("sleep", 1);
/// let b = Agent::new("b", Sex::Male, "Y", ["Japan"], "Singapore").with_preference("sleep", 1);
/// assert_eq!(scorer.composite_score(&[&a, &b]), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Scorer {
    config: ScoringConfig,
    normalizer: Normalizer,
}

impl Scorer {
    /// Validates `config` and builds the normalization table for groups of
    /// `group_size`.
    pub fn new(config: ScoringConfig, dimensions: &[Dimension], group_size: usize) -> Result<Self> {
        config.validate()?;
        let normalizer = Normalizer::new(dimensions, group_size);
        if let Some((d, _)) = config.weights.iter().find(|(d, _)| !normalizer.contains(d)) {
            return Err(Error::UnknownDimension {
                dimension: d.to_string(),
            });
        }
        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Checks that every agent carries a valid code for each weighted
    /// dimension and is eligible for at least one pool.
    pub fn validate_population(&self, population: &Population) -> Result<()> {
        for agent in population.agents() {
            for (dimension, _) in self.config.weights.iter() {
                let code = agent
                    .preference(dimension)
                    .ok_or_else(|| Error::MissingPreference {
                        agent: agent.key().to_string(),
                        dimension: dimension.to_string(),
                    })?;
                let len = self.normalizer.alphabet_len(dimension).unwrap_or(0);
                if code as usize >= len {
                    return Err(Error::CodeOutOfAlphabet {
                        agent: agent.key().to_string(),
                        dimension: dimension.to_string(),
                        code,
                    });
                }
            }
            if agent.eligible_pools().is_empty() {
                return Err(Error::NoEligiblePool {
                    agent: agent.key().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Normalized spread of one dimension; lower means more alike.
    pub fn dimension_spread(&self, agents: &[&Agent], dimension: &str) -> f64 {
        let codes: Vec<u32> = agents
            .iter()
            .filter_map(|a| a.preference(dimension))
            .collect();
        self.normalizer
            .normalize(pairwise_spread(&codes), dimension)
            .unwrap_or(0.0)
    }

    /// Similarity of one dimension: `1 - normalized spread`.
    pub fn dimension_score(&self, agents: &[&Agent], dimension: &str) -> f64 {
        1.0 - self.dimension_spread(agents, dimension)
    }

    /// Weighted sum of per-dimension similarity scores, in [0, 1].
    pub fn composite_score(&self, agents: &[&Agent]) -> f64 {
        self.config
            .weights
            .iter()
            .map(|(d, w)| w * self.dimension_score(agents, d))
            .sum()
    }

    fn preference_badness(&self, agents: &[&Agent]) -> f64 {
        self.config
            .weights
            .iter()
            .map(|(d, w)| w * self.dimension_spread(agents, d))
            .sum()
    }

    /// Reporting-time fitness of a set of agents, higher is better.
    pub fn group_fitness(&self, agents: &[&Agent]) -> GroupFitness {
        let citizenship = citizenship_ratio_score(composition(agents));
        let country = country_duplication_score(overseas_duplicates(agents));
        let school = school_duplication_score(school_duplicates(agents));

        let preferences: Vec<(String, f64)> = self
            .config
            .weights
            .iter()
            .map(|(d, _)| (d.to_string(), self.dimension_score(agents, d)))
            .collect();
        let preference = self
            .config
            .weights
            .iter()
            .zip(&preferences)
            .map(|((_, w), (_, s))| w * s)
            .sum::<f64>();

        let dw = &self.config.demographic;
        let demographic =
            dw.citizenship * citizenship + dw.country * country + dw.school * school;
        let blend = self.config.demographic_weight;
        let total = blend * demographic + (1.0 - blend) * preference;

        GroupFitness {
            citizenship,
            country,
            school,
            preferences,
            demographic,
            preference,
            total,
        }
    }

    /// Matching-time score of `candidate` joining `group`, lower is better.
    ///
    /// `occupants` are the group's current members. The preference part lies
    /// in [0, 1]; every constraint violation adds a penalty above that scale.
    pub fn match_score(&self, group: &GroupSlot, occupants: &[&Agent], candidate: &Agent) -> f64 {
        let mut members = Vec::with_capacity(occupants.len() + 1);
        members.extend_from_slice(occupants);
        members.push(candidate);

        let p = &self.config.penalties;
        let mut score = self.preference_badness(&members);
        score += overseas_duplicates(&members) as f64 * p.duplicate_country;
        score += school_duplicates(&members) as f64 * p.duplicate_school;
        if self
            .config
            .disallowed_compositions
            .contains(&composition(&members))
        {
            score += p.disallowed_composition;
        }
        let accessibility = members.iter().filter(|a| a.needs_accessibility()).count();
        score += accessibility.saturating_sub(1) as f64 * p.accessibility_clash;
        if !group.eligible_pools().overlaps(candidate.eligible_pools()) {
            score += p.no_common_pool;
        }
        score +=
            exclusion_violations(&members, &self.config.country_exclusions) as f64 * p.country_exclusion;
        score
    }

    /// Score of pairing two groups into one association, lower is better.
    ///
    /// Computed over the union of both groups' occupants.
    pub fn association_score(
        &self,
        first: &GroupSlot,
        first_members: &[&Agent],
        second: &GroupSlot,
        second_members: &[&Agent],
    ) -> f64 {
        let mut members = Vec::with_capacity(first_members.len() + second_members.len());
        members.extend_from_slice(first_members);
        members.extend_from_slice(second_members);

        let p = &self.config.penalties;
        let mut score = 1.0 - self.group_fitness(&members).total;
        if self
            .config
            .disallowed_association_compositions
            .contains(&composition(&members))
        {
            score += p.disallowed_composition;
        }
        if first.is_accessibility() && second.is_accessibility() {
            score += p.accessibility_clash;
        }
        if !first.eligible_pools().overlaps(second.eligible_pools()) {
            score += p.no_common_pool;
        }
        score +=
            exclusion_violations(&members, &self.config.country_exclusions) as f64 * p.country_exclusion;
        score
    }
}
