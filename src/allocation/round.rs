//! One matching round between a batch and the open groups.

use crate::error::Result;
use crate::matching::{DeferredAcceptance, Preferences};
use crate::model::{AgentId, GroupSlot, Population};
use crate::scoring::Scorer;
use tracing::{debug, warn};

/// Seats the first batch directly: agent `i` joins group `i`.
///
/// Returns the agents left over when the batch is larger than the number
/// of groups, plus any agent a group refused.
pub fn seed_first_batch(
    groups: &mut [GroupSlot],
    batch: &[AgentId],
    population: &Population,
) -> Vec<AgentId> {
    let mut rest = Vec::new();
    for (i, &id) in batch.iter().enumerate() {
        let seated = groups
            .get_mut(i)
            .is_some_and(|group| group.try_add(id, population.get(id)));
        if !seated {
            rest.push(id);
        }
    }
    rest
}

/// What a round did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Agents committed to a group.
    pub matched: usize,
    /// Agents of the batch left without a group.
    pub unmatched: Vec<AgentId>,
}

/// Deferred-acceptance round filling open groups from one batch.
///
/// A round runs in passes. In each pass every open group with room takes
/// at most one agent, so agents seated together are always scored against
/// each other. Scores of every (group, agent) pair are computed at the
/// start of a pass against the groups' current occupants, held in a matrix
/// indexed by position, and dropped when the pass ends. Both sides rank
/// from the same matrix. A pair the group cannot admit is unacceptable to
/// both sides. Passes repeat until the batch is seated or a pass seats
/// nobody.
pub struct SuiteRound<'a> {
    scorer: &'a Scorer,
    population: &'a Population,
    groups_propose: bool,
}

impl<'a> SuiteRound<'a> {
    pub fn new(scorer: &'a Scorer, population: &'a Population, groups_propose: bool) -> Self {
        Self {
            scorer,
            population,
            groups_propose,
        }
    }

    /// Matches `batch` into the groups at indices `open`, then commits.
    pub fn run(
        &self,
        index: usize,
        groups: &mut [GroupSlot],
        open: &[usize],
        batch: &[AgentId],
    ) -> Result<RoundOutcome> {
        let mut pending = batch.to_vec();
        let mut outcome = RoundOutcome::default();
        let mut passes = 0;
        let mut proposals = 0;

        while !pending.is_empty() {
            let room: Vec<usize> = open
                .iter()
                .copied()
                .filter(|&g| !groups[g].is_full())
                .collect();
            if room.is_empty() {
                break;
            }
            let (seated, made) = self.pass(groups, &room, &pending)?;
            passes += 1;
            proposals += made;
            if seated.is_empty() {
                break;
            }
            outcome.matched += seated.len();
            pending.retain(|id| !seated.contains(id));
        }

        for &id in &pending {
            warn!(
                round = index,
                agent = self.population.get(id).key(),
                "agent left unmatched"
            );
        }
        outcome.unmatched = pending;

        debug!(
            round = index,
            groups = open.len(),
            agents = batch.len(),
            matched = outcome.matched,
            passes,
            proposals,
            "round complete"
        );
        Ok(outcome)
    }

    /// One unit-quota matching between `pending` and the groups at `room`.
    /// Returns the seated agents and the number of proposals made.
    fn pass(
        &self,
        groups: &mut [GroupSlot],
        room: &[usize],
        pending: &[AgentId],
    ) -> Result<(Vec<AgentId>, usize)> {
        let scores = self.score_matrix(groups, room, pending);

        let group_lists: Vec<Vec<usize>> = scores
            .iter()
            .map(|row| ranked(row.iter().copied().enumerate()))
            .collect();
        let agent_lists: Vec<Vec<usize>> = (0..pending.len())
            .map(|k| ranked(scores.iter().map(|row| row[k]).enumerate()))
            .collect();

        let matching = if self.groups_propose {
            DeferredAcceptance::new(Preferences::new(group_lists), Preferences::new(agent_lists))
                .run()?
        } else {
            DeferredAcceptance::new(Preferences::new(agent_lists), Preferences::new(group_lists))
                .run()?
        };

        let mut seated = Vec::new();
        for (p, a) in matching.pairs() {
            let (g, k) = if self.groups_propose { (p, a) } else { (a, p) };
            let id = pending[k];
            if groups[room[g]].try_add(id, self.population.get(id)) {
                seated.push(id);
            }
        }
        Ok((seated, matching.proposals()))
    }

    /// `scores[g][k]`: score of batch agent `k` joining open group `g`, or
    /// `None` if the group cannot admit the agent.
    fn score_matrix(
        &self,
        groups: &[GroupSlot],
        open: &[usize],
        batch: &[AgentId],
    ) -> Vec<Vec<Option<f64>>> {
        open.iter()
            .map(|&g| {
                let group = &groups[g];
                let occupants = self.population.resolve(group.occupants());
                batch
                    .iter()
                    .map(|&id| {
                        let agent = self.population.get(id);
                        group
                            .admits(agent)
                            .then(|| self.scorer.match_score(group, &occupants, agent))
                    })
                    .collect()
            })
            .collect()
    }
}

/// Acceptable indices ordered by score, ties by index.
fn ranked(scores: impl Iterator<Item = (usize, Option<f64>)>) -> Vec<usize> {
    let mut entries: Vec<(usize, f64)> = scores
        .filter_map(|(i, s)| s.map(|s| (i, s)))
        .collect();
    entries.sort_by(|a, b| a.1.total_cmp(&b.1));
    entries.into_iter().map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Agent, Sex};
    use crate::scoring::demographic::school_duplicates;
    use crate::scoring::{Dimension, PreferenceWeights, ScoringConfig};

    fn scorer() -> Scorer {
        let config = ScoringConfig::default().with_weights(PreferenceWeights::uniform(["sleep"]));
        Scorer::new(config, &[Dimension::with_size("sleep", 4)], 6).unwrap()
    }

    fn agent(i: usize, sleep: u32) -> Agent {
        Agent::new(
            format!("a{i}"),
            Sex::Male,
            format!("S{i}"),
            [format!("C{i}")],
            "Singapore",
        )
        .with_preference("sleep", sleep)
    }

    fn groups(n: usize) -> Vec<GroupSlot> {
        (0..n).map(|i| GroupSlot::new(format!("G {i}"), 6, 5)).collect()
    }

    #[test]
    fn test_seed_first_batch_round_robin() {
        let pop = Population::new("p", (0..4).map(|i| agent(i, 0)).collect());
        let mut gs = groups(3);
        let ids: Vec<AgentId> = pop.ids().collect();
        let rest = seed_first_batch(&mut gs, &ids, &pop);
        assert_eq!(rest, vec![AgentId(3)]);
        for (i, g) in gs.iter().enumerate() {
            assert_eq!(g.occupants(), &[AgentId(i)]);
        }
    }

    #[test]
    fn test_round_places_similar_agents_together() {
        // Two seeded groups with opposite codes; newcomers join their match.
        let pop = Population::new(
            "p",
            vec![agent(0, 0), agent(1, 3), agent(2, 3), agent(3, 0)],
        );
        let mut gs = groups(2);
        assert!(gs[0].try_add(AgentId(0), pop.get(AgentId(0))));
        assert!(gs[1].try_add(AgentId(1), pop.get(AgentId(1))));

        let s = scorer();
        for groups_propose in [true, false] {
            let mut gs = gs.clone();
            let outcome = SuiteRound::new(&s, &pop, groups_propose)
                .run(1, &mut gs, &[0, 1], &[AgentId(2), AgentId(3)])
                .unwrap();
            assert_eq!(outcome.matched, 2);
            assert!(outcome.unmatched.is_empty());
            assert_eq!(gs[0].occupants(), &[AgentId(0), AgentId(3)]);
            assert_eq!(gs[1].occupants(), &[AgentId(1), AgentId(2)]);
        }
    }

    #[test]
    fn test_agents_seated_together_are_scored_together() {
        // Agents 2 and 3 share a school and both suit group 0. Only one of
        // them may join it in a pass; the other goes elsewhere.
        let with_school = |i: usize, school: &str, sleep: u32| {
            Agent::new(format!("a{i}"), Sex::Male, school, [format!("C{i}")], "Singapore")
                .with_preference("sleep", sleep)
        };
        let pop = Population::new(
            "p",
            vec![
                with_school(0, "A", 0),
                with_school(1, "E", 3),
                with_school(2, "B", 0),
                with_school(3, "B", 0),
                with_school(4, "D", 0),
            ],
        );
        let mut gs = groups(2);
        assert!(gs[0].try_add(AgentId(0), pop.get(AgentId(0))));
        assert!(gs[1].try_add(AgentId(1), pop.get(AgentId(1))));

        let s = scorer();
        for groups_propose in [true, false] {
            let mut gs = gs.clone();
            let outcome = SuiteRound::new(&s, &pop, groups_propose)
                .run(1, &mut gs, &[0, 1], &[AgentId(2), AgentId(3), AgentId(4)])
                .unwrap();
            assert_eq!(outcome.matched, 3);
            assert_eq!(gs[0].occupants(), &[AgentId(0), AgentId(2), AgentId(4)]);
            assert_eq!(gs[1].occupants(), &[AgentId(1), AgentId(3)]);
            for g in &gs {
                assert_eq!(school_duplicates(&pop.resolve(g.occupants())), 0);
            }
        }
    }

    #[test]
    fn test_round_respects_vacancies() {
        let pop = Population::new("p", (0..4).map(|i| agent(i, 0)).collect());
        let mut gs = vec![GroupSlot::new("G", 2, 1)];
        let s = scorer();
        let outcome = SuiteRound::new(&s, &pop, true)
            .run(1, &mut gs, &[0], &[AgentId(0), AgentId(1), AgentId(2)])
            .unwrap();
        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.unmatched.len(), 1);
        assert!(gs[0].len() <= gs[0].capacity());
    }

    #[test]
    fn test_inadmissible_pairs_unmatched() {
        let pop = Population::new("p", vec![agent(0, 0), agent(1, 0).with_accessibility(true)]);
        let mut gs = groups(1);
        assert!(gs[0].try_add(AgentId(0), pop.get(AgentId(0))));
        let s = scorer();
        let outcome = SuiteRound::new(&s, &pop, true)
            .run(1, &mut gs, &[0], &[AgentId(1)])
            .unwrap();
        assert_eq!(outcome.unmatched, vec![AgentId(1)]);
        assert!(!gs[0].is_accessibility());
    }
}
