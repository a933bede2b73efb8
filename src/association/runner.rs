//! Group pairing and pool assignment.

use super::config::AssociationConfig;
use super::pools::{PoolDemand, PoolLedger, PoolUsage, ResourcePool};
use crate::allocation::Allocation;
use crate::error::{Error, Result};
use crate::matching::{rank_by_score, DeferredAcceptance, Preferences};
use crate::model::{GroupSlot, PoolSet, Population};
use crate::random::rng_from;
use crate::scoring::Scorer;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

/// The finalized groups of one population.
#[derive(Debug, Clone, Copy)]
pub struct GroupSide<'a> {
    pub population: &'a Population,
    pub groups: &'a [GroupSlot],
}

impl<'a> GroupSide<'a> {
    pub fn new(population: &'a Population, groups: &'a [GroupSlot]) -> Self {
        Self { population, groups }
    }

    pub fn from_allocation(population: &'a Population, allocation: &'a Allocation) -> Self {
        Self::new(population, &allocation.groups)
    }
}

/// A pair of groups, or a single unpaired group, placed in one pool.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Association {
    pub label: String,
    /// Index of the member group on the first side.
    pub first: Option<usize>,
    /// Index of the member group on the second side.
    pub second: Option<usize>,
    /// Label of the assigned pool.
    pub pool: String,
    /// Pairing score (lower is better); `None` for a singleton.
    pub score: Option<f64>,
}

impl Association {
    pub fn is_pair(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }
}

/// Export row describing one association.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssociationReport {
    pub label: String,
    /// Labels of the member groups.
    pub members: Vec<String>,
    pub pool: String,
}

/// Result of the association stage.
#[derive(Debug, Clone)]
pub struct AssociationResult {
    /// Associations in label order.
    pub associations: Vec<Association>,
    /// Consumption of every pool.
    pub pool_usage: Vec<PoolUsage>,
    /// Randomized assignment attempts that hit a dead end.
    pub restarts: usize,
    /// Whether the fallback search produced the assignment.
    pub used_search: bool,
}

impl AssociationResult {
    pub fn singletons(&self) -> usize {
        self.associations.iter().filter(|a| !a.is_pair()).count()
    }

    pub fn reports(&self, first: GroupSide<'_>, second: GroupSide<'_>) -> Vec<AssociationReport> {
        self.associations
            .iter()
            .map(|a| {
                let members = a
                    .first
                    .map(|i| first.groups[i].label().to_string())
                    .into_iter()
                    .chain(a.second.map(|j| second.groups[j].label().to_string()))
                    .collect();
                AssociationReport {
                    label: a.label.clone(),
                    members,
                    pool: a.pool.clone(),
                }
            })
            .collect()
    }
}

/// An association before pool assignment.
struct Draft {
    first: Option<usize>,
    second: Option<usize>,
    score: Option<f64>,
    demand: PoolDemand,
    eligible: PoolSet,
}

/// Pairs the groups of two populations and assigns every association to a
/// resource pool.
///
/// Pairing is one-to-one deferred acceptance over
/// [`Scorer::association_score`]. Two groups with no common declared pool
/// never pair. Pool assignment draws uniformly among the pools that are
/// eligible and have room, in a random association order; a dead end
/// restarts the draw, and once the restart budget is spent a bounded
/// depth-first search takes over.
pub struct AssociationMatcher;

impl AssociationMatcher {
    #[instrument(skip_all, fields(
        first = first.population.name(),
        second = second.population.name(),
        pools = config.pools.len()
    ))]
    pub fn run(
        scorer: &Scorer,
        first: GroupSide<'_>,
        second: GroupSide<'_>,
        config: &AssociationConfig,
    ) -> Result<AssociationResult> {
        config.validate()?;
        check_preconditions(first, second, config)?;
        let mut rng = rng_from(config.seed);

        let mut drafts = pair_groups(scorer, first, second, config)?;
        drafts.shuffle(&mut rng);
        debug!(
            associations = drafts.len(),
            pairs = drafts.iter().filter(|d| d.first.is_some() && d.second.is_some()).count(),
            "groups paired"
        );

        let labels: Vec<String> = (0..drafts.len())
            .map(|i| config.association_label(i))
            .collect();
        let (assignment, restarts, used_search, usage) =
            assign_pools(&drafts, &labels, first, second, config, &mut rng)?;

        let associations: Vec<Association> = drafts
            .into_iter()
            .zip(labels)
            .zip(assignment)
            .map(|((d, label), pool)| Association {
                label,
                first: d.first,
                second: d.second,
                pool: config.pools[pool].label().to_string(),
                score: d.score,
            })
            .collect();
        info!(
            associations = associations.len(),
            restarts, used_search, "associations assigned"
        );
        Ok(AssociationResult {
            associations,
            pool_usage: usage,
            restarts,
            used_search,
        })
    }
}

fn check_preconditions(
    first: GroupSide<'_>,
    second: GroupSide<'_>,
    config: &AssociationConfig,
) -> Result<()> {
    for side in [first, second] {
        for agent in side.population.agents() {
            if !config.declares(agent.eligible_pools()) {
                return Err(Error::NoEligiblePool {
                    agent: agent.key().to_string(),
                });
            }
        }
    }

    let groups = || first.groups.iter().chain(second.groups);
    let accessibility = groups().filter(|g| g.is_accessibility()).count();
    config.check_capacity(groups().count() - accessibility, accessibility)
}

fn pair_groups(
    scorer: &Scorer,
    first: GroupSide<'_>,
    second: GroupSide<'_>,
    config: &AssociationConfig,
) -> Result<Vec<Draft>> {
    let first_members: Vec<_> = first
        .groups
        .iter()
        .map(|g| first.population.resolve(g.occupants()))
        .collect();
    let second_members: Vec<_> = second
        .groups
        .iter()
        .map(|g| second.population.resolve(g.occupants()))
        .collect();

    // scores[i][j]: first group i with second group j; None if they share
    // no declared pool.
    let scores: Vec<Vec<Option<f64>>> = first
        .groups
        .iter()
        .enumerate()
        .map(|(i, a)| {
            second
                .groups
                .iter()
                .enumerate()
                .map(|(j, b)| {
                    config.declares(&a.eligible_pools().intersect(b.eligible_pools())).then(
                        || scorer.association_score(a, &first_members[i], b, &second_members[j]),
                    )
                })
                .collect()
        })
        .collect();

    let acceptable = |row: Vec<Option<f64>>| -> Vec<usize> {
        let keep: Vec<bool> = row.iter().map(Option::is_some).collect();
        let dense: Vec<f64> = row.into_iter().map(|s| s.unwrap_or(f64::INFINITY)).collect();
        rank_by_score(&dense)
            .into_iter()
            .filter(|&k| keep[k])
            .collect()
    };
    let first_lists: Vec<Vec<usize>> = scores.iter().map(|row| acceptable(row.clone())).collect();
    let second_lists: Vec<Vec<usize>> = (0..second.groups.len())
        .map(|j| acceptable(scores.iter().map(|row| row[j]).collect()))
        .collect();

    let matching = if config.first_proposes {
        DeferredAcceptance::new(Preferences::new(first_lists), Preferences::new(second_lists)).run()?
    } else {
        DeferredAcceptance::new(Preferences::new(second_lists), Preferences::new(first_lists)).run()?
    };
    let partner_of_first = |i: usize| {
        if config.first_proposes {
            matching.partner_of_proposer(i)
        } else {
            matching.partner_of_acceptor(i)
        }
    };

    let mut drafts = Vec::new();
    let mut second_paired = vec![false; second.groups.len()];
    for (i, a) in first.groups.iter().enumerate() {
        match partner_of_first(i) {
            Some(j) => {
                let b = &second.groups[j];
                second_paired[j] = true;
                drafts.push(Draft {
                    first: Some(i),
                    second: Some(j),
                    score: scores[i][j],
                    demand: PoolDemand::for_groups([a.is_accessibility(), b.is_accessibility()]),
                    eligible: a.eligible_pools().intersect(b.eligible_pools()),
                });
            }
            None => drafts.push(Draft {
                first: Some(i),
                second: None,
                score: None,
                demand: PoolDemand::for_groups([a.is_accessibility()]),
                eligible: a.eligible_pools().clone(),
            }),
        }
    }
    for (j, b) in second.groups.iter().enumerate() {
        if !second_paired[j] {
            drafts.push(Draft {
                first: None,
                second: Some(j),
                score: None,
                demand: PoolDemand::for_groups([b.is_accessibility()]),
                eligible: b.eligible_pools().clone(),
            });
        }
    }
    Ok(drafts)
}

type Assignment = (Vec<usize>, usize, bool, Vec<PoolUsage>);

fn assign_pools<R: Rng + ?Sized>(
    drafts: &[Draft],
    labels: &[String],
    first: GroupSide<'_>,
    second: GroupSide<'_>,
    config: &AssociationConfig,
    rng: &mut R,
) -> Result<Assignment> {
    let mut stuck: Option<usize> = None;
    let mut restarts = 0;

    for attempt in 0..config.restart_budget {
        let mut ledger = PoolLedger::new(&config.pools);
        let mut assignment = vec![usize::MAX; drafts.len()];
        let mut order: Vec<usize> = (0..drafts.len()).collect();
        order.shuffle(rng);

        let mut dead_end = None;
        for &k in &order {
            let candidates = ledger.candidates(&drafts[k].eligible, drafts[k].demand);
            if candidates.is_empty() {
                dead_end = Some(k);
                break;
            }
            let pool = candidates[rng.random_range(0..candidates.len())];
            if ledger.take(pool, drafts[k].demand) {
                assignment[k] = pool;
            }
        }
        match dead_end {
            None => return Ok((assignment, restarts, false, ledger.usage())),
            Some(k) => {
                restarts += 1;
                stuck = Some(k);
                warn!(attempt, association = %labels[k], "pool assignment dead end, restarting");
            }
        }
    }

    warn!(restarts, "randomized pool assignment exhausted, searching");
    if let Some((assignment, ledger)) = search(drafts, &config.pools, config.search_node_budget) {
        return Ok((assignment, restarts, true, ledger.usage()));
    }

    let k = stuck.unwrap_or_else(|| most_constrained(drafts, &config.pools));
    let fresh = PoolLedger::new(&config.pools);
    let draft = &drafts[k];
    Err(Error::PoolAssignmentInfeasible {
        association: labels[k].clone(),
        groups: draft
            .first
            .map(|i| first.groups[i].label().to_string())
            .into_iter()
            .chain(draft.second.map(|j| second.groups[j].label().to_string()))
            .collect(),
        candidates: fresh
            .candidates(&draft.eligible, draft.demand)
            .into_iter()
            .map(|p| config.pools[p].label().to_string())
            .collect(),
    })
}

/// Draft with the fewest pools able to host it on an empty ledger.
fn most_constrained(drafts: &[Draft], pools: &[ResourcePool]) -> usize {
    let fresh = PoolLedger::new(pools);
    (0..drafts.len())
        .min_by_key(|&k| fresh.candidates(&drafts[k].eligible, drafts[k].demand).len())
        .unwrap_or(0)
}

/// Depth-first search over pool choices, most constrained association
/// first, pools in declaration order. Gives up after `budget` pool trials.
fn search<'p>(
    drafts: &[Draft],
    pools: &'p [ResourcePool],
    budget: usize,
) -> Option<(Vec<usize>, PoolLedger<'p>)> {
    let mut ledger = PoolLedger::new(pools);
    let options: Vec<Vec<usize>> = drafts
        .iter()
        .map(|d| ledger.candidates(&d.eligible, d.demand))
        .collect();
    let mut order: Vec<usize> = (0..drafts.len()).collect();
    order.sort_by_key(|&k| options[k].len());

    let n = order.len();
    let mut assigned: Vec<Option<usize>> = vec![None; n];
    let mut cursor = vec![0usize; n];
    let mut pos = 0;
    let mut nodes = 0;
    while pos < n {
        let k = order[pos];
        if let Some(pool) = assigned[k].take() {
            ledger.release(pool, drafts[k].demand);
        }
        let mut placed = false;
        while cursor[pos] < options[k].len() {
            if nodes >= budget {
                return None;
            }
            nodes += 1;
            let pool = options[k][cursor[pos]];
            cursor[pos] += 1;
            if ledger.take(pool, drafts[k].demand) {
                assigned[k] = Some(pool);
                placed = true;
                break;
            }
        }
        if placed {
            pos += 1;
        } else {
            cursor[pos] = 0;
            if pos == 0 {
                return None;
            }
            pos -= 1;
        }
    }
    debug!(nodes, "pool search succeeded");
    let assignment = assigned.into_iter().map(|p| p.unwrap_or(usize::MAX)).collect();
    Some((assignment, ledger))
}
