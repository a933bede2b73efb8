//! Demographic diversity sub-scores.
//!
//! All scores are higher-is-better in [0, 1].

use super::config::{Composition, CountryExclusion};
use crate::model::Agent;
use std::collections::BTreeSet;

/// Ratio bands as `(low, high, score)`: a `local:international` ratio within
/// `[low/high, high/low]` earns `score`. Checked in order.
const CITIZENSHIP_BANDS: [(usize, usize, f64); 5] = [
    (2, 3, 1.0),
    (1, 2, 0.5),
    (1, 3, 0.3),
    (1, 4, 0.25),
    (1, 5, 0.2),
];

const COUNTRY_DUPLICATE_STEPS: [f64; 2] = [1.0, 0.5];

const SCHOOL_DUPLICATE_STEPS: [f64; 5] = [1.0, 0.5, 0.3, 0.2, 0.1];

/// Counts local and international agents.
pub fn composition(agents: &[&Agent]) -> Composition {
    let local = agents.iter().filter(|a| a.is_local()).count();
    Composition::new(local, agents.len() - local)
}

/// Scores the local:international ratio.
///
/// 1.0 inside `[2:3, 3:2]`, stepping down through `[1:2, 2:1]`, `[1:3, 3:1]`,
/// `[1:4, 4:1]`, `[1:5, 5:1]`, and 0 outside. A group with no international
/// agents scores 0.
pub fn citizenship_ratio_score(composition: Composition) -> f64 {
    let (l, i) = (composition.local, composition.international);
    if i == 0 {
        return 0.0;
    }
    CITIZENSHIP_BANDS
        .iter()
        .find(|&&(low, high, _)| l * high >= i * low && l * low <= i * high)
        .map_or(0.0, |&(_, _, score)| score)
}

/// Number of repeated entries: total minus distinct.
pub fn duplicate_count<'a, I>(items: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = BTreeSet::new();
    let mut total = 0;
    for item in items {
        seen.insert(item);
        total += 1;
    }
    total - seen.len()
}

/// Repeated residency countries among international agents.
pub fn overseas_duplicates(agents: &[&Agent]) -> usize {
    duplicate_count(
        agents
            .iter()
            .filter(|a| !a.is_local())
            .flat_map(|a| a.countries().iter().map(String::as_str)),
    )
}

/// Repeated schools among all agents.
pub fn school_duplicates(agents: &[&Agent]) -> usize {
    duplicate_count(agents.iter().map(|a| a.school()))
}

pub fn country_duplication_score(duplicates: usize) -> f64 {
    COUNTRY_DUPLICATE_STEPS
        .get(duplicates)
        .copied()
        .unwrap_or(0.0)
}

pub fn school_duplication_score(duplicates: usize) -> f64 {
    SCHOOL_DUPLICATE_STEPS
        .get(duplicates)
        .copied()
        .unwrap_or(0.0)
}

/// Number of exclusion rules violated by two distinct agents of the set.
pub fn exclusion_violations(agents: &[&Agent], rules: &[CountryExclusion]) -> usize {
    rules
        .iter()
        .filter(|rule| {
            agents.iter().enumerate().any(|(i, a)| {
                agents.iter().enumerate().any(|(j, b)| {
                    i != j
                        && a.countries().contains(rule.first())
                        && b.countries().contains(rule.second())
                })
            })
        })
        .count()
}
