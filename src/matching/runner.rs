//! Deferred-acceptance runner.

use super::types::{Preferences, StableMatching};
use crate::error::{Error, Result};
use std::collections::VecDeque;
use tracing::trace;

/// Quota-aware deferred acceptance (Gale–Shapley).
///
/// A member with quota `q` behaves like `q` unit slots sharing one
/// preference list. Every free proposer slot sits in a FIFO queue; a popped
/// slot proposes to the next acceptor on its owner's list. An acceptor holds
/// at most its quota and, when full, evicts its worst held proposer if the
/// newcomer ranks better. The evicted slot goes back on the queue. A slot
/// whose owner has exhausted its list stays unmatched.
///
/// The queue order and all tie-breaks depend only on indices, so repeated
/// runs on the same input give the same matching.
///
/// # Examples
///
/// ```
/// use suite_alloc::matching::{DeferredAcceptance, Preferences};
///
/// let proposers = Preferences::new(vec![vec![0, 1], vec![0, 1]]);
/// let acceptors = Preferences::new(vec![vec![1, 0], vec![0, 1]]);
/// let matching = DeferredAcceptance::new(proposers, acceptors).run().unwrap();
///
/// assert_eq!(matching.partner_of_proposer(0), Some(1));
/// assert_eq!(matching.partner_of_proposer(1), Some(0));
/// ```
#[derive(Debug, Clone)]
pub struct DeferredAcceptance {
    proposers: Preferences,
    acceptors: Preferences,
    proposer_quotas: Vec<usize>,
    acceptor_quotas: Vec<usize>,
}

impl DeferredAcceptance {
    /// Creates a one-to-one instance: every quota is 1.
    pub fn new(proposers: Preferences, acceptors: Preferences) -> Self {
        let proposer_quotas = vec![1; proposers.len()];
        let acceptor_quotas = vec![1; acceptors.len()];
        Self {
            proposers,
            acceptors,
            proposer_quotas,
            acceptor_quotas,
        }
    }

    /// Sets how many acceptors each proposer may hold.
    pub fn with_proposer_quotas(mut self, quotas: Vec<usize>) -> Self {
        self.proposer_quotas = quotas;
        self
    }

    /// Sets how many proposers each acceptor may hold.
    pub fn with_acceptor_quotas(mut self, quotas: Vec<usize>) -> Self {
        self.acceptor_quotas = quotas;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.proposer_quotas.len() != self.proposers.len() {
            return Err(Error::InvalidConfig(format!(
                "{} proposer quotas for {} proposers",
                self.proposer_quotas.len(),
                self.proposers.len()
            )));
        }
        if self.acceptor_quotas.len() != self.acceptors.len() {
            return Err(Error::InvalidConfig(format!(
                "{} acceptor quotas for {} acceptors",
                self.acceptor_quotas.len(),
                self.acceptors.len()
            )));
        }
        let check = |side: &str, prefs: &Preferences, bound: usize| -> Result<()> {
            for member in 0..prefs.len() {
                let list = prefs.list(member);
                if let Some(&bad) = list.iter().find(|&&p| p >= bound) {
                    return Err(Error::InvalidConfig(format!(
                        "{side} {member} ranks unknown partner {bad}"
                    )));
                }
                let mut seen = vec![false; bound];
                for &p in list {
                    if std::mem::replace(&mut seen[p], true) {
                        return Err(Error::InvalidConfig(format!(
                            "{side} {member} ranks partner {p} twice"
                        )));
                    }
                }
            }
            Ok(())
        };
        check("proposer", &self.proposers, self.acceptors.len())?;
        check("acceptor", &self.acceptors, self.proposers.len())?;
        Ok(())
    }

    /// Runs the algorithm to completion.
    ///
    /// Fails only on malformed input: quota vectors of the wrong length, or
    /// lists naming out-of-range or repeated partners.
    pub fn run(&self) -> Result<StableMatching> {
        self.validate()?;

        let n_p = self.proposers.len();
        let n_a = self.acceptors.len();
        let acceptor_rank = self.acceptors.rank_table(n_p);

        let mut next = vec![0usize; n_p];
        let mut held: Vec<Vec<usize>> = vec![Vec::new(); n_a];
        let mut proposer_partners: Vec<Vec<usize>> = vec![Vec::new(); n_p];
        let mut queue: VecDeque<usize> = VecDeque::new();
        for (p, &q) in self.proposer_quotas.iter().enumerate() {
            queue.extend(std::iter::repeat(p).take(q));
        }

        let mut proposals = 0;
        while let Some(p) = queue.pop_front() {
            let list = self.proposers.list(p);
            let Some(&a) = list.get(next[p]) else {
                continue;
            };
            next[p] += 1;
            proposals += 1;

            let Some(rank_p) = acceptor_rank[a][p] else {
                queue.push_back(p);
                continue;
            };

            if held[a].len() < self.acceptor_quotas[a] {
                held[a].push(p);
                proposer_partners[p].push(a);
                trace!(proposer = p, acceptor = a, "held");
                continue;
            }

            // Worst held proposer; ranks are distinct so the maximum is unique.
            let worst = held[a]
                .iter()
                .enumerate()
                .filter_map(|(slot, &h)| acceptor_rank[a][h].map(|r| (r, slot, h)))
                .max_by_key(|&(r, _, _)| r);
            match worst {
                Some((worst_rank, slot, evicted)) if rank_p < worst_rank => {
                    held[a][slot] = p;
                    proposer_partners[evicted].retain(|&x| x != a);
                    proposer_partners[p].push(a);
                    queue.push_back(evicted);
                    trace!(proposer = p, acceptor = a, evicted, "swapped");
                }
                _ => queue.push_back(p),
            }
        }

        for partners in proposer_partners.iter_mut().chain(held.iter_mut()) {
            partners.sort_unstable();
        }
        Ok(StableMatching {
            proposer_partners,
            acceptor_partners: held,
            proposals,
        })
    }

    /// Pairs that would both rather be matched to each other.
    ///
    /// A pair `(p, a)` blocks when each finds the other acceptable, they are
    /// not matched, and each either has a free slot or prefers the other to
    /// its worst current partner. Empty for every output of [`run`](Self::run).
    pub fn blocking_pairs(&self, matching: &StableMatching) -> Vec<(usize, usize)> {
        let n_p = self.proposers.len();
        let n_a = self.acceptors.len();
        let proposer_rank = self.proposers.rank_table(n_a);
        let acceptor_rank = self.acceptors.rank_table(n_p);

        let worst = |ranks: &[Option<usize>], partners: &[usize]| -> Option<usize> {
            partners.iter().filter_map(|&x| ranks[x]).max()
        };

        let mut blocking = Vec::new();
        for p in 0..n_p {
            let mine = matching.proposer_partners(p);
            let p_free = mine.len() < self.proposer_quotas[p];
            let p_worst = worst(&proposer_rank[p], mine);
            for a in 0..n_a {
                if mine.contains(&a) {
                    continue;
                }
                let (Some(rp), Some(ra)) = (proposer_rank[p][a], acceptor_rank[a][p]) else {
                    continue;
                };
                let theirs = matching.acceptor_partners(a);
                let a_free = theirs.len() < self.acceptor_quotas[a];
                let a_worst = worst(&acceptor_rank[a], theirs);

                let p_wants = p_free || p_worst.is_some_and(|w| rp < w);
                let a_wants = a_free || a_worst.is_some_and(|w| ra < w);
                if p_wants && a_wants {
                    blocking.push((p, a));
                }
            }
        }
        blocking
    }
}
