//! Preference lists and matching results.

/// Ranks candidate indices by score, lower first.
///
/// Ties keep index order, so the ranking never depends on anything but the
/// scores themselves.
///
/// # Examples
///
/// ```
/// use suite_alloc::matching::rank_by_score;
///
/// assert_eq!(rank_by_score(&[0.5, 0.1, 0.5, 0.0]), vec![3, 1, 0, 2]);
/// ```
pub fn rank_by_score(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));
    order
}

/// Ranked partner lists for every member of one side.
///
/// `list(i)` is member `i`'s acceptable partners, most preferred first.
/// Partners absent from a list are unacceptable to that member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preferences {
    lists: Vec<Vec<usize>>,
}

impl Preferences {
    pub fn new(lists: Vec<Vec<usize>>) -> Self {
        Self { lists }
    }

    /// Builds full rankings from a score function, lower is better.
    ///
    /// Row `i` ranks every column `j` in `0..cols` by `score(i, j)`.
    pub fn from_scores<F>(rows: usize, cols: usize, mut score: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let lists = (0..rows)
            .map(|i| {
                let row: Vec<f64> = (0..cols).map(|j| score(i, j)).collect();
                rank_by_score(&row)
            })
            .collect();
        Self { lists }
    }

    /// Number of members on this side.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn list(&self, member: usize) -> &[usize] {
        &self.lists[member]
    }

    /// Position of each partner in each member's list; `None` if unacceptable.
    pub(crate) fn rank_table(&self, partners: usize) -> Vec<Vec<Option<usize>>> {
        self.lists
            .iter()
            .map(|list| {
                let mut ranks = vec![None; partners];
                for (pos, &p) in list.iter().enumerate() {
                    if p < partners && ranks[p].is_none() {
                        ranks[p] = Some(pos);
                    }
                }
                ranks
            })
            .collect()
    }
}

/// Result of a deferred-acceptance run.
///
/// Partner lists are sorted by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StableMatching {
    pub(crate) proposer_partners: Vec<Vec<usize>>,
    pub(crate) acceptor_partners: Vec<Vec<usize>>,
    pub(crate) proposals: usize,
}

impl StableMatching {
    /// Acceptors held by proposer `p`.
    pub fn proposer_partners(&self, p: usize) -> &[usize] {
        &self.proposer_partners[p]
    }

    /// Proposers held by acceptor `a`.
    pub fn acceptor_partners(&self, a: usize) -> &[usize] {
        &self.acceptor_partners[a]
    }

    /// The single partner of a unit-quota proposer.
    pub fn partner_of_proposer(&self, p: usize) -> Option<usize> {
        self.proposer_partners[p].first().copied()
    }

    /// The single partner of a unit-quota acceptor.
    pub fn partner_of_acceptor(&self, a: usize) -> Option<usize> {
        self.acceptor_partners[a].first().copied()
    }

    /// All matched `(proposer, acceptor)` pairs in proposer order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.proposer_partners
            .iter()
            .enumerate()
            .flat_map(|(p, partners)| partners.iter().map(move |&a| (p, a)))
    }

    pub fn matched_count(&self) -> usize {
        self.proposer_partners.iter().map(Vec::len).sum()
    }

    /// Proposers that ended with no partner.
    pub fn unmatched_proposers(&self) -> Vec<usize> {
        (0..self.proposer_partners.len())
            .filter(|&p| self.proposer_partners[p].is_empty())
            .collect()
    }

    /// Acceptors that ended with no partner.
    pub fn unmatched_acceptors(&self) -> Vec<usize> {
        (0..self.acceptor_partners.len())
            .filter(|&a| self.acceptor_partners[a].is_empty())
            .collect()
    }

    /// Number of proposals made before the queue emptied.
    pub fn proposals(&self) -> usize {
        self.proposals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_by_score_stable_ties() {
        assert_eq!(rank_by_score(&[1.0, 1.0, 1.0]), vec![0, 1, 2]);
        assert_eq!(rank_by_score(&[2.0, -1.0, 2.0, 0.0]), vec![1, 3, 0, 2]);
        assert!(rank_by_score(&[]).is_empty());
    }

    #[test]
    fn test_from_scores() {
        let prefs = Preferences::from_scores(2, 3, |i, j| ((i + j) % 3) as f64);
        assert_eq!(prefs.list(0), &[0, 1, 2]);
        assert_eq!(prefs.list(1), &[2, 0, 1]);
    }

    #[test]
    fn test_rank_table_marks_unacceptable() {
        let prefs = Preferences::new(vec![vec![2, 0], vec![]]);
        let table = prefs.rank_table(3);
        assert_eq!(table[0], vec![Some(1), None, Some(0)]);
        assert_eq!(table[1], vec![None, None, None]);
    }
}
