//! Sets of resource-pool labels.

use std::collections::BTreeSet;

/// The pools an agent or group may be assigned to.
///
/// `Any` is the universal set; intersecting it with another set yields the
/// other set. A group starts at `Any` and only shrinks as occupants join.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PoolSet {
    #[default]
    Any,
    Only(BTreeSet<String>),
}

impl PoolSet {
    /// Builds a restricted set from labels.
    pub fn only<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PoolSet::Only(labels.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, label: &str) -> bool {
        match self {
            PoolSet::Any => true,
            PoolSet::Only(set) => set.contains(label),
        }
    }

    /// True only for a restricted set with no labels.
    pub fn is_empty(&self) -> bool {
        matches!(self, PoolSet::Only(set) if set.is_empty())
    }

    pub fn intersect(&self, other: &PoolSet) -> PoolSet {
        match (self, other) {
            (PoolSet::Any, x) | (x, PoolSet::Any) => x.clone(),
            (PoolSet::Only(a), PoolSet::Only(b)) => {
                PoolSet::Only(a.intersection(b).cloned().collect())
            }
        }
    }

    /// True when the two sets share at least one label.
    pub fn overlaps(&self, other: &PoolSet) -> bool {
        match (self, other) {
            (PoolSet::Any, x) | (x, PoolSet::Any) => !x.is_empty(),
            (PoolSet::Only(a), PoolSet::Only(b)) => a.intersection(b).next().is_some(),
        }
    }

    /// Labels of a restricted set, `None` for `Any`.
    pub fn labels(&self) -> Option<&BTreeSet<String>> {
        match self {
            PoolSet::Any => None,
            PoolSet::Only(set) => Some(set),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_is_identity() {
        let elm = PoolSet::only(["Elm"]);
        assert_eq!(PoolSet::Any.intersect(&elm), elm);
        assert_eq!(elm.intersect(&PoolSet::Any), elm);
        assert_eq!(PoolSet::Any.intersect(&PoolSet::Any), PoolSet::Any);
    }

    #[test]
    fn test_intersection_shrinks() {
        let a = PoolSet::only(["Saga", "Elm"]);
        let b = PoolSet::only(["Elm", "Cendana"]);
        assert_eq!(a.intersect(&b), PoolSet::only(["Elm"]));
        assert!(a.overlaps(&b));

        let c = PoolSet::only(["Cendana"]);
        assert!(!a.overlaps(&c));
        assert!(a.intersect(&c).is_empty());
    }

    #[test]
    fn test_empty_only_overlaps_nothing() {
        let empty = PoolSet::only(Vec::<String>::new());
        assert!(empty.is_empty());
        assert!(!empty.overlaps(&PoolSet::Any));
        assert!(!PoolSet::Any.is_empty());
    }
}
