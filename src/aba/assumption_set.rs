use super::BipolarABAFramework;
use std::collections::BTreeSet;

/// A set of assumptions of a framework.
///
/// Assumptions are stored through their indices in the framework they come from,
/// so an assumption set is only meaningful together with this framework.
/// Sets are obtained from framework methods (see [BipolarABAFramework::assumption_set])
/// or returned by the reasoning functions.
///
/// Assumption indices follow the lexicographic order of the keys,
/// so iterating over a set gives the assumptions ordered by key.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssumptionSet(BTreeSet<usize>);

/// An alias for assumption sets, used when the set is the outcome of a semantics.
pub type Extension = AssumptionSet;

impl AssumptionSet {
    /// Builds an empty assumption set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self(ids.into_iter().collect())
    }

    pub(crate) fn singleton(id: usize) -> Self {
        Self(BTreeSet::from([id]))
    }

    pub(crate) fn insert(&mut self, id: usize) -> bool {
        self.0.insert(id)
    }

    pub(crate) fn with(&self, id: usize) -> Self {
        let mut s = self.clone();
        s.0.insert(id);
        s
    }

    /// Returns the number of assumptions in this set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` iff this set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the indices of the assumptions in this set, in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Returns `true` iff the assumption with the given index is in this set.
    pub fn contains(&self, id: usize) -> bool {
        self.0.contains(&id)
    }

    /// Returns `true` iff all the assumptions of this set are in the other one.
    pub fn is_subset(&self, other: &AssumptionSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Returns `true` iff this set is a subset of the other one, and the sets are different.
    pub fn is_strict_subset(&self, other: &AssumptionSet) -> bool {
        self.len() < other.len() && self.is_subset(other)
    }

    /// Returns `true` iff the sets share at least one assumption.
    pub fn intersects(&self, other: &AssumptionSet) -> bool {
        let (small, big) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().any(|id| big.contains(id))
    }

    /// Returns the assumptions that are in both sets.
    pub fn intersection(&self, other: &AssumptionSet) -> AssumptionSet {
        Self(self.0.intersection(&other.0).copied().collect())
    }

    /// Returns the assumptions that are in at least one of the sets.
    pub fn union(&self, other: &AssumptionSet) -> AssumptionSet {
        Self(self.0.union(&other.0).copied().collect())
    }

    pub(crate) fn max_id(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Returns the keys of the assumptions in this set, ordered.
    ///
    /// # Panics
    ///
    /// Panics if the set was not built for this framework.
    pub fn keys<'a>(&self, framework: &'a BipolarABAFramework) -> Vec<&'a str> {
        self.iter()
            .map(|id| framework.assumption(id).key())
            .collect()
    }
}

impl FromIterator<usize> for AssumptionSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self::from_ids(iter)
    }
}
