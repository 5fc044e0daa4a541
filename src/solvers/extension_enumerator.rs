use super::{search_listener::SearchMonitor, SearchListener, SearchStats};
use crate::aba::{AssumptionSet, Reasoner};
use anyhow::Result;
use std::{cmp::Reverse, rc::Rc};

/// A trait for the additional predicates an admissible set must satisfy to be part of an enumeration result.
pub trait CandidateFilter {
    /// Returns `true` iff the admissible set must be kept.
    fn keep(&mut self, reasoner: &mut Reasoner, candidate: &AssumptionSet) -> bool;
}

/// A filter keeping all the admissible sets.
#[derive(Default)]
pub struct AcceptAllFilter;

impl CandidateFilter for AcceptAllFilter {
    fn keep(&mut self, _reasoner: &mut Reasoner, _candidate: &AssumptionSet) -> bool {
        true
    }
}

/// A filter keeping the sets equal to the closure of the assumptions they defend.
#[derive(Default)]
pub struct DefenseFixpointFilter;

impl CandidateFilter for DefenseFixpointFilter {
    fn keep(&mut self, reasoner: &mut Reasoner, candidate: &AssumptionSet) -> bool {
        reasoner.is_defense_fixpoint_unchecked(candidate)
    }
}

/// A filter keeping the set-stable sets (see [Reasoner::is_set_stable]).
#[derive(Default)]
pub struct SetStableFilter;

impl CandidateFilter for SetStableFilter {
    fn keep(&mut self, reasoner: &mut Reasoner, candidate: &AssumptionSet) -> bool {
        reasoner.is_set_stable_unchecked(candidate)
    }
}

/// A filter keeping the sets included in each set of a family.
pub struct SubsetOfAllFilter {
    family: Vec<AssumptionSet>,
}

impl SubsetOfAllFilter {
    /// Builds a new filter given the family of sets.
    pub fn new(family: Vec<AssumptionSet>) -> Self {
        Self { family }
    }
}

impl CandidateFilter for SubsetOfAllFilter {
    fn keep(&mut self, _reasoner: &mut Reasoner, candidate: &AssumptionSet) -> bool {
        self.family.iter().all(|s| candidate.is_subset(s))
    }
}

/// The outcome of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationResult {
    /// The (closed) sets found, without duplicates, in increasing order.
    pub extensions: Vec<AssumptionSet>,
    /// The statistics of the search.
    pub stats: SearchStats,
}

/// A trait for the algorithms enumerating the admissible sets satisfying a [CandidateFilter].
///
/// All the implementations compute the same sets; they only differ in the way they explore the search space.
pub trait ExtensionEnumerator {
    /// Enumerates the admissible sets kept by the filter.
    ///
    /// If `need_maximal` is set, only the ⊆-maximal sets among them are returned.
    fn enumerate(
        &mut self,
        reasoner: &mut Reasoner,
        filter: &mut dyn CandidateFilter,
        need_maximal: bool,
    ) -> Result<EnumerationResult>;

    /// Adds a listener warned about the progress of the searches.
    fn add_listener(&mut self, listener: Rc<dyn SearchListener>);
}

/// Keeps the sets that are not strict subsets of another one.
///
/// The sets are sorted by decreasing size, and a set is kept iff no set kept before is a strict superset of it.
/// The returned sets are sorted in increasing order.
pub fn filter_maximal(mut sets: Vec<AssumptionSet>) -> Vec<AssumptionSet> {
    sets.sort_unstable_by(|s1, s2| {
        Reverse(s1.len())
            .cmp(&Reverse(s2.len()))
            .then_with(|| s1.cmp(s2))
    });
    sets.dedup();
    let mut kept: Vec<AssumptionSet> = Vec::with_capacity(sets.len());
    for s in sets {
        if !kept.iter().any(|k| s.is_strict_subset(k)) {
            kept.push(s);
        }
    }
    kept.sort_unstable();
    kept
}

pub(crate) fn finish_enumeration(
    monitor: &mut SearchMonitor,
    mut found: Vec<AssumptionSet>,
    need_maximal: bool,
) -> EnumerationResult {
    if need_maximal {
        let before = found.len();
        found = filter_maximal(found);
        monitor.maximality_filtered(before, found.len());
    } else {
        found.sort_unstable();
    }
    EnumerationResult {
        stats: monitor.finish(found.len()),
        extensions: found,
    }
}
