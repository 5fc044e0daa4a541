use super::{
    extension_enumerator::finish_enumeration, search_listener::SearchMonitor, CandidateFilter,
    EnumerationResult, ExtensionEnumerator, SearchListener,
};
use crate::aba::{AssumptionSet, Reasoner};
use anyhow::Result;
use log::debug;
use std::{collections::HashSet, rc::Rc};

/// An enumerator exploring the sets of assumptions with a depth-first search.
///
/// Assumptions are considered in the order of their keys.
/// A node of the search is the explicit set of the chosen assumptions; the candidate it stands for is its closure.
/// A node is extended with an assumption only if the closure of the extension is conflict-free
/// and contains no assumption with an attacker no assumption counter-attacks.
/// Since both properties are inherited by the subsets of admissible sets, no admissible set is missed.
/// Self-defense is not inherited by subsets, so it is only checked on the candidates.
#[derive(Default)]
pub struct ExhaustiveEnumerator {
    monitor: SearchMonitor,
}

struct SearchState<'r, 'a, 'f> {
    reasoner: &'r mut Reasoner<'a>,
    filter: &'f mut dyn CandidateFilter,
    undefendable: Vec<bool>,
    visited: HashSet<AssumptionSet>,
    evaluated: HashSet<AssumptionSet>,
    found: Vec<AssumptionSet>,
}

impl ExhaustiveEnumerator {
    fn search(&mut self, state: &mut SearchState, current: AssumptionSet, start: usize) {
        if !state.visited.insert(current.clone()) {
            return;
        }
        self.monitor.node_visited();
        let closure = state.reasoner.closure_unchecked(&current);
        if state.evaluated.insert(closure.clone())
            && state.reasoner.is_admissible_unchecked(&closure)
            && state.filter.keep(state.reasoner, &closure)
        {
            self.monitor.candidate_found();
            state.found.push(closure.clone());
        }
        let n = state.undefendable.len();
        for i in start..n {
            if closure.contains(i) {
                continue;
            }
            let next = current.with(i);
            let next_closure = state.reasoner.closure_unchecked(&next);
            if next_closure.iter().any(|a| state.undefendable[a])
                || !state.reasoner.conflict_free_unchecked(&next_closure)
            {
                continue;
            }
            self.search(state, next, i + 1);
        }
    }
}

fn compute_undefendable(reasoner: &mut Reasoner) -> Vec<bool> {
    let n = reasoner.framework().n_assumptions();
    let ranges = (0..n)
        .map(|c| reasoner.attacked_by_closure(&AssumptionSet::singleton(c)))
        .collect::<Vec<_>>();
    (0..n)
        .map(|a| {
            reasoner
                .closed_attackers_unchecked(a)
                .iter()
                .any(|b| ranges.iter().all(|r| !r.intersects(b)))
        })
        .collect()
}

impl ExtensionEnumerator for ExhaustiveEnumerator {
    fn enumerate(
        &mut self,
        reasoner: &mut Reasoner,
        filter: &mut dyn CandidateFilter,
        need_maximal: bool,
    ) -> Result<EnumerationResult> {
        self.monitor.reset();
        let undefendable = compute_undefendable(reasoner);
        debug!(
            "starting exhaustive search; {} assumption(s) cannot be defended",
            undefendable.iter().filter(|b| **b).count()
        );
        let mut state = SearchState {
            reasoner,
            filter,
            undefendable,
            visited: HashSet::new(),
            evaluated: HashSet::new(),
            found: vec![],
        };
        self.search(&mut state, AssumptionSet::new(), 0);
        let found = std::mem::take(&mut state.found);
        Ok(finish_enumeration(&mut self.monitor, found, need_maximal))
    }

    fn add_listener(&mut self, listener: Rc<dyn SearchListener>) {
        self.monitor.add_listener(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        aba::{test_frameworks::*, BipolarABAFramework},
        solvers::AcceptAllFilter,
    };

    fn admissible_keys(fw: &BipolarABAFramework, need_maximal: bool) -> Vec<Vec<&str>> {
        let mut reasoner = Reasoner::new(fw);
        ExhaustiveEnumerator::default()
            .enumerate(&mut reasoner, &mut AcceptAllFilter, need_maximal)
            .unwrap()
            .extensions
            .iter()
            .map(|s| s.keys(fw))
            .collect()
    }

    #[test]
    fn test_scenario_a() {
        let fw = scenario_a();
        assert_eq!(vec![vec![], vec!["b"]], admissible_keys(&fw, false));
        assert_eq!(vec![vec!["b"]], admissible_keys(&fw, true));
    }

    #[test]
    fn test_scenario_b() {
        let fw = scenario_b();
        assert_eq!(
            vec![vec![], vec!["a"], vec!["b"]],
            admissible_keys(&fw, false)
        );
        assert_eq!(vec![vec!["a"], vec!["b"]], admissible_keys(&fw, true));
    }

    #[test]
    fn test_scenario_c() {
        let fw = scenario_c();
        assert_eq!(
            vec![vec![], vec!["a", "b", "c"], vec!["b", "c"], vec!["c"]],
            admissible_keys(&fw, false)
        );
    }

    #[test]
    fn test_mutual_defense() {
        // a and b are attacked by c and d respectively; b attacks c and a attacks d
        let fw = framework_from(
            &["a", "b", "c", "d"],
            &[],
            &[],
            &[("a", "c"), ("b", "d"), ("c", "b"), ("d", "a")],
        );
        let keys = admissible_keys(&fw, false);
        assert!(keys.contains(&vec!["a", "b"]));
        assert!(!keys.contains(&vec!["a"]));
    }

    #[test]
    fn test_stats() {
        let fw = scenario_b();
        let mut reasoner = Reasoner::new(&fw);
        let result = ExhaustiveEnumerator::default()
            .enumerate(&mut reasoner, &mut AcceptAllFilter, false)
            .unwrap();
        assert_eq!(3, result.stats.n_candidates);
        assert_eq!(3, result.stats.n_results);
        assert_eq!(3, result.stats.n_nodes_visited);
    }
}
