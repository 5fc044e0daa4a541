use super::{search_listener::SearchMonitor, SearchListener, SearchStats};
use crate::{
    aba::{AssumptionSet, Reasoner},
    encodings::AdmissibilityConstraintsEncoder,
    sat::{self, CardinalityBound, SatSolver, SatSolverFactory},
};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::{collections::HashSet, rc::Rc};

/// The outcome of a top-k search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopKResult {
    /// The sets found, by non-increasing size.
    pub extensions: Vec<AssumptionSet>,
    /// The maximal size of an admissible set.
    pub max_size: usize,
    /// The statistics of the search.
    pub stats: SearchStats,
}

/// A search for the largest admissible sets.
///
/// The maximal size of an admissible set is determined by a binary search,
/// each step being a call to a fresh SAT solver with an `at least` cardinality constraint.
/// Then, sets are enumerated by decreasing size using `exactly` cardinality constraints
/// until the expected number of sets is reached.
pub struct TopKSearch<'f> {
    solver_factory: &'f dyn SatSolverFactory,
    encoder: AdmissibilityConstraintsEncoder,
    monitor: SearchMonitor,
}

impl<'f> TopKSearch<'f> {
    /// Builds a new top-k search.
    pub fn new(solver_factory: &'f dyn SatSolverFactory) -> Self {
        Self {
            solver_factory,
            encoder: AdmissibilityConstraintsEncoder::new(true),
            monitor: SearchMonitor::default(),
        }
    }

    /// Adds a listener warned about the progress of the searches.
    pub fn add_listener(&mut self, listener: Rc<dyn SearchListener>) {
        self.monitor.add_listener(listener)
    }

    fn new_solver(
        &mut self,
        reasoner: &mut Reasoner,
        bound: CardinalityBound,
    ) -> Box<dyn SatSolver> {
        let n = reasoner.framework().n_assumptions();
        let mut solver = self.solver_factory.new_solver();
        self.encoder.encode_constraints(reasoner, solver.as_mut());
        let n_card_clauses = sat::encode_cardinality(
            solver.as_mut(),
            &AdmissibilityConstraintsEncoder::assumption_lits(n),
            bound,
        );
        debug!(
            "added {} clauses for cardinality constraint {:?}",
            n_card_clauses, bound
        );
        solver
    }

    fn max_admissible_size(&mut self, reasoner: &mut Reasoner) -> Result<usize> {
        let mut lo = 0;
        let mut hi = reasoner.framework().n_assumptions();
        let mut best = 0;
        while lo <= hi {
            let mid = (lo + hi) / 2;
            let mut solver = self.new_solver(reasoner, CardinalityBound::AtLeast(mid));
            self.monitor.solver_called();
            let model = solver
                .solve()
                .into_model()
                .context("while searching the maximal size of admissible sets")?;
            if model.is_some() {
                best = mid;
                lo = mid + 1;
            } else if mid == 0 {
                break;
            } else {
                hi = mid - 1;
            }
        }
        debug!("the maximal size of an admissible set is {}", best);
        Ok(best)
    }

    /// Returns up to `k` admissible sets of maximal sizes.
    ///
    /// If `maximal_only` is set, the sets that are strict subsets of other admissible sets are discarded.
    /// In this case, the returned sets are preferred extensions.
    ///
    /// If `k` is zero, no set is returned.
    pub fn search(
        &mut self,
        reasoner: &mut Reasoner,
        k: usize,
        maximal_only: bool,
    ) -> Result<TopKResult> {
        self.monitor.reset();
        if k == 0 {
            return Ok(TopKResult {
                extensions: vec![],
                max_size: 0,
                stats: self.monitor.finish(0),
            });
        }
        let n = reasoner.framework().n_assumptions();
        let max_size = self.max_admissible_size(reasoner)?;
        let mut seen: Vec<AssumptionSet> = vec![];
        let mut extensions = vec![];
        'sizes: for size in (0..=max_size).rev() {
            let mut solver = self.new_solver(reasoner, CardinalityBound::Exactly(size));
            let mut seen_at_size = HashSet::new();
            let mut at_size = vec![];
            loop {
                self.monitor.solver_called();
                let model = match solver
                    .solve()
                    .into_model()
                    .context("while enumerating admissible sets of a given size")?
                {
                    Some(m) => m,
                    None => break,
                };
                self.monitor.node_visited();
                let set = AdmissibilityConstraintsEncoder::assignment_to_set(&model, n);
                let blocking = set
                    .iter()
                    .map(|i| AdmissibilityConstraintsEncoder::assumption_to_lit(i).negate())
                    .collect::<Vec<_>>();
                if seen_at_size.insert(set.clone()) {
                    if !reasoner.is_admissible_unchecked(&set) {
                        warn!("discarding a non admissible model of size {}", size);
                    } else if !maximal_only || !seen.iter().any(|s| set.is_strict_subset(s)) {
                        self.monitor.candidate_found();
                        extensions.push(set.clone());
                        if extensions.len() == k {
                            break 'sizes;
                        }
                    }
                    at_size.push(set);
                }
                if blocking.is_empty() {
                    break;
                }
                solver.add_clause(blocking);
            }
            seen.append(&mut at_size);
        }
        Ok(TopKResult {
            stats: self.monitor.finish(extensions.len()),
            extensions,
            max_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        aba::{test_frameworks::*, BipolarABAFramework},
        sat::DefaultSatSolverFactory,
    };

    fn top_k(fw: &BipolarABAFramework, k: usize, maximal_only: bool) -> TopKResult {
        let factory = DefaultSatSolverFactory;
        let mut reasoner = Reasoner::new(fw);
        TopKSearch::new(&factory)
            .search(&mut reasoner, k, maximal_only)
            .unwrap()
    }

    #[test]
    fn test_scenario_b() {
        let fw = scenario_b();
        let result = top_k(&fw, 2, false);
        assert_eq!(1, result.max_size);
        let mut keys = result
            .extensions
            .iter()
            .map(|e| e.keys(&fw))
            .collect::<Vec<_>>();
        keys.sort();
        assert_eq!(vec![vec!["a"], vec!["b"]], keys);
    }

    #[test]
    fn test_sizes_non_increasing() {
        let fw = mixed_framework();
        let result = top_k(&fw, 100, false);
        assert!(!result.extensions.is_empty());
        assert!(result
            .extensions
            .windows(2)
            .all(|w| w[0].len() >= w[1].len()));
        assert!(result.extensions.iter().all(|e| e.len() <= result.max_size));
        assert_eq!(result.max_size, result.extensions[0].len());
        assert!(result.extensions.last().unwrap().is_empty());
    }

    #[test]
    fn test_all_admissible_sets_found() {
        let fw = scenario_c();
        let result = top_k(&fw, 10, false);
        assert_eq!(4, result.extensions.len());
        assert_eq!(3, result.max_size);
    }

    #[test]
    fn test_maximal_only() {
        let fw = scenario_c();
        let result = top_k(&fw, 10, true);
        assert_eq!(vec![vec!["a", "b", "c"]], result.extensions.iter().map(|e| e.keys(&fw)).collect::<Vec<_>>());
    }

    #[test]
    fn test_k_zero() {
        let fw = scenario_b();
        assert!(top_k(&fw, 0, false).extensions.is_empty());
    }

    #[test]
    fn test_truncated() {
        let fw = scenario_c();
        let result = top_k(&fw, 2, false);
        assert_eq!(
            vec![vec!["a", "b", "c"], vec!["b", "c"]],
            result.extensions.iter().map(|e| e.keys(&fw)).collect::<Vec<_>>()
        );
    }
}
