use super::{
    extension_enumerator::finish_enumeration, search_listener::SearchMonitor, CandidateFilter,
    EnumerationResult, ExtensionEnumerator, SearchListener,
};
use crate::{
    aba::Reasoner,
    encodings::AdmissibilityConstraintsEncoder,
    sat::SatSolverFactory,
};
use anyhow::{Context, Result};
use log::debug;
use std::{collections::HashSet, rc::Rc};

/// An enumerator relying on a SAT encoding of admissibility.
///
/// The encoding is made by an [AdmissibilityConstraintsEncoder].
/// Models are enumerated one by one; each model is translated into a set of assumptions,
/// which is closed and checked again before being given to the filter.
/// A clause blocking the exact assignment of the assumption variables is added after each model.
pub struct SatEnumerator<'f> {
    solver_factory: &'f dyn SatSolverFactory,
    encoder: AdmissibilityConstraintsEncoder,
    monitor: SearchMonitor,
}

impl<'f> SatEnumerator<'f> {
    /// Builds a new SAT based enumerator.
    ///
    /// A new solver is requested to the factory for each enumeration.
    pub fn new(solver_factory: &'f dyn SatSolverFactory, use_closure_implications: bool) -> Self {
        Self {
            solver_factory,
            encoder: AdmissibilityConstraintsEncoder::new(use_closure_implications),
            monitor: SearchMonitor::default(),
        }
    }
}

impl ExtensionEnumerator for SatEnumerator<'_> {
    fn enumerate(
        &mut self,
        reasoner: &mut Reasoner,
        filter: &mut dyn CandidateFilter,
        need_maximal: bool,
    ) -> Result<EnumerationResult> {
        self.monitor.reset();
        let n = reasoner.framework().n_assumptions();
        let mut solver = self.solver_factory.new_solver();
        let encoding_stats = self.encoder.encode_constraints(reasoner, solver.as_mut());
        debug!(
            "starting SAT enumeration with {} clauses",
            encoding_stats.n_clauses()
        );
        let mut evaluated = HashSet::new();
        let mut found = vec![];
        loop {
            self.monitor.solver_called();
            let model = match solver
                .solve()
                .into_model()
                .context("while enumerating admissible sets")?
            {
                Some(m) => m,
                None => break,
            };
            self.monitor.node_visited();
            let chosen = AdmissibilityConstraintsEncoder::assignment_to_set(&model, n);
            let blocking = AdmissibilityConstraintsEncoder::blocking_clause(&chosen, n);
            let closure = reasoner.closure_unchecked(&chosen);
            if evaluated.insert(closure.clone())
                && reasoner.is_admissible_unchecked(&closure)
                && filter.keep(reasoner, &closure)
            {
                self.monitor.candidate_found();
                found.push(closure);
            }
            if blocking.is_empty() {
                break;
            }
            solver.add_clause(blocking);
        }
        Ok(finish_enumeration(&mut self.monitor, found, need_maximal))
    }

    fn add_listener(&mut self, listener: Rc<dyn SearchListener>) {
        self.monitor.add_listener(listener)
    }
}
