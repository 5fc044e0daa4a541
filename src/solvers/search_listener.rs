use log::{debug, info, trace};
use std::rc::Rc;

/// A trait for objects warned about the progress of a search.
///
/// All the methods have a default implementation doing nothing.
/// Counters are cumulative for the current search.
pub trait SearchListener {
    /// Called when a node of the search space is visited.
    fn node_visited(&self, _count: usize) {}

    /// Called when a SAT solver is called.
    fn solver_called(&self, _count: usize) {}

    /// Called when a new candidate extension is found.
    fn candidate_found(&self, _count: usize) {}

    /// Called when the maximality filter is applied.
    fn maximality_filtered(&self, _before: usize, _after: usize) {}
}

/// A search listener forwarding the search progress to the logger.
#[derive(Default)]
pub struct LoggingSearchListener;

impl SearchListener for LoggingSearchListener {
    fn node_visited(&self, count: usize) {
        trace!("visited {} search node(s)", count);
    }

    fn solver_called(&self, count: usize) {
        trace!("SAT solver called {} time(s)", count);
    }

    fn candidate_found(&self, count: usize) {
        debug!("found {} candidate extension(s)", count);
    }

    fn maximality_filtered(&self, before: usize, after: usize) {
        info!("kept {} maximal set(s) out of {}", after, before);
    }
}

/// Counters describing the work done by a search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// The number of nodes of the search space visited.
    pub n_nodes_visited: usize,
    /// The number of calls to SAT solvers.
    pub n_solver_calls: usize,
    /// The number of candidate extensions found, before the maximality filter.
    pub n_candidates: usize,
    /// The number of extensions returned.
    pub n_results: usize,
}

impl SearchStats {
    /// Adds the counters of another search to this one.
    pub fn merge(&mut self, other: &SearchStats) {
        self.n_nodes_visited += other.n_nodes_visited;
        self.n_solver_calls += other.n_solver_calls;
        self.n_candidates += other.n_candidates;
        self.n_results += other.n_results;
    }
}

#[derive(Default)]
pub(crate) struct SearchMonitor {
    listeners: Vec<Rc<dyn SearchListener>>,
    stats: SearchStats,
}

impl SearchMonitor {
    pub(crate) fn add_listener(&mut self, listener: Rc<dyn SearchListener>) {
        self.listeners.push(listener)
    }

    pub(crate) fn reset(&mut self) {
        self.stats = SearchStats::default();
    }

    pub(crate) fn node_visited(&mut self) {
        self.stats.n_nodes_visited += 1;
        let count = self.stats.n_nodes_visited;
        self.listeners.iter().for_each(|l| l.node_visited(count));
    }

    pub(crate) fn solver_called(&mut self) {
        self.stats.n_solver_calls += 1;
        let count = self.stats.n_solver_calls;
        self.listeners.iter().for_each(|l| l.solver_called(count));
    }

    pub(crate) fn candidate_found(&mut self) {
        self.stats.n_candidates += 1;
        let count = self.stats.n_candidates;
        self.listeners.iter().for_each(|l| l.candidate_found(count));
    }

    pub(crate) fn maximality_filtered(&mut self, before: usize, after: usize) {
        self.listeners
            .iter()
            .for_each(|l| l.maximality_filtered(before, after));
    }

    pub(crate) fn finish(&mut self, n_results: usize) -> SearchStats {
        self.stats.n_results = n_results;
        self.stats
    }
}
