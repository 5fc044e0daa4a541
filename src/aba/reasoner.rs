use super::{AssumptionSet, BabaError, BipolarABAFramework};
use anyhow::Result;
use std::collections::{HashMap, VecDeque};

/// The closure engine and the acceptability predicates of a framework.
///
/// A reasoner borrows an immutable framework and owns the caches grown while it is used
/// (closures of assumption sets and closed attackers of assumptions).
/// Since a framework is never modified, these caches are never invalidated.
///
/// Several reasoners may share the same framework; a reasoner itself is meant to be used by a single run.
///
/// Public predicates check their inputs and return [BabaError::Domain] errors
/// when they are given keys that are not assumptions (or sets built for another framework).
///
/// # Example
///
/// ```
/// # use crubaba::aba::{BipolarABAFramework, Literal, Reasoner, Rule};
/// let lit = |k: &str| Literal::assumption(k);
/// let framework = BipolarABAFramework::new(
///     [lit("a"), lit("b")],
///     [(lit("a"), lit("not_a")), (lit("b"), lit("not_b"))],
///     [Rule::new(lit("not_a"), lit("b"))],
/// ).unwrap();
/// let mut reasoner = Reasoner::new(&framework);
/// let b = framework.assumption_set(&["b"]).unwrap();
/// assert!(reasoner.attacks(&b, "a").unwrap());
/// assert!(reasoner.is_admissible(&b).unwrap());
/// ```
pub struct Reasoner<'a> {
    framework: &'a BipolarABAFramework,
    closure_cache: HashMap<AssumptionSet, AssumptionSet>,
    closed_attackers_cache: Vec<Option<Vec<AssumptionSet>>>,
    n_cache_hits: usize,
}

impl<'a> Reasoner<'a> {
    /// Builds a new reasoner for the given framework.
    pub fn new(framework: &'a BipolarABAFramework) -> Self {
        Self {
            framework,
            closure_cache: HashMap::new(),
            closed_attackers_cache: vec![None; framework.n_assumptions()],
            n_cache_hits: 0,
        }
    }

    /// Returns the framework under consideration.
    pub fn framework(&self) -> &'a BipolarABAFramework {
        self.framework
    }

    /// Returns the number of closures in the cache and the number of cache hits so far.
    pub fn closure_cache_stats(&self) -> (usize, usize) {
        (self.closure_cache.len(), self.n_cache_hits)
    }

    /// Computes the closure of a set of assumptions, that is the smallest superset closed under support rules.
    pub fn closure(&mut self, delta: &AssumptionSet) -> Result<AssumptionSet> {
        self.framework.check_set(delta, "closure")?;
        Ok(self.closure_unchecked(delta))
    }

    pub(crate) fn closure_unchecked(&mut self, delta: &AssumptionSet) -> AssumptionSet {
        if let Some(cl) = self.closure_cache.get(delta) {
            self.n_cache_hits += 1;
            return cl.clone();
        }
        let mut cl = delta.clone();
        let mut queue = delta.iter().collect::<VecDeque<_>>();
        while let Some(a) = queue.pop_front() {
            for b in self.framework.support_from(a) {
                if cl.insert(*b) {
                    queue.push_back(*b);
                }
            }
        }
        self.closure_cache.insert(delta.clone(), cl.clone());
        cl
    }

    pub(crate) fn single_closure(&mut self, id: usize) -> AssumptionSet {
        self.closure_unchecked(&AssumptionSet::singleton(id))
    }

    /// Returns `true` iff the set is equal to its closure.
    pub fn is_closed(&mut self, delta: &AssumptionSet) -> Result<bool> {
        self.framework.check_set(delta, "closedness check")?;
        Ok(self.is_closed_unchecked(delta))
    }

    pub(crate) fn is_closed_unchecked(&mut self, delta: &AssumptionSet) -> bool {
        self.closure_unchecked(delta).len() == delta.len()
    }

    // the assumptions attacked by the closure of delta
    pub(crate) fn attacked_by_closure(&mut self, delta: &AssumptionSet) -> AssumptionSet {
        let cl = self.closure_unchecked(delta);
        let framework = self.framework;
        cl.iter()
            .flat_map(|a| framework.attack_from(a).iter().copied())
            .collect()
    }

    /// Checks if a set of assumptions derives a target literal.
    ///
    /// If the target is an assumption, it is derived iff it belongs to the closure of the set.
    /// If the target is the contrary of an assumption β, it is derived iff a member of the closure attacks β.
    /// Other targets lead to a [BabaError::Domain] error.
    pub fn derives(&mut self, delta: &AssumptionSet, target: &str) -> Result<bool> {
        self.framework.check_set(delta, "derivation check")?;
        if let Some(id) = self.framework.assumption_id(target) {
            Ok(self.closure_unchecked(delta).contains(id))
        } else if let Some(id) = self.framework.contrary_target_id(target) {
            Ok(self.attacks_unchecked(delta, id))
        } else {
            Err(BabaError::domain(
                "derivation check",
                "the target is neither an assumption nor a contrary",
                [target],
            )
            .into())
        }
    }

    /// Checks if a set of assumptions attacks an assumption, that is if it derives its contrary.
    pub fn attacks(&mut self, delta: &AssumptionSet, beta: &str) -> Result<bool> {
        self.framework.check_set(delta, "attack check")?;
        let id = self.framework.check_assumption(beta, "attack check")?;
        Ok(self.attacks_unchecked(delta, id))
    }

    pub(crate) fn attacks_unchecked(&mut self, delta: &AssumptionSet, beta: usize) -> bool {
        let cl = self.closure_unchecked(delta);
        let framework = self.framework;
        let attacked = cl
            .iter()
            .any(|a| framework.attack_from(a).binary_search(&beta).is_ok());
        attacked
    }

    /// Checks if a set of assumptions attacks at least one member of another set.
    pub fn attacks_set(&mut self, delta: &AssumptionSet, set: &AssumptionSet) -> Result<bool> {
        self.framework.check_set(delta, "attack check")?;
        self.framework.check_set(set, "attack check")?;
        Ok(self.attacks_set_unchecked(delta, set))
    }

    pub(crate) fn attacks_set_unchecked(&mut self, delta: &AssumptionSet, set: &AssumptionSet) -> bool {
        self.attacked_by_closure(delta).intersects(set)
    }

    /// Checks that no member of a set is attacked by the closure of this set.
    pub fn conflict_free(&mut self, delta: &AssumptionSet) -> Result<bool> {
        self.framework.check_set(delta, "conflict-freeness check")?;
        Ok(self.conflict_free_unchecked(delta))
    }

    pub(crate) fn conflict_free_unchecked(&mut self, delta: &AssumptionSet) -> bool {
        !self.attacked_by_closure(delta).intersects(delta)
    }

    /// Returns the minimal closed sets of assumptions attacking an assumption.
    ///
    /// Since rules have a single premise, these are the closures of the direct attackers.
    pub fn closed_attackers_of(&mut self, alpha: &str) -> Result<Vec<AssumptionSet>> {
        let id = self
            .framework
            .check_assumption(alpha, "closed attackers computation")?;
        Ok(self.closed_attackers_unchecked(id))
    }

    pub(crate) fn closed_attackers_unchecked(&mut self, alpha: usize) -> Vec<AssumptionSet> {
        if let Some(attackers) = &self.closed_attackers_cache[alpha] {
            return attackers.clone();
        }
        let framework = self.framework;
        let attackers = framework
            .attacked_by(alpha)
            .iter()
            .map(|a| self.single_closure(*a))
            .collect::<Vec<_>>();
        self.closed_attackers_cache[alpha] = Some(attackers.clone());
        attackers
    }

    /// Checks if a set of assumptions counter-attacks every closed attacker of an assumption.
    pub fn defends(&mut self, delta: &AssumptionSet, alpha: &str) -> Result<bool> {
        self.framework.check_set(delta, "defense check")?;
        let id = self.framework.check_assumption(alpha, "defense check")?;
        let range = self.attacked_by_closure(delta);
        Ok(self.defends_with_range(&range, id))
    }

    fn defends_with_range(&mut self, range: &AssumptionSet, alpha: usize) -> bool {
        self.closed_attackers_unchecked(alpha)
            .iter()
            .all(|b| range.intersects(b))
    }

    /// Checks if a set of assumptions defends each member of another set.
    pub fn defends_set(&mut self, delta: &AssumptionSet, set: &AssumptionSet) -> Result<bool> {
        self.framework.check_set(delta, "defense check")?;
        self.framework.check_set(set, "defense check")?;
        Ok(self.defends_set_unchecked(delta, set))
    }

    pub(crate) fn defends_set_unchecked(&mut self, delta: &AssumptionSet, set: &AssumptionSet) -> bool {
        let range = self.attacked_by_closure(delta);
        set.iter().all(|a| self.defends_with_range(&range, a))
    }

    /// Returns the set of all the assumptions defended by a set.
    pub fn defended_by(&mut self, delta: &AssumptionSet) -> Result<AssumptionSet> {
        self.framework.check_set(delta, "defense check")?;
        Ok(self.defended_by_unchecked(delta))
    }

    pub(crate) fn defended_by_unchecked(&mut self, delta: &AssumptionSet) -> AssumptionSet {
        let range = self.attacked_by_closure(delta);
        (0..self.framework.n_assumptions())
            .filter(|a| self.defends_with_range(&range, *a))
            .collect()
    }

    /// Checks if a set is admissible, that is closed, conflict-free and defending all its members.
    pub fn is_admissible(&mut self, delta: &AssumptionSet) -> Result<bool> {
        self.framework.check_set(delta, "admissibility check")?;
        Ok(self.is_admissible_unchecked(delta))
    }

    pub(crate) fn is_admissible_unchecked(&mut self, delta: &AssumptionSet) -> bool {
        self.is_closed_unchecked(delta)
            && self.conflict_free_unchecked(delta)
            && self.defends_set_unchecked(delta, delta)
    }

    /// Checks if a set is the closure of the set of assumptions it defends.
    pub fn is_defense_fixpoint(&mut self, delta: &AssumptionSet) -> Result<bool> {
        self.framework.check_set(delta, "completeness check")?;
        Ok(self.is_defense_fixpoint_unchecked(delta))
    }

    pub(crate) fn is_defense_fixpoint_unchecked(&mut self, delta: &AssumptionSet) -> bool {
        let defended = self.defended_by_unchecked(delta);
        &self.closure_unchecked(&defended) == delta
    }

    /// Checks if a set is closed, conflict-free, and attacks the closure of each assumption it does not contain.
    ///
    /// Admissibility is not required.
    pub fn is_set_stable(&mut self, delta: &AssumptionSet) -> Result<bool> {
        self.framework.check_set(delta, "stability check")?;
        Ok(self.is_set_stable_unchecked(delta))
    }

    pub(crate) fn is_set_stable_unchecked(&mut self, delta: &AssumptionSet) -> bool {
        if !self.is_closed_unchecked(delta) || !self.conflict_free_unchecked(delta) {
            return false;
        }
        let range = self.attacked_by_closure(delta);
        (0..self.framework.n_assumptions())
            .filter(|b| !delta.contains(*b))
            .all(|b| range.intersects(&self.single_closure(b)))
    }
}
