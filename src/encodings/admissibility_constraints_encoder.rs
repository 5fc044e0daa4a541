use crate::{
    aba::{AssumptionSet, Reasoner},
    sat::{Assignment, Literal, SatSolver, Variable},
};
use log::debug;
use std::collections::BTreeSet;

/// The numbers of clauses added by an encoder, by kind of constraint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EncodingStats {
    /// The number of conflict-freeness clauses.
    pub n_conflict_clauses: usize,
    /// The number of defense clauses.
    pub n_defense_clauses: usize,
    /// The number of closure implication clauses.
    pub n_closure_clauses: usize,
}

impl EncodingStats {
    /// Returns the total number of clauses.
    pub fn n_clauses(&self) -> usize {
        self.n_conflict_clauses + self.n_defense_clauses + self.n_closure_clauses
    }
}

/// An encoder of the admissible sets of a bipolar ABA framework into SAT.
///
/// The assumption of index `i` is represented by the variable `i+1`.
/// The clauses added to the solver are:
/// - conflict-freeness: `¬a ∨ ¬b` when the closure of `{a}` attacks `b`;
/// - defense: `¬a ∨ c1 ∨ ... ∨ cn` for each closed attacker of `a`, where the `ci` are the assumptions the closure of which attacks it;
/// - closure implications (optional): `¬a ∨ b` when `b` is reachable from `a` through support rules.
///
/// When closure implications are not encoded, the models are not necessarily closed;
/// the sets they represent must be closed and checked again.
pub struct AdmissibilityConstraintsEncoder {
    use_closure_implications: bool,
}

impl Default for AdmissibilityConstraintsEncoder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AdmissibilityConstraintsEncoder {
    /// Builds a new encoder.
    pub fn new(use_closure_implications: bool) -> Self {
        Self {
            use_closure_implications,
        }
    }

    /// Encodes the constraints into the solver.
    pub fn encode_constraints(
        &self,
        reasoner: &mut Reasoner,
        solver: &mut dyn SatSolver,
    ) -> EncodingStats {
        let framework = reasoner.framework();
        let n = framework.n_assumptions();
        solver.reserve(n);
        let ranges = (0..n)
            .map(|a| reasoner.attacked_by_closure(&AssumptionSet::singleton(a)))
            .collect::<Vec<_>>();
        let mut stats = EncodingStats {
            n_conflict_clauses: Self::encode_conflict_freeness(&ranges, solver),
            ..Default::default()
        };
        for a in 0..n {
            for attacker in reasoner.closed_attackers_unchecked(a) {
                let mut cl = vec![Self::assumption_to_lit(a).negate()];
                cl.extend(
                    ranges
                        .iter()
                        .enumerate()
                        .filter(|(_, r)| r.intersects(&attacker))
                        .map(|(c, _)| Self::assumption_to_lit(c)),
                );
                solver.add_clause(cl);
                stats.n_defense_clauses += 1;
            }
        }
        if self.use_closure_implications {
            for i in 0..n {
                for j in (0..n).filter(|j| *j != i && framework.supports_transitively(i, *j)) {
                    solver.add_clause(vec![
                        Self::assumption_to_lit(i).negate(),
                        Self::assumption_to_lit(j),
                    ]);
                    stats.n_closure_clauses += 1;
                }
            }
        }
        debug!(
            "encoded admissibility with {} conflict-freeness, {} defense and {} closure clauses",
            stats.n_conflict_clauses, stats.n_defense_clauses, stats.n_closure_clauses
        );
        stats
    }

    fn encode_conflict_freeness(ranges: &[AssumptionSet], solver: &mut dyn SatSolver) -> usize {
        let mut pairs = BTreeSet::new();
        for (a, range) in ranges.iter().enumerate() {
            for b in range.iter() {
                pairs.insert((usize::min(a, b), usize::max(a, b)));
            }
        }
        pairs.iter().for_each(|(a, b)| {
            if a == b {
                solver.add_clause(vec![Self::assumption_to_lit(*a).negate()]);
            } else {
                solver.add_clause(vec![
                    Self::assumption_to_lit(*a).negate(),
                    Self::assumption_to_lit(*b).negate(),
                ]);
            }
        });
        pairs.len()
    }

    /// Translates an assumption index into the literal that represents it.
    pub fn assumption_to_lit(id: usize) -> Literal {
        Variable::from(id + 1).positive()
    }

    /// Returns the literals of all the assumptions.
    pub fn assumption_lits(n_assumptions: usize) -> Vec<Literal> {
        (0..n_assumptions).map(Self::assumption_to_lit).collect()
    }

    /// Translates back a SAT assignment into the set of assumptions it selects.
    pub fn assignment_to_set(assignment: &Assignment, n_assumptions: usize) -> AssumptionSet {
        (0..n_assumptions)
            .filter(|i| assignment.value_of(*i + 1) == Some(true))
            .collect()
    }

    /// Returns the clause forbidding the assignment of the assumption variables given by a set.
    pub fn blocking_clause(set: &AssumptionSet, n_assumptions: usize) -> Vec<Literal> {
        (0..n_assumptions)
            .map(|i| {
                let lit = Self::assumption_to_lit(i);
                if set.contains(i) {
                    lit.negate()
                } else {
                    lit
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aba::test_frameworks::*, sat::default_solver};

    fn all_models(fw: &crate::aba::BipolarABAFramework, closure: bool) -> BTreeSet<Vec<String>> {
        let mut reasoner = Reasoner::new(fw);
        let mut solver = default_solver();
        AdmissibilityConstraintsEncoder::new(closure).encode_constraints(&mut reasoner, solver.as_mut());
        let n = fw.n_assumptions();
        let mut result = BTreeSet::new();
        while let Some(model) = solver.solve().unwrap_model() {
            let set = AdmissibilityConstraintsEncoder::assignment_to_set(&model, n);
            solver.add_clause(AdmissibilityConstraintsEncoder::blocking_clause(&set, n));
            result.insert(set.keys(fw).iter().map(|k| k.to_string()).collect());
        }
        result
    }

    fn keys(sets: &[&[&str]]) -> BTreeSet<Vec<String>> {
        sets.iter()
            .map(|s| s.iter().map(|k| k.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_scenario_a() {
        assert_eq!(keys(&[&[], &["b"]]), all_models(&scenario_a(), true));
    }

    #[test]
    fn test_scenario_b() {
        assert_eq!(keys(&[&[], &["a"], &["b"]]), all_models(&scenario_b(), true));
    }

    #[test]
    fn test_scenario_c_with_closure() {
        assert_eq!(
            keys(&[&[], &["c"], &["b", "c"], &["a", "b", "c"]]),
            all_models(&scenario_c(), true)
        );
    }

    #[test]
    fn test_scenario_c_without_closure() {
        assert_eq!(8, all_models(&scenario_c(), false).len());
    }

    #[test]
    fn test_undefendable_assumption_is_forbidden() {
        let fw = scenario_a();
        let mut reasoner = Reasoner::new(&fw);
        let mut solver = default_solver();
        let stats =
            AdmissibilityConstraintsEncoder::default().encode_constraints(&mut reasoner, solver.as_mut());
        assert_eq!(1, stats.n_conflict_clauses);
        assert_eq!(1, stats.n_defense_clauses);
        assert_eq!(0, stats.n_closure_clauses);
        assert!(solver
            .solve_under_assumptions(&[AdmissibilityConstraintsEncoder::assumption_to_lit(0)])
            .unwrap_model()
            .is_none());
    }

    #[test]
    fn test_self_attack() {
        let fw = framework_from(&["a"], &[], &[], &[("a", "a")]);
        assert_eq!(keys(&[&[]]), all_models(&fw, true));
    }

    #[test]
    fn test_blocking_clause() {
        let clause = AdmissibilityConstraintsEncoder::blocking_clause(&AssumptionSet::singleton(1), 2);
        assert_eq!(vec![Literal::from(1), Literal::from(-2)], clause);
    }
}
