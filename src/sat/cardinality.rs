use super::{Literal, SatSolver, Variable};

/// The kind of cardinality constraint to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardinalityBound {
    /// At least `k` literals must be true.
    AtLeast(usize),
    /// At most `k` literals must be true.
    AtMost(usize),
    /// Exactly `k` literals must be true.
    Exactly(usize),
}

/// Encodes a cardinality constraint over a set of literals into a SAT solver.
///
/// The encoding is the sequential counter of Sinz (2005).
/// Auxiliary variables are allocated above the current highest variable of the solver.
/// The number of clauses added is returned.
///
/// # Example
///
/// ```
/// # use crubaba::sat::{self, CardinalityBound, Literal};
/// let mut solver = sat::default_solver();
/// let lits = (1..=3).map(Literal::from).collect::<Vec<_>>();
/// solver.reserve(3);
/// sat::encode_cardinality(solver.as_mut(), &lits, CardinalityBound::Exactly(3));
/// let model = solver.solve().unwrap_model().unwrap();
/// assert!((1..=3usize).all(|v| model.value_of(v) == Some(true)));
/// ```
pub fn encode_cardinality(
    solver: &mut dyn SatSolver,
    lits: &[Literal],
    bound: CardinalityBound,
) -> usize {
    match bound {
        CardinalityBound::AtMost(k) => encode_at_most(solver, lits, k),
        CardinalityBound::AtLeast(k) => encode_at_least(solver, lits, k),
        CardinalityBound::Exactly(k) => {
            encode_at_least(solver, lits, k) + encode_at_most(solver, lits, k)
        }
    }
}

fn encode_at_least(solver: &mut dyn SatSolver, lits: &[Literal], k: usize) -> usize {
    if k == 0 {
        return 0;
    }
    if k > lits.len() {
        return encode_falsity(solver);
    }
    let negated = lits.iter().map(|l| l.negate()).collect::<Vec<_>>();
    encode_at_most(solver, &negated, lits.len() - k)
}

fn encode_at_most(solver: &mut dyn SatSolver, lits: &[Literal], k: usize) -> usize {
    let n = lits.len();
    if k >= n {
        return 0;
    }
    if k == 0 {
        lits.iter().for_each(|l| solver.add_clause(vec![l.negate()]));
        return n;
    }
    // counter[i][j] <=> at least j+1 of the first i+1 literals are true
    let first_aux = solver.n_vars() + 1;
    let counter = |i: usize, j: usize| Variable::from(first_aux + i * k + j).positive();
    solver.reserve(first_aux + (n - 1) * k - 1);
    let mut clauses = Vec::with_capacity(2 * n * k);
    clauses.push(vec![lits[0].negate(), counter(0, 0)]);
    for j in 1..k {
        clauses.push(vec![counter(0, j).negate()]);
    }
    for i in 1..n - 1 {
        clauses.push(vec![lits[i].negate(), counter(i, 0)]);
        clauses.push(vec![counter(i - 1, 0).negate(), counter(i, 0)]);
        for j in 1..k {
            clauses.push(vec![
                lits[i].negate(),
                counter(i - 1, j - 1).negate(),
                counter(i, j),
            ]);
            clauses.push(vec![counter(i - 1, j).negate(), counter(i, j)]);
        }
        clauses.push(vec![lits[i].negate(), counter(i - 1, k - 1).negate()]);
    }
    clauses.push(vec![lits[n - 1].negate(), counter(n - 2, k - 1).negate()]);
    let n_clauses = clauses.len();
    clauses.into_iter().for_each(|cl| solver.add_clause(cl));
    n_clauses
}

fn encode_falsity(solver: &mut dyn SatSolver) -> usize {
    let v = Variable::from(solver.n_vars() + 1);
    solver.add_clause(vec![v.positive()]);
    solver.add_clause(vec![v.negative()]);
    2
}
