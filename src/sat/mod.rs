//! SAT solver interfaces for the satisfiability-based reasoning engines.

mod cadical_solver;
pub use cadical_solver::CadicalSolver;

mod cardinality;
pub use cardinality::encode_cardinality;
pub use cardinality::CardinalityBound;

mod sat_solver;
pub use sat_solver::default_solver;
pub use sat_solver::Assignment;
pub use sat_solver::DefaultSatSolverFactory;
pub use sat_solver::Literal;
pub use sat_solver::SatSolver;
pub use sat_solver::SatSolverFactory;
pub use sat_solver::SolvingListener;
pub use sat_solver::SolvingResult;
pub use sat_solver::Variable;
