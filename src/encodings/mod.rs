//! Objects used to encode semantics into SAT solvers.

mod admissibility_constraints_encoder;
pub use admissibility_constraints_encoder::AdmissibilityConstraintsEncoder;
pub use admissibility_constraints_encoder::EncodingStats;
