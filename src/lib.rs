//! Crubaba is a reasoner for Bipolar Assumption-Based Argumentation frameworks.
//!
//! A framework is made of assumptions (and facts), their contraries,
//! support rules between assumptions and attack rules from assumptions to contraries.
//! The crate computes the closure of sets of assumptions, checks the usual predicates
//! (conflict-freeness, defense, admissibility) and enumerates the extensions of the
//! admissible, complete, preferred, set-stable, well-founded and ideal semantics,
//! either by an exhaustive search or by a SAT encoding.
//! Derivation trees and dialectical trees explain the results.
//!
//! # Example
//!
//! ```
//! # use crubaba::aba::{BipolarABAFramework, Literal, Rule};
//! # use crubaba::solvers::{ExtensionComputer, Semantics};
//! let framework = BipolarABAFramework::new(
//!     vec![Literal::assumption("a"), Literal::assumption("b")],
//!     vec![
//!         (Literal::assumption("a"), Literal::assumption("not_a")),
//!         (Literal::assumption("b"), Literal::assumption("not_b")),
//!     ],
//!     vec![Rule::new(Literal::assumption("not_a"), Literal::assumption("b"))],
//! )
//! .unwrap();
//! let mut computer = ExtensionComputer::new(&framework);
//! let preferred = computer.extensions(Semantics::Preferred).unwrap();
//! assert_eq!(vec![vec!["b"]], preferred.iter().map(|e| e.keys(&framework)).collect::<Vec<_>>());
//! ```

#![warn(missing_docs)]

pub mod aba;

pub mod encodings;

pub mod explain;

pub mod io;

pub mod sat;

pub mod solvers;
