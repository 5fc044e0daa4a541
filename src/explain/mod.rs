//! Explanations of the acceptance of assumptions: derivation trees and dialectical trees.

mod derivation_tree;
pub use derivation_tree::DerivationDag;
pub use derivation_tree::DerivationNode;
pub use derivation_tree::DerivationTree;

mod dialectical_tree;
pub use dialectical_tree::DialecticalNode;
pub use dialectical_tree::DialecticalTree;
pub use dialectical_tree::Role;
