//! A module containing the material needed to handle bipolar Assumption-based Argumentation frameworks.

mod assumption_set;
pub use assumption_set::AssumptionSet;
pub use assumption_set::Extension;

mod bipolar_aba_framework;
pub use bipolar_aba_framework::BipolarABAFramework;

mod error;
pub use error::BabaError;

mod literal;
pub use literal::Literal;
pub use literal::LiteralKind;
pub use literal::Rule;
pub use literal::RuleKind;

mod modal;
pub use modal::Formula;
pub use modal::ModalAdapter;

mod reasoner;
pub use reasoner::Reasoner;

#[cfg(test)]
pub(crate) mod test_frameworks;
