//! Solvers dedicated to the semantics of Bipolar ABA frameworks.

mod exhaustive_enumerator;
pub use exhaustive_enumerator::ExhaustiveEnumerator;

mod extension_computer;
pub use extension_computer::ExtensionComputer;

mod extension_enumerator;
pub use extension_enumerator::filter_maximal;
pub use extension_enumerator::AcceptAllFilter;
pub use extension_enumerator::CandidateFilter;
pub use extension_enumerator::DefenseFixpointFilter;
pub use extension_enumerator::EnumerationResult;
pub use extension_enumerator::ExtensionEnumerator;
pub use extension_enumerator::SetStableFilter;
pub use extension_enumerator::SubsetOfAllFilter;

mod sat_enumerator;
pub use sat_enumerator::SatEnumerator;

mod search_listener;
pub use search_listener::LoggingSearchListener;
pub use search_listener::SearchListener;
pub use search_listener::SearchStats;

mod semantics;
pub use semantics::EngineKind;
pub use semantics::EnumerationOptions;
pub use semantics::Semantics;

mod semantics_drivers;
pub use semantics_drivers::SemanticsDriver;

mod top_k_search;
pub use top_k_search::TopKResult;
pub use top_k_search::TopKSearch;
