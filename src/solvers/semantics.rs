use crate::aba::BabaError;
use anyhow::Result;
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// The semantics handled by the solvers.
///
/// Semantics can be parsed from their names (and some aliases), ignoring case.
///
/// # Example
///
/// ```
/// # use crubaba::solvers::Semantics;
/// assert_eq!(Semantics::Stable, Semantics::from_name("set-stable").unwrap());
/// assert_eq!(Semantics::WellFounded, Semantics::from_name("GROUNDED").unwrap());
/// assert_eq!("preferred", Semantics::Preferred.as_ref());
/// assert!(Semantics::from_name("semi-stable").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Semantics {
    /// The admissible semantics.
    #[strum(to_string = "admissible", serialize = "ad")]
    Admissible,
    /// The complete semantics.
    #[strum(to_string = "complete", serialize = "co")]
    Complete,
    /// The preferred semantics.
    #[strum(to_string = "preferred", serialize = "pr")]
    Preferred,
    /// The (set-)stable semantics.
    #[strum(to_string = "set-stable", serialize = "stable", serialize = "st")]
    Stable,
    /// The well-founded semantics.
    #[strum(
        to_string = "well-founded",
        serialize = "wf",
        serialize = "grounded",
        serialize = "gr"
    )]
    WellFounded,
    /// The ideal semantics.
    #[strum(to_string = "ideal", serialize = "id")]
    Ideal,
}

impl Semantics {
    /// Reads a semantics from its name.
    ///
    /// A [BabaError::Semantics] error is returned if the name is unknown.
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse::<Semantics>()
            .map_err(|_| BabaError::Semantics(name.to_string()).into())
    }
}

/// The algorithms available to enumerate extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum EngineKind {
    /// A depth-first search over the sets of assumptions.
    #[strum(serialize = "exhaustive")]
    Exhaustive,
    /// A SAT encoding with model enumeration.
    #[strum(serialize = "sat")]
    Sat,
}

/// The options of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationOptions {
    /// The enumeration algorithm.
    pub engine: EngineKind,
    /// Whether the SAT encoding contains the closure implications (SAT engine only).
    pub use_closure_implications: bool,
    /// Whether only the ⊆-maximal sets must be kept.
    pub need_maximal: bool,
}

impl Default for EnumerationOptions {
    fn default() -> Self {
        Self {
            engine: EngineKind::Sat,
            use_closure_implications: true,
            need_maximal: false,
        }
    }
}

impl EnumerationOptions {
    /// Returns the same options with another engine.
    pub fn with_engine(self, engine: EngineKind) -> Self {
        Self { engine, ..self }
    }

    /// Returns the same options with a new value for the maximality requirement.
    pub fn with_maximality(self, need_maximal: bool) -> Self {
        Self {
            need_maximal,
            ..self
        }
    }

    /// Returns the same options with a new value for the closure implications requirement.
    pub fn with_closure_implications(self, use_closure_implications: bool) -> Self {
        Self {
            use_closure_implications,
            ..self
        }
    }
}
