use super::{Literal, LiteralKind};
use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Display;

lazy_static! {
    static ref FORMULA_KEY_PATTERN: Regex = Regex::new("^(¬)?((?:[^:¬]+:)*)([^:¬]+)$").unwrap();
}

const NEGATION: &str = "¬";

/// A propositional atom under a (possibly empty) sequence of modal operators, possibly negated.
///
/// The canonical key of a formula is made of the optional negation sign `¬`,
/// followed by each operator and a colon, followed by the atom.
/// As an example, the key of the negated formula with operators `B` and `alice` on the atom `p` is `¬B:alice:p`.
///
/// # Example
///
/// ```
/// # use crubaba::aba::Formula;
/// let f = Formula::new(&["O"], "pay");
/// assert_eq!("O:pay", f.key());
/// assert_eq!("¬O:pay", f.negated().key());
/// assert_eq!(f, Formula::parse("O:pay").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Formula {
    mods: Vec<String>,
    atom: String,
    neg: bool,
}

impl Formula {
    /// Builds a positive formula.
    pub fn new<S>(mods: &[S], atom: &str) -> Self
    where
        S: AsRef<str>,
    {
        Self {
            mods: mods.iter().map(|m| m.as_ref().to_string()).collect(),
            atom: atom.to_string(),
            neg: false,
        }
    }

    /// Parses a formula from its canonical key.
    pub fn parse(key: &str) -> Result<Self> {
        let captures = FORMULA_KEY_PATTERN
            .captures(key)
            .ok_or_else(|| anyhow!(r#"cannot parse "{}" as a modal formula"#, key))?;
        let mods = captures
            .get(2)
            .map(|m| m.as_str())
            .unwrap_or_default()
            .split_terminator(':')
            .map(|s| s.to_string())
            .collect();
        Ok(Self {
            mods,
            atom: captures[3].to_string(),
            neg: captures.get(1).is_some(),
        })
    }

    /// Returns the canonical key of this formula.
    pub fn key(&self) -> String {
        let mut key = String::new();
        if self.neg {
            key.push_str(NEGATION);
        }
        self.mods.iter().for_each(|m| {
            key.push_str(m);
            key.push(':')
        });
        key.push_str(&self.atom);
        key
    }

    /// Returns the modal operators.
    pub fn mods(&self) -> &[String] {
        &self.mods
    }

    /// Returns the atom.
    pub fn atom(&self) -> &str {
        &self.atom
    }

    /// Returns `true` iff the formula is negated.
    pub fn is_negated(&self) -> bool {
        self.neg
    }

    /// Returns the same formula with its negation flag flipped.
    pub fn negated(&self) -> Self {
        Self {
            neg: !self.neg,
            ..self.clone()
        }
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Binds modal formulas to the literals of a framework.
///
/// The adapter is parameterized by the function computing the formula used as the contrary of another one.
/// By default, the contrary of a formula is its negation.
pub struct ModalAdapter {
    contrary_fn: Box<dyn Fn(&Formula) -> Formula>,
}

impl Default for ModalAdapter {
    fn default() -> Self {
        Self::new(Formula::negated)
    }
}

impl ModalAdapter {
    /// Builds an adapter using the provided contrary function.
    pub fn new<F>(contrary_fn: F) -> Self
    where
        F: Fn(&Formula) -> Formula + 'static,
    {
        Self {
            contrary_fn: Box::new(contrary_fn),
        }
    }

    /// Builds the literal of the given kind associated with a formula.
    ///
    /// The source text of the formula, if any, is set as the literal payload.
    pub fn to_literal(&self, formula: &Formula, kind: LiteralKind, text: Option<&str>) -> Literal {
        let literal = Literal::new(formula.key(), kind);
        match text {
            Some(t) => literal.with_payload(t),
            None => literal,
        }
    }

    /// Returns the contrary literal of a literal, the key of which must be a formula key.
    pub fn contrary_literal(&self, literal: &Literal) -> Result<Literal> {
        let formula = Formula::parse(literal.key())?;
        Ok(Literal::new(
            (self.contrary_fn)(&formula).key(),
            literal.kind(),
        ))
    }

    /// Builds the contrary pairs for the given literals, as expected by [BipolarABAFramework::new](crate::aba::BipolarABAFramework::new).
    pub fn build_contrary_map<'a, I>(&self, literals: I) -> Result<Vec<(Literal, Literal)>>
    where
        I: IntoIterator<Item = &'a Literal>,
    {
        literals
            .into_iter()
            .map(|l| Ok((l.clone(), self.contrary_literal(l)?)))
            .collect()
    }
}
