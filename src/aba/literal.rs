use std::{
    cmp::Ordering,
    fmt::Display,
    hash::{Hash, Hasher},
};
use strum_macros::{AsRefStr, EnumString};

/// The kind of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum LiteralKind {
    /// A defeasible literal, which must be defended to be accepted.
    #[strum(serialize = "assumption")]
    Assumption,
    /// A literal taken as a given; it takes part to rules and attacks like assumptions do.
    #[strum(serialize = "fact")]
    Fact,
}

/// A literal of a bipolar ABA framework.
///
/// Literals are identified by their key: equality, ordering and hashing only consider it.
/// The kind and the payload are informational.
///
/// # Example
///
/// ```
/// # use crubaba::aba::Literal;
/// let a = Literal::assumption("a").with_payload("it rains");
/// assert_eq!(Literal::fact("a"), a);
/// assert_eq!(Some("it rains"), a.payload());
/// ```
#[derive(Debug, Clone)]
pub struct Literal {
    key: String,
    kind: LiteralKind,
    payload: Option<String>,
}

impl Literal {
    /// Builds a new literal.
    pub fn new<S>(key: S, kind: LiteralKind) -> Self
    where
        S: Into<String>,
    {
        Self {
            key: key.into(),
            kind,
            payload: None,
        }
    }

    /// Builds a new literal of kind [LiteralKind::Assumption].
    pub fn assumption<S>(key: S) -> Self
    where
        S: Into<String>,
    {
        Self::new(key, LiteralKind::Assumption)
    }

    /// Builds a new literal of kind [LiteralKind::Fact].
    pub fn fact<S>(key: S) -> Self
    where
        S: Into<String>,
    {
        Self::new(key, LiteralKind::Fact)
    }

    /// Attaches an annotation to this literal.
    pub fn with_payload<S>(mut self, payload: S) -> Self
    where
        S: Into<String>,
    {
        self.payload = Some(payload.into());
        self
    }

    /// Returns the key of the literal.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the kind of the literal.
    pub fn kind(&self) -> LiteralKind {
        self.kind
    }

    /// Returns the annotation of the literal, if any.
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Returns `true` iff this literal is a fact.
    pub fn is_fact(&self) -> bool {
        self.kind == LiteralKind::Fact
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state)
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// The kind of a single-premise rule, given by the nature of its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum RuleKind {
    /// The head is an assumption (β ← α).
    #[strum(serialize = "support")]
    Support,
    /// The head is the contrary of an assumption (¬β ← α).
    #[strum(serialize = "attack")]
    Attack,
}

/// A single-premise bipolar rule `head ← body`.
///
/// The body is always an assumption; the head is either an assumption or a contrary.
/// This is checked when the rule is given to a framework.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    head: Literal,
    body: Literal,
}

impl Rule {
    /// Builds a new rule.
    pub fn new(head: Literal, body: Literal) -> Self {
        Self { head, body }
    }

    /// Returns the head of the rule.
    pub fn head(&self) -> &Literal {
        &self.head
    }

    /// Returns the body of the rule.
    pub fn body(&self) -> &Literal {
        &self.body
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ← {}", self.head, self.body)
    }
}
