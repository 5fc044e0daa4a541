use crate::aba::{AssumptionSet, BabaError, BipolarABAFramework, Literal, Reasoner, Rule};
use anyhow::Result;
use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fmt::Display,
};

/// A node of a derivation tree.
///
/// Leaves are the assumptions of the held set; inner nodes are the heads of the rules used to derive them.
/// Since rules have a single premise, each node has at most one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationNode {
    literal: Literal,
    rule: Option<Rule>,
    child: Option<Box<DerivationNode>>,
}

impl DerivationNode {
    fn leaf(literal: Literal) -> Self {
        Self {
            literal,
            rule: None,
            child: None,
        }
    }

    fn derived(literal: Literal, body: Literal, child: DerivationNode) -> Self {
        Self {
            rule: Some(Rule::new(literal.clone(), body)),
            literal,
            child: Some(Box::new(child)),
        }
    }

    /// Returns the literal derived at this node.
    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    /// Returns the rule used to derive the literal, or [Option::None] for leaves.
    pub fn rule(&self) -> Option<&Rule> {
        self.rule.as_ref()
    }

    /// Returns the derivation of the body of the rule, if any.
    pub fn child(&self) -> Option<&DerivationNode> {
        self.child.as_deref()
    }

    /// Returns `true` iff this node is a member of the held set.
    pub fn is_leaf(&self) -> bool {
        self.child.is_none()
    }

    fn fmt_indented(&self, f: &mut std::fmt::Formatter<'_>, indent: usize) -> std::fmt::Result {
        write!(f, "{}{}", "  ".repeat(indent), self.literal)?;
        if let Some(r) = &self.rule {
            write!(f, " ← {}", r.body())?;
        }
        if let Some(c) = &self.child {
            writeln!(f)?;
            c.fmt_indented(f, indent + 1)?;
        }
        Ok(())
    }
}

/// A derivation of a goal literal from a set of assumptions.
///
/// The goal is either an assumption or the contrary of an assumption.
/// The root of the tree is the goal, and the path down to the leaf is the chain of rules used to derive it.
///
/// # Example
///
/// ```
/// # use crubaba::aba::{BipolarABAFramework, Literal, Reasoner, Rule};
/// # use crubaba::explain::DerivationTree;
/// let lit = |k: &str| Literal::assumption(k);
/// let framework = BipolarABAFramework::new(
///     [lit("a"), lit("b")],
///     [(lit("a"), lit("not_a")), (lit("b"), lit("not_b"))],
///     [Rule::new(lit("b"), lit("a")), Rule::new(lit("not_b"), lit("b"))],
/// ).unwrap();
/// let mut reasoner = Reasoner::new(&framework);
/// let delta = framework.assumption_set(&["a"]).unwrap();
/// let tree = DerivationTree::build(&mut reasoner, &delta, "not_b").unwrap().unwrap();
/// assert_eq!(3, tree.depth());
/// assert_eq!("not_b ← b\n  b ← a\n    a", tree.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationTree {
    root: DerivationNode,
}

impl DerivationTree {
    /// Builds a derivation of the goal from the set, or returns [Option::None] if the goal is not derivable.
    ///
    /// Rule bodies are tried in the order of their keys.
    /// A [BabaError::Domain] error is returned if the goal is neither an assumption nor a contrary.
    pub fn build(
        reasoner: &mut Reasoner,
        delta: &AssumptionSet,
        goal: &str,
    ) -> Result<Option<DerivationTree>> {
        let mut resolver = GoalResolver::new(reasoner, delta, goal, "derivation tree computation")?;
        let mut seen = HashSet::new();
        Ok(resolver
            .derive_one(goal, &mut seen)
            .map(|root| DerivationTree { root }))
    }

    /// Builds all the derivations of the goal from the set.
    ///
    /// A literal cannot appear twice on the path of a derivation.
    /// If `max_paths` is given, at most this number of derivations is returned.
    /// A [BabaError::Domain] error is returned if the goal is neither an assumption nor a contrary.
    pub fn build_all(
        reasoner: &mut Reasoner,
        delta: &AssumptionSet,
        goal: &str,
        max_paths: Option<usize>,
    ) -> Result<Vec<DerivationTree>> {
        let mut resolver = GoalResolver::new(reasoner, delta, goal, "derivation trees computation")?;
        resolver.max_paths = max_paths;
        let mut seen = HashSet::new();
        Ok(resolver
            .derive_all(goal, &mut seen)
            .into_iter()
            .map(|root| DerivationTree { root })
            .collect())
    }

    /// Returns the root of the tree.
    pub fn root(&self) -> &DerivationNode {
        &self.root
    }

    /// Returns the number of nodes of the tree.
    pub fn depth(&self) -> usize {
        std::iter::successors(Some(&self.root), |n| n.child()).count()
    }

    /// Returns the leaf of the tree, which is a member of the held set.
    pub fn leaf(&self) -> &DerivationNode {
        std::iter::successors(Some(&self.root), |n| n.child())
            .last()
            .unwrap_or(&self.root)
    }
}

impl Display for DerivationTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.root.fmt_indented(f, 0)
    }
}

struct GoalResolver<'a> {
    framework: &'a BipolarABAFramework,
    delta: AssumptionSet,
    closure: AssumptionSet,
    max_paths: Option<usize>,
}

impl<'a> GoalResolver<'a> {
    fn new(
        reasoner: &mut Reasoner<'a>,
        delta: &AssumptionSet,
        goal: &str,
        operation: &'static str,
    ) -> Result<Self> {
        let framework = reasoner.framework();
        let closure = reasoner.closure(delta)?;
        if !framework.is_assumption(goal) && !framework.is_contrary(goal) {
            return Err(BabaError::domain(
                operation,
                "the goal is neither an assumption nor a contrary",
                [goal],
            )
            .into());
        }
        Ok(Self {
            framework,
            delta: delta.clone(),
            closure,
            max_paths: None,
        })
    }

    fn literal(&self, key: &str) -> Option<Literal> {
        if let Some(id) = self.framework.assumption_id(key) {
            Some(self.framework.assumption(id).clone())
        } else {
            self.framework
                .contrary_target_id(key)
                .map(|id| self.framework.contrary(id).clone())
        }
    }

    fn held_leaf(&self, key: &str) -> Option<Literal> {
        self.framework
            .assumption_id(key)
            .filter(|id| self.delta.contains(*id))
            .map(|id| self.framework.assumption(id).clone())
    }

    // the bodies in the closure of the held set of the rules with the given head
    fn bodies(&self, key: &str) -> Vec<usize> {
        let framework = self.framework;
        let supported = framework.assumption_id(key);
        let attacked = framework.contrary_target_id(key);
        let mut bodies = Vec::new();
        if let Some(id) = supported {
            bodies.extend(
                self.closure
                    .iter()
                    .filter(|b| framework.support_from(*b).binary_search(&id).is_ok()),
            );
        }
        if let Some(id) = attacked {
            bodies.extend(
                self.closure
                    .iter()
                    .filter(|b| framework.attack_from(*b).binary_search(&id).is_ok()),
            );
        }
        bodies
    }

    fn derive_one(&mut self, key: &str, seen: &mut HashSet<String>) -> Option<DerivationNode> {
        if let Some(l) = self.held_leaf(key) {
            return Some(DerivationNode::leaf(l));
        }
        let literal = self.literal(key)?;
        if !seen.insert(key.to_string()) {
            return None;
        }
        let mut result = None;
        for body in self.bodies(key) {
            let body_literal = self.framework.assumption(body).clone();
            if let Some(child) = self.derive_one(body_literal.key(), seen) {
                result = Some(DerivationNode::derived(literal.clone(), body_literal, child));
                break;
            }
        }
        seen.remove(key);
        result
    }

    fn derive_all(&mut self, key: &str, seen: &mut HashSet<String>) -> Vec<DerivationNode> {
        if let Some(l) = self.held_leaf(key) {
            return vec![DerivationNode::leaf(l)];
        }
        let literal = match self.literal(key) {
            Some(l) => l,
            None => return vec![],
        };
        if !seen.insert(key.to_string()) {
            return vec![];
        }
        let mut results = vec![];
        'bodies: for body in self.bodies(key) {
            let body_literal = self.framework.assumption(body).clone();
            for child in self.derive_all(body_literal.key(), seen) {
                if self.max_paths.map(|m| results.len() >= m).unwrap_or(false) {
                    break 'bodies;
                }
                results.push(DerivationNode::derived(
                    literal.clone(),
                    body_literal.clone(),
                    child,
                ));
            }
        }
        seen.remove(key);
        results
    }
}

/// The merge of several derivation trees of the same goal.
///
/// Nodes are the keys of the derived literals; an edge `(u, v)` means `v` was derived using a rule with body `u`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationDag {
    nodes: BTreeMap<String, Literal>,
    edges: BTreeSet<(String, String)>,
}

impl DerivationDag {
    /// Merges derivation trees into a DAG.
    pub fn from_trees(trees: &[DerivationTree]) -> Self {
        let mut dag = DerivationDag::default();
        trees.iter().for_each(|t| dag.collect(&t.root));
        dag
    }

    /// Builds the DAG of all the derivations of a goal from a set.
    ///
    /// See [DerivationTree::build_all] for the meaning of the parameters.
    pub fn build(
        reasoner: &mut Reasoner,
        delta: &AssumptionSet,
        goal: &str,
        max_paths: Option<usize>,
    ) -> Result<Self> {
        let trees = DerivationTree::build_all(reasoner, delta, goal, max_paths)?;
        Ok(Self::from_trees(&trees))
    }

    fn collect(&mut self, node: &DerivationNode) {
        self.nodes
            .entry(node.literal.key().to_string())
            .or_insert_with(|| node.literal.clone());
        if let Some(c) = &node.child {
            self.edges
                .insert((c.literal.key().to_string(), node.literal.key().to_string()));
            self.collect(c);
        }
    }

    /// Iterates over the literals of the DAG, ordered by key.
    pub fn nodes(&self) -> impl Iterator<Item = &Literal> + '_ {
        self.nodes.values()
    }

    /// Iterates over the edges of the DAG, from body to head.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.edges.iter().map(|(u, v)| (u.as_str(), v.as_str()))
    }

    /// Returns the number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }
}

impl Display for DerivationDag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "nodes: {}",
            self.nodes.keys().map(|k| k.as_str()).collect::<Vec<_>>().join(" ")
        )?;
        for (u, v) in self.edges.iter() {
            write!(f, "\n{} -> {}", u, v)?;
        }
        Ok(())
    }
}
