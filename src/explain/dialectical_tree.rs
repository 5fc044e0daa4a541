use crate::{
    aba::{AssumptionSet, BipolarABAFramework},
    solvers::{ExtensionComputer, Semantics},
};
use anyhow::Result;
use std::fmt::Display;
use strum_macros::AsRefStr;

/// The role of a node in a dialectical tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum Role {
    /// The node holds a set brought by the proponent.
    #[strum(serialize = "PRO")]
    Proponent,
    /// The node holds a closed attacker brought by the opponent.
    #[strum(serialize = "OPP")]
    Opponent,
    /// The node marks that the held set does not meet the extra burden of the semantics.
    #[strum(serialize = "FAIL")]
    Failure,
}

/// A node of a dialectical tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialecticalNode {
    role: Role,
    support: Vec<String>,
    target: Option<String>,
    children: Vec<DialecticalNode>,
}

impl DialecticalNode {
    fn new(
        framework: &BipolarABAFramework,
        role: Role,
        support: &AssumptionSet,
        target: Option<usize>,
    ) -> Self {
        Self {
            role,
            support: support.keys(framework).iter().map(|k| k.to_string()).collect(),
            target: target.map(|t| framework.assumption(t).key().to_string()),
            children: vec![],
        }
    }

    /// Returns the role of the node.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the keys of the set held by this node, in increasing order.
    pub fn support(&self) -> &[String] {
        &self.support
    }

    /// Returns the key of the assumption under discussion at this node, if any.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns the children of this node.
    pub fn children(&self) -> &[DialecticalNode] {
        &self.children
    }

    /// Returns the number of nodes of the subtree rooted at this node.
    pub fn n_nodes(&self) -> usize {
        1 + self.children.iter().map(|c| c.n_nodes()).sum::<usize>()
    }

    fn fmt_indented(&self, f: &mut std::fmt::Formatter<'_>, indent: usize) -> std::fmt::Result {
        write!(
            f,
            "{}{}: {{{}}}",
            "  ".repeat(indent),
            self.role.as_ref(),
            self.support.join(", ")
        )?;
        if let Some(t) = &self.target {
            write!(f, " ⇒ {}", t)?;
        }
        for c in self.children.iter() {
            writeln!(f)?;
            c.fmt_indented(f, indent + 1)?;
        }
        Ok(())
    }
}

/// A proponent/opponent dialogue justifying an assumption held by a set, under a semantics.
///
/// The root is a proponent node holding the set and the assumption.
/// Each closed attacker of an assumption under discussion is an opponent node,
/// which is answered by a proponent node holding a part of the set that counter-attacks it.
/// When the set does not meet the extra burden of the semantics, the root gets a [Role::Failure] child.
///
/// # Example
///
/// ```
/// # use crubaba::aba::{BipolarABAFramework, Literal, Rule};
/// # use crubaba::explain::DialecticalTree;
/// # use crubaba::solvers::{ExtensionComputer, Semantics};
/// let lit = |k: &str| Literal::assumption(k);
/// let framework = BipolarABAFramework::new(
///     [lit("a"), lit("b")],
///     [(lit("a"), lit("not_a")), (lit("b"), lit("not_b"))],
///     [Rule::new(lit("not_a"), lit("b")), Rule::new(lit("not_b"), lit("a"))],
/// ).unwrap();
/// let mut computer = ExtensionComputer::new(&framework);
/// let delta = framework.assumption_set(&["a"]).unwrap();
/// let tree = DialecticalTree::build(&mut computer, &delta, "a", Semantics::Admissible, None).unwrap();
/// assert!(tree.is_burden_met());
/// assert_eq!("PRO: {a} ⇒ a\n  OPP: {b} ⇒ a\n    PRO: {a}", tree.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialecticalTree {
    semantics: Semantics,
    root: DialecticalNode,
    burden_met: bool,
}

impl DialecticalTree {
    /// Builds the dialectical tree of an assumption held by a set.
    ///
    /// The expansion stops once the depth reaches `max_depth`, if given.
    /// An opponent set is never expanded twice on the same branch.
    pub fn build(
        computer: &mut ExtensionComputer,
        delta: &AssumptionSet,
        alpha: &str,
        semantics: Semantics,
        max_depth: Option<usize>,
    ) -> Result<Self> {
        let framework = computer.framework();
        framework.check_set(delta, "dialectical tree computation")?;
        let alpha_id = framework.check_assumption(alpha, "dialectical tree computation")?;
        let mut builder = TreeBuilder {
            computer,
            semantics,
            delta,
            max_depth,
            opponent_path: vec![],
        };
        let mut root = DialecticalNode::new(framework, Role::Proponent, delta, Some(alpha_id));
        builder.expand_proponent(&mut root, alpha_id, 0);
        let burden_met = builder.computer.extra_burden(semantics, delta)?;
        if !burden_met {
            root.children.push(DialecticalNode::new(
                framework,
                Role::Failure,
                &AssumptionSet::new(),
                None,
            ));
        }
        Ok(Self {
            semantics,
            root,
            burden_met,
        })
    }

    /// Builds the dialectical tree of an assumption held by a set, given the name of the semantics.
    ///
    /// A [BabaError::Semantics](crate::aba::BabaError::Semantics) error is returned if the name is unknown.
    pub fn build_for_semantics_name(
        computer: &mut ExtensionComputer,
        delta: &AssumptionSet,
        alpha: &str,
        semantics_name: &str,
        max_depth: Option<usize>,
    ) -> Result<Self> {
        let semantics = Semantics::from_name(semantics_name)?;
        Self::build(computer, delta, alpha, semantics, max_depth)
    }

    /// Returns the semantics under which the tree was built.
    pub fn semantics(&self) -> Semantics {
        self.semantics
    }

    /// Returns the root of the tree.
    pub fn root(&self) -> &DialecticalNode {
        &self.root
    }

    /// Returns `true` iff the held set meets the extra burden of the semantics.
    pub fn is_burden_met(&self) -> bool {
        self.burden_met
    }
}

impl Display for DialecticalTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.root.fmt_indented(f, 0)
    }
}

struct TreeBuilder<'c, 'a, 'd> {
    computer: &'c mut ExtensionComputer<'a>,
    semantics: Semantics,
    delta: &'d AssumptionSet,
    max_depth: Option<usize>,
    opponent_path: Vec<AssumptionSet>,
}

impl TreeBuilder<'_, '_, '_> {
    fn depth_reached(&self, depth: usize) -> bool {
        self.max_depth.map(|m| depth >= m).unwrap_or(false)
    }

    fn expand_proponent(
        &mut self,
        node: &mut DialecticalNode,
        target: usize,
        depth: usize,
    ) {
        if self.depth_reached(depth) {
            return;
        }
        let framework = self.computer.framework();
        let attackers = self
            .semantics
            .driver()
            .closed_attackers(self.computer, target);
        for b in attackers {
            let mut opponent = DialecticalNode::new(framework, Role::Opponent, &b, Some(target));
            if !self.opponent_path.contains(&b) {
                self.opponent_path.push(b.clone());
                self.expand_opponent(&mut opponent, &b, depth + 1);
                self.opponent_path.pop();
            }
            node.children.push(opponent);
        }
    }

    // the assumption of the held set attacking the first member of the opponent set, or the whole set
    fn counter_attack(&mut self, attackers: &AssumptionSet) -> Option<AssumptionSet> {
        let reasoner = self.computer.reasoner();
        let first = attackers.iter().next()?;
        self.delta
            .iter()
            .map(AssumptionSet::singleton)
            .find(|x| reasoner.attacks_unchecked(x, first))
            .or_else(|| {
                if reasoner.attacks_set_unchecked(self.delta, attackers) {
                    Some(self.delta.clone())
                } else {
                    None
                }
            })
    }

    fn expand_opponent(&mut self, node: &mut DialecticalNode, attackers: &AssumptionSet, depth: usize) {
        if self.depth_reached(depth) {
            return;
        }
        let framework = self.computer.framework();
        let answer = match self.counter_attack(attackers) {
            Some(a) => a,
            None => return,
        };
        let mut proponent = DialecticalNode::new(framework, Role::Proponent, &answer, None);
        if !matches!(self.semantics, Semantics::Admissible | Semantics::Preferred) {
            for beta in attackers.iter() {
                let mut defense = DialecticalNode::new(framework, Role::Proponent, &answer, Some(beta));
                self.expand_proponent(&mut defense, beta, depth + 2);
                proponent.children.push(defense);
            }
        }
        node.children.push(proponent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aba::{test_frameworks::*, BabaError};

    fn tree(
        fw: &BipolarABAFramework,
        delta: &[&str],
        alpha: &str,
        semantics: Semantics,
        max_depth: Option<usize>,
    ) -> DialecticalTree {
        let mut computer = ExtensionComputer::new(fw);
        let delta = fw.assumption_set(delta).unwrap();
        DialecticalTree::build(&mut computer, &delta, alpha, semantics, max_depth).unwrap()
    }

    #[test]
    fn test_unattacked() {
        let fw = scenario_a();
        let t = tree(&fw, &["b"], "b", Semantics::Admissible, None);
        assert!(t.is_burden_met());
        assert_eq!(1, t.root().n_nodes());
        assert_eq!("PRO: {b} ⇒ b", t.to_string());
    }

    #[test]
    fn test_unanswered_attack() {
        let fw = scenario_a();
        let t = tree(&fw, &["a"], "a", Semantics::Complete, None);
        assert!(!t.is_burden_met());
        assert_eq!("PRO: {a} ⇒ a\n  OPP: {b} ⇒ a\n  FAIL: {}", t.to_string());
        assert_eq!(Role::Failure, t.root().children()[1].role());
    }

    #[test]
    fn test_preferred_burden() {
        let fw = scenario_b();
        let t = tree(&fw, &["a"], "a", Semantics::Preferred, None);
        assert!(t.is_burden_met());
        assert_eq!(Semantics::Preferred, t.semantics());
        let opponent = &t.root().children()[0];
        assert_eq!(Role::Opponent, opponent.role());
        assert_eq!(&["b".to_string()], opponent.support());
        assert_eq!(Some("a"), opponent.target());
    }

    #[test]
    fn test_deeper_defense() {
        let fw = scenario_b();
        let t = tree(&fw, &["a"], "a", Semantics::Complete, None);
        assert!(t.is_burden_met());
        assert_eq!(
            "PRO: {a} ⇒ a\n  OPP: {b} ⇒ a\n    PRO: {a}\n      PRO: {a} ⇒ b\n        OPP: {a} ⇒ b",
            t.to_string()
        );
    }

    #[test]
    fn test_repeated_opponent_not_expanded() {
        let fw = scenario_b();
        let t = tree(&fw, &["a", "b"], "a", Semantics::Complete, None);
        assert_eq!(
            [
                "PRO: {a, b} ⇒ a",
                "  OPP: {b} ⇒ a",
                "    PRO: {a}",
                "      PRO: {a} ⇒ b",
                "        OPP: {a} ⇒ b",
                "          PRO: {b}",
                "            PRO: {b} ⇒ a",
                "              OPP: {b} ⇒ a",
            ]
            .join("\n"),
            t.to_string()
        );
    }

    #[test]
    fn test_max_depth() {
        let fw = scenario_b();
        let t = tree(&fw, &["a"], "a", Semantics::Complete, Some(2));
        assert_eq!("PRO: {a} ⇒ a\n  OPP: {b} ⇒ a\n    PRO: {a}\n      PRO: {a} ⇒ b", t.to_string());
        let t = tree(&fw, &["a"], "a", Semantics::Complete, Some(0));
        assert_eq!("PRO: {a} ⇒ a", t.to_string());
    }

    #[test]
    fn test_stable_has_no_opponent() {
        let fw = scenario_b();
        let t = tree(&fw, &["a"], "a", Semantics::Stable, None);
        assert!(t.is_burden_met());
        assert_eq!(1, t.root().n_nodes());
    }

    #[test]
    fn test_single_assumption_answer() {
        // c attacks a; d, supported by e, attacks c
        let fw = framework_from(
            &["a", "c", "d", "e"],
            &[],
            &[("d", "e")],
            &[("a", "c"), ("c", "d")],
        );
        let t = tree(&fw, &["a", "e"], "a", Semantics::Admissible, None);
        assert_eq!(
            "PRO: {a, e} ⇒ a\n  OPP: {c} ⇒ a\n    PRO: {e}",
            t.to_string()
        );
    }

    #[test]
    fn test_whole_set_answer() {
        // c attacks a and supports k, which e attacks
        let fw = framework_from(
            &["a", "c", "e", "k"],
            &[],
            &[("k", "c")],
            &[("a", "c"), ("k", "e")],
        );
        let t = tree(&fw, &["a", "e"], "a", Semantics::Admissible, None);
        assert_eq!(
            "PRO: {a, e} ⇒ a\n  OPP: {c, k} ⇒ a\n    PRO: {a, e}",
            t.to_string()
        );
    }

    #[test]
    fn test_unknown_semantics() {
        let fw = scenario_a();
        let mut computer = ExtensionComputer::new(&fw);
        let err = DialecticalTree::build_for_semantics_name(
            &mut computer,
            &AssumptionSet::new(),
            "a",
            "semi-stable",
            None,
        )
        .unwrap_err();
        assert_eq!(
            Some(&BabaError::Semantics("semi-stable".to_string())),
            err.downcast_ref::<BabaError>()
        );
    }

    #[test]
    fn test_not_an_assumption() {
        let fw = scenario_a();
        let mut computer = ExtensionComputer::new(&fw);
        assert!(DialecticalTree::build(
            &mut computer,
            &AssumptionSet::new(),
            "not_a",
            Semantics::Admissible,
            None
        )
        .is_err());
    }
}
