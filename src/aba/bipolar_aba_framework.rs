use super::{AssumptionSet, BabaError, Literal, Rule, RuleKind};
use anyhow::Result;
use std::collections::{BTreeMap, HashMap};

/// A validated bipolar ABA framework.
///
/// A framework is made of a set of assumptions (some of them may be facts),
/// a contrary function mapping each assumption to its contrary literal, and single-premise rules.
/// A rule whose head is an assumption is a support rule; a rule whose head is a contrary is an attack rule.
///
/// Frameworks are immutable once built.
/// The consistency of the input is checked at construction time; see [BipolarABAFramework::new].
///
/// Internally, assumptions are given indices in the lexicographic order of their keys.
/// These indices are used by [AssumptionSet] objects and by the reasoning algorithms.
///
/// # Example
///
/// ```
/// # use crubaba::aba::{BipolarABAFramework, Literal, Rule};
/// let a = Literal::assumption("a");
/// let b = Literal::assumption("b");
/// let framework = BipolarABAFramework::new(
///     [a.clone(), b.clone()],
///     [(a.clone(), Literal::assumption("not_a")), (b.clone(), Literal::assumption("not_b"))],
///     [Rule::new(Literal::assumption("not_a"), b.clone())],
/// ).unwrap();
/// assert_eq!(2, framework.n_assumptions());
/// assert_eq!(1, framework.n_attack_rules());
/// ```
#[derive(Debug)]
pub struct BipolarABAFramework {
    assumptions: Vec<Literal>,
    key_to_id: HashMap<String, usize>,
    contraries: Vec<Literal>,
    contrary_to_id: HashMap<String, usize>,
    rules: Vec<(Rule, RuleKind)>,
    support_from: Vec<Vec<usize>>,
    attack_from: Vec<Vec<usize>>,
    attacked_by: Vec<Vec<usize>>,
    support_reachability: Vec<Vec<bool>>,
}

impl BipolarABAFramework {
    /// Builds a new framework.
    ///
    /// Assumptions with the same key are merged, keeping the first occurrence.
    /// A [BabaError::Validation] error is returned if:
    /// - a contrary is given for a literal that is not an assumption;
    /// - an assumption is given two different contraries;
    /// - an assumption has no contrary;
    /// - two assumptions share the same contrary;
    /// - a rule body is not an assumption;
    /// - a rule head is neither an assumption nor a contrary.
    pub fn new<A, C, R>(assumptions: A, contraries: C, rules: R) -> Result<Self>
    where
        A: IntoIterator<Item = Literal>,
        C: IntoIterator<Item = (Literal, Literal)>,
        R: IntoIterator<Item = Rule>,
    {
        let mut sorted_assumptions = BTreeMap::new();
        for a in assumptions {
            if !sorted_assumptions.contains_key(a.key()) {
                sorted_assumptions.insert(a.key().to_string(), a);
            }
        }
        let assumptions = sorted_assumptions.into_values().collect::<Vec<_>>();
        let key_to_id = assumptions
            .iter()
            .enumerate()
            .map(|(i, a)| (a.key().to_string(), i))
            .collect::<HashMap<_, _>>();
        let contraries = Self::check_contraries(&assumptions, &key_to_id, contraries)?;
        let mut contrary_to_id = HashMap::with_capacity(contraries.len());
        let mut shared = Vec::new();
        for (i, c) in contraries.iter().enumerate() {
            if let Some(other) = contrary_to_id.insert(c.key().to_string(), i) {
                shared.push(c.key().to_string());
                shared.push(assumptions[i].key().to_string());
                shared.push(assumptions[other].key().to_string());
            }
        }
        if !shared.is_empty() {
            return Err(BabaError::validation(
                "some assumptions share the same contrary",
                shared,
            )
            .into());
        }
        let mut framework = BipolarABAFramework {
            support_from: vec![vec![]; assumptions.len()],
            attack_from: vec![vec![]; assumptions.len()],
            attacked_by: vec![vec![]; assumptions.len()],
            support_reachability: vec![],
            assumptions,
            key_to_id,
            contraries,
            contrary_to_id,
            rules: vec![],
        };
        framework.add_rules(rules)?;
        framework.compute_support_reachability();
        Ok(framework)
    }

    fn check_contraries<C>(
        assumptions: &[Literal],
        key_to_id: &HashMap<String, usize>,
        contraries: C,
    ) -> Result<Vec<Literal>>
    where
        C: IntoIterator<Item = (Literal, Literal)>,
    {
        let mut result: Vec<Option<Literal>> = vec![None; assumptions.len()];
        let mut unknown = Vec::new();
        let mut ambiguous = Vec::new();
        for (assumption, contrary) in contraries {
            match key_to_id.get(assumption.key()) {
                None => unknown.push(assumption.key().to_string()),
                Some(id) => match &result[*id] {
                    Some(c) if c != &contrary => ambiguous.push(assumption.key().to_string()),
                    Some(_) => {}
                    None => result[*id] = Some(contrary),
                },
            }
        }
        if !unknown.is_empty() {
            return Err(BabaError::validation(
                "a contrary is given for a literal that is not an assumption",
                unknown,
            )
            .into());
        }
        if !ambiguous.is_empty() {
            return Err(BabaError::validation(
                "several contraries are given for the same assumption",
                ambiguous,
            )
            .into());
        }
        let missing = result
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| assumptions[i].key().to_string())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(BabaError::validation("some assumptions have no contrary", missing).into());
        }
        Ok(result.into_iter().flatten().collect())
    }

    fn add_rules<R>(&mut self, rules: R) -> Result<()>
    where
        R: IntoIterator<Item = Rule>,
    {
        let mut invalid_bodies = Vec::new();
        let mut invalid_heads = Vec::new();
        for rule in rules {
            let body_id = match self.assumption_id(rule.body().key()) {
                Some(id) => id,
                None => {
                    invalid_bodies.push(rule.body().key().to_string());
                    continue;
                }
            };
            if let Some(head_id) = self.assumption_id(rule.head().key()) {
                self.support_from[body_id].push(head_id);
                self.rules.push((rule, RuleKind::Support));
            } else if let Some(target_id) = self.contrary_target_id(rule.head().key()) {
                self.attack_from[body_id].push(target_id);
                self.attacked_by[target_id].push(body_id);
                self.rules.push((rule, RuleKind::Attack));
            } else {
                invalid_heads.push(rule.head().key().to_string());
            }
        }
        if !invalid_bodies.is_empty() {
            return Err(BabaError::validation(
                "the body of a rule must be an assumption",
                invalid_bodies,
            )
            .into());
        }
        if !invalid_heads.is_empty() {
            return Err(BabaError::validation(
                "the head of a rule must be an assumption or a contrary",
                invalid_heads,
            )
            .into());
        }
        let sort_dedup = |v: &mut Vec<Vec<usize>>| {
            v.iter_mut().for_each(|ids| {
                ids.sort_unstable();
                ids.dedup()
            })
        };
        sort_dedup(&mut self.support_from);
        sort_dedup(&mut self.attack_from);
        sort_dedup(&mut self.attacked_by);
        Ok(())
    }

    // Warshall's algorithm on the reflexive support relation
    fn compute_support_reachability(&mut self) {
        let n = self.assumptions.len();
        let mut reach = vec![vec![false; n]; n];
        for (i, row) in reach.iter_mut().enumerate() {
            row[i] = true;
            self.support_from[i].iter().for_each(|j| row[*j] = true);
        }
        for k in 0..n {
            let row_k = reach[k].clone();
            for row_i in reach.iter_mut() {
                if row_i[k] {
                    row_i
                        .iter_mut()
                        .zip(row_k.iter())
                        .filter(|(_, r)| **r)
                        .for_each(|(r, _)| *r = true);
                }
            }
        }
        self.support_reachability = reach;
    }

    /// Returns the number of assumptions, facts included.
    pub fn n_assumptions(&self) -> usize {
        self.assumptions.len()
    }

    /// Iterates over the assumptions, ordered by key.
    pub fn iter_assumptions(&self) -> impl Iterator<Item = &Literal> + '_ {
        self.assumptions.iter()
    }

    /// Iterates over the facts, ordered by key.
    pub fn iter_facts(&self) -> impl Iterator<Item = &Literal> + '_ {
        self.assumptions.iter().filter(|a| a.is_fact())
    }

    /// Returns the assumption with the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index does not refer to an assumption of this framework.
    pub fn assumption(&self, id: usize) -> &Literal {
        &self.assumptions[id]
    }

    /// Returns the index of the assumption with the given key, if any.
    pub fn assumption_id(&self, key: &str) -> Option<usize> {
        self.key_to_id.get(key).copied()
    }

    /// Returns `true` iff the key refers to an assumption.
    pub fn is_assumption(&self, key: &str) -> bool {
        self.key_to_id.contains_key(key)
    }

    /// Returns `true` iff the key refers to the contrary of an assumption.
    pub fn is_contrary(&self, key: &str) -> bool {
        self.contrary_to_id.contains_key(key)
    }

    /// Returns the contrary of the assumption with the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index does not refer to an assumption of this framework.
    pub fn contrary(&self, id: usize) -> &Literal {
        &self.contraries[id]
    }

    /// Returns the index of the assumption the contrary of which has the given key, if any.
    pub fn contrary_target_id(&self, contrary_key: &str) -> Option<usize> {
        self.contrary_to_id.get(contrary_key).copied()
    }

    /// Returns the number of rules.
    pub fn n_rules(&self) -> usize {
        self.rules.len()
    }

    /// Returns the number of attack rules.
    pub fn n_attack_rules(&self) -> usize {
        self.rules
            .iter()
            .filter(|(_, k)| *k == RuleKind::Attack)
            .count()
    }

    /// Iterates over the rules and their kinds, in the order they were given.
    pub fn iter_rules(&self) -> impl Iterator<Item = (&Rule, RuleKind)> + '_ {
        self.rules.iter().map(|(r, k)| (r, *k))
    }

    /// Returns the kind a rule with the given head would have in this framework, if any.
    pub fn rule_kind_for_head(&self, head_key: &str) -> Option<RuleKind> {
        if self.is_assumption(head_key) {
            Some(RuleKind::Support)
        } else if self.is_contrary(head_key) {
            Some(RuleKind::Attack)
        } else {
            None
        }
    }

    /// Returns the indices of the assumptions directly supported by the given one.
    pub(crate) fn support_from(&self, id: usize) -> &[usize] {
        &self.support_from[id]
    }

    /// Returns the indices of the assumptions directly attacked by the given one.
    pub(crate) fn attack_from(&self, id: usize) -> &[usize] {
        &self.attack_from[id]
    }

    /// Returns the indices of the assumptions directly attacking the given one.
    pub(crate) fn attacked_by(&self, id: usize) -> &[usize] {
        &self.attacked_by[id]
    }

    /// Returns `true` iff `to` is reachable from `from` by following support rules (zero step included).
    pub(crate) fn supports_transitively(&self, from: usize, to: usize) -> bool {
        self.support_reachability[from][to]
    }

    /// Builds the set of assumptions with the given keys.
    ///
    /// A [BabaError::Domain] error naming the unknown keys is returned if some keys are not assumptions.
    pub fn assumption_set<S>(&self, keys: &[S]) -> Result<AssumptionSet>
    where
        S: AsRef<str>,
    {
        let mut unknown = Vec::new();
        let mut set = AssumptionSet::new();
        for k in keys {
            match self.assumption_id(k.as_ref()) {
                Some(id) => {
                    set.insert(id);
                }
                None => unknown.push(k.as_ref().to_string()),
            }
        }
        if unknown.is_empty() {
            Ok(set)
        } else {
            Err(BabaError::domain("assumption set", "not an assumption", unknown).into())
        }
    }

    /// Returns the set of all the assumptions.
    pub fn all_assumptions(&self) -> AssumptionSet {
        AssumptionSet::from_ids(0..self.n_assumptions())
    }

    pub(crate) fn check_set(&self, set: &AssumptionSet, operation: &'static str) -> Result<()> {
        match set.max_id() {
            Some(id) if id >= self.n_assumptions() => Err(BabaError::domain(
                operation,
                "the assumption set was not built for this framework",
                [format!("#{}", id)],
            )
            .into()),
            _ => Ok(()),
        }
    }

    pub(crate) fn check_assumption(&self, key: &str, operation: &'static str) -> Result<usize> {
        self.assumption_id(key)
            .ok_or_else(|| BabaError::domain(operation, "not an assumption", [key]).into())
    }

    /// Returns, for each fact attacking at least one assumption, the assumptions it directly attacks.
    ///
    /// Facts and attacked assumptions are ordered by key.
    pub fn fact_attacks(&self) -> Vec<(&Literal, Vec<&Literal>)> {
        self.assumptions
            .iter()
            .enumerate()
            .filter(|(i, a)| a.is_fact() && !self.attack_from[*i].is_empty())
            .map(|(i, a)| {
                (
                    a,
                    self.attack_from[i]
                        .iter()
                        .map(|j| &self.assumptions[*j])
                        .collect(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a(k: &str) -> Literal {
        Literal::assumption(k)
    }

    fn contrary_pairs(keys: &[&str]) -> Vec<(Literal, Literal)> {
        keys.iter()
            .map(|k| (a(k), a(&format!("not_{}", k))))
            .collect()
    }

    fn validation_keys(r: Result<BipolarABAFramework>) -> Vec<String> {
        match r.unwrap_err().downcast::<BabaError>().unwrap() {
            BabaError::Validation { keys, .. } => keys,
            e => panic!("unexpected error {}", e),
        }
    }

    #[test]
    fn test_new_ok() {
        let fw = BipolarABAFramework::new(
            [a("b"), a("a"), Literal::fact("f")],
            contrary_pairs(&["a", "b", "f"]),
            [
                Rule::new(a("b"), a("a")),
                Rule::new(a("not_a"), a("f")),
                Rule::new(a("not_b"), a("a")),
            ],
        )
        .unwrap();
        assert_eq!(3, fw.n_assumptions());
        assert_eq!(
            vec!["a", "b", "f"],
            fw.iter_assumptions().map(|l| l.key()).collect::<Vec<_>>()
        );
        assert_eq!(Some(0), fw.assumption_id("a"));
        assert_eq!(Some(1), fw.contrary_target_id("not_b"));
        assert_eq!("not_f", fw.contrary(2).key());
        assert_eq!(&[1], fw.support_from(0));
        assert_eq!(&[1], fw.attack_from(0));
        assert_eq!(&[2], fw.attacked_by(0));
        assert_eq!(3, fw.n_rules());
        assert_eq!(2, fw.n_attack_rules());
        assert_eq!(Some(RuleKind::Attack), fw.rule_kind_for_head("not_a"));
        assert_eq!(Some(RuleKind::Support), fw.rule_kind_for_head("a"));
        assert_eq!(None, fw.rule_kind_for_head("x"));
    }

    #[test]
    fn test_duplicate_assumptions_are_merged() {
        let fw = BipolarABAFramework::new(
            [a("a").with_payload("first"), Literal::fact("a")],
            contrary_pairs(&["a"]),
            [],
        )
        .unwrap();
        assert_eq!(1, fw.n_assumptions());
        assert_eq!(Some("first"), fw.assumption(0).payload());
    }

    #[test]
    fn test_missing_contrary() {
        let r = BipolarABAFramework::new([a("a"), a("b"), a("c")], contrary_pairs(&["b"]), []);
        assert_eq!(vec!["a", "c"], validation_keys(r));
    }

    #[test]
    fn test_contrary_of_unknown_literal() {
        let r = BipolarABAFramework::new([a("a")], contrary_pairs(&["a", "z"]), []);
        assert_eq!(vec!["z"], validation_keys(r));
    }

    #[test]
    fn test_ambiguous_contrary() {
        let r = BipolarABAFramework::new(
            [a("a")],
            [(a("a"), a("x")), (a("a"), a("y"))],
            [],
        );
        assert_eq!(vec!["a"], validation_keys(r));
    }

    #[test]
    fn test_shared_contrary() {
        let r = BipolarABAFramework::new(
            [a("a"), a("b"), a("c")],
            [(a("a"), a("x")), (a("b"), a("x")), (a("c"), a("y"))],
            [],
        );
        assert_eq!(vec!["a", "b", "x"], validation_keys(r));
    }

    #[test]
    fn test_body_not_an_assumption() {
        let r = BipolarABAFramework::new(
            [a("a")],
            contrary_pairs(&["a"]),
            [Rule::new(a("a"), a("not_a"))],
        );
        assert_eq!(vec!["not_a"], validation_keys(r));
    }

    #[test]
    fn test_head_unknown() {
        let r = BipolarABAFramework::new(
            [a("a")],
            contrary_pairs(&["a"]),
            [Rule::new(a("q"), a("a"))],
        );
        assert_eq!(vec!["q"], validation_keys(r));
    }

    #[test]
    fn test_support_reachability() {
        let fw = BipolarABAFramework::new(
            [a("a"), a("b"), a("c"), a("d")],
            contrary_pairs(&["a", "b", "c", "d"]),
            [
                Rule::new(a("b"), a("a")),
                Rule::new(a("c"), a("b")),
                Rule::new(a("b"), a("c")),
            ],
        )
        .unwrap();
        assert!(fw.supports_transitively(0, 0));
        assert!(fw.supports_transitively(0, 2));
        assert!(fw.supports_transitively(2, 1));
        assert!(!fw.supports_transitively(2, 0));
        assert!(!fw.supports_transitively(0, 3));
    }

    #[test]
    fn test_assumption_set() {
        let fw = BipolarABAFramework::new([a("a"), a("b")], contrary_pairs(&["a", "b"]), []).unwrap();
        let s = fw.assumption_set(&["b"]).unwrap();
        assert_eq!(vec!["b"], s.keys(&fw));
        let err = fw.assumption_set(&["a", "not_a", "z"]).unwrap_err();
        assert_eq!(
            vec!["not_a", "z"],
            err.downcast_ref::<BabaError>().unwrap().keys()
        );
        assert_eq!(2, fw.all_assumptions().len());
        assert!(fw
            .check_set(&AssumptionSet::singleton(2), "test")
            .is_err());
    }

    #[test]
    fn test_fact_attacks() {
        let fw = BipolarABAFramework::new(
            [a("a"), a("b"), Literal::fact("f"), Literal::fact("g")],
            contrary_pairs(&["a", "b", "f", "g"]),
            [
                Rule::new(a("not_b"), a("f")),
                Rule::new(a("not_a"), a("f")),
                Rule::new(a("a"), a("g")),
            ],
        )
        .unwrap();
        let attacks = fw.fact_attacks();
        assert_eq!(1, attacks.len());
        assert_eq!("f", attacks[0].0.key());
        assert_eq!(
            vec!["a", "b"],
            attacks[0].1.iter().map(|l| l.key()).collect::<Vec<_>>()
        );
    }
}
