use super::{BipolarABAFramework, Literal, Rule};

// "not_x" is the contrary of x; attacks are given as (attacked, attacker) pairs
pub(crate) fn framework_from(
    assumptions: &[&str],
    facts: &[&str],
    supports: &[(&str, &str)],
    attacks: &[(&str, &str)],
) -> BipolarABAFramework {
    let lit = |k: &str| Literal::assumption(k);
    let contrary = |k: &str| lit(&format!("not_{}", k));
    let all = assumptions
        .iter()
        .map(|k| lit(*k))
        .chain(facts.iter().map(|k| Literal::fact(*k)))
        .collect::<Vec<_>>();
    let contraries = all
        .iter()
        .map(|l| (l.clone(), contrary(l.key())))
        .collect::<Vec<_>>();
    let rules = supports
        .iter()
        .map(|&(h, b)| Rule::new(lit(h), lit(b)))
        .chain(
            attacks
                .iter()
                .map(|&(attacked, by)| Rule::new(contrary(attacked), lit(by))),
        )
        .collect::<Vec<_>>();
    BipolarABAFramework::new(all, contraries, rules).unwrap()
}

// b attacks a
pub(crate) fn scenario_a() -> BipolarABAFramework {
    framework_from(&["a", "b"], &[], &[], &[("a", "b")])
}

// a and b attack each other
pub(crate) fn scenario_b() -> BipolarABAFramework {
    framework_from(&["a", "b"], &[], &[], &[("a", "b"), ("b", "a")])
}

// a supports b, b supports c
pub(crate) fn scenario_c() -> BipolarABAFramework {
    framework_from(&["a", "b", "c"], &[], &[("b", "a"), ("c", "b")], &[])
}

// a mixed instance with supports, attacks, cycles and facts
pub(crate) fn mixed_framework() -> BipolarABAFramework {
    framework_from(
        &["a", "b", "c", "d", "e", "g", "h"],
        &["f"],
        &[("b", "a"), ("c", "g"), ("g", "c"), ("h", "e")],
        &[
            ("d", "b"),
            ("b", "d"),
            ("c", "e"),
            ("e", "f"),
            ("a", "h"),
            ("h", "c"),
            ("g", "g"),
        ],
    )
}
