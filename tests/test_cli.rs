use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::{
    prelude::{predicate, PredicateBooleanExt},
    BoxPredicate,
};

// a and b attack each other, a supports c
const INSTANCE: &str = r#"p baba
a a
a b
a c
c a not_a
c b not_b
c c not_c
x not_a b
x not_b a
s c a
"#;

fn run_on_instance(
    instance: &str,
    args: &[&str],
) -> Result<(NamedTempFile, assert_cmd::assert::Assert), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("instance.baba")?;
    file.write_str(instance)?;
    let mut cmd = Command::cargo_bin("crubaba")?;
    cmd.arg(args[0])
        .arg("-f")
        .arg(file.path())
        .args(&args[1..])
        .arg("--logging-level")
        .arg("off");
    let assert = cmd.assert();
    Ok((file, assert))
}

fn test_answer(args: &[&str], possible_answers: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    let (file, assert) = run_on_instance(INSTANCE, args)?;
    let mut pred = BoxPredicate::new(predicate::never());
    for a in possible_answers {
        pred = BoxPredicate::new(pred.or(predicate::str::contains(*a)));
    }
    assert.success().stdout(pred);
    file.close()?;
    Ok(())
}

fn test_failure(instance: &str, args: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    let (file, assert) = run_on_instance(instance, args)?;
    assert.failure().code(1);
    file.close()?;
    Ok(())
}

#[test]
fn test_solve_preferred() -> Result<(), Box<dyn std::error::Error>> {
    for engine in ["exhaustive", "sat"] {
        let (file, assert) =
            run_on_instance(INSTANCE, &["solve", "-s", "preferred", "--engine", engine])?;
        assert.success().stdout(
            predicate::str::contains("w a c\n")
                .and(predicate::str::contains("w b c\n"))
                .and(predicate::str::contains("NO").not()),
        );
        file.close()?;
    }
    Ok(())
}

#[test]
fn test_solve_well_founded() -> Result<(), Box<dyn std::error::Error>> {
    test_answer(&["solve", "-s", "wf"], &["w c\n"])
}

#[test]
fn test_solve_ideal() -> Result<(), Box<dyn std::error::Error>> {
    test_answer(&["solve", "-s", "ideal"], &["w c\n"])
}

#[test]
fn test_solve_stable_without_closure_implications() -> Result<(), Box<dyn std::error::Error>> {
    let (file, assert) = run_on_instance(
        INSTANCE,
        &["solve", "-s", "set-stable", "--no-closure-implications"],
    )?;
    assert.success().stdout(
        predicate::str::contains("w a c\n").and(predicate::str::contains("w b c\n")),
    );
    file.close()?;
    Ok(())
}

#[test]
fn test_solve_no_extension() -> Result<(), Box<dyn std::error::Error>> {
    // a attacks itself
    let instance = "p baba\na a\nc a not_a\nx not_a a\n";
    let (file, assert) = run_on_instance(instance, &["solve", "-s", "stable"])?;
    assert.success().stdout(predicate::eq("NO\n"));
    file.close()?;
    Ok(())
}

#[test]
fn test_solve_top_k() -> Result<(), Box<dyn std::error::Error>> {
    test_answer(
        &["solve", "-s", "preferred", "--top-k", "1"],
        &["s 2 a c\n", "s 2 b c\n"],
    )
}

#[test]
fn test_solve_top_k_unsupported_semantics() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(INSTANCE, &["solve", "-s", "complete", "--top-k", "1"])
}

#[test]
fn test_solve_unknown_semantics() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(INSTANCE, &["solve", "-s", "semi-stable"])
}

#[test]
fn test_accept_credulous() -> Result<(), Box<dyn std::error::Error>> {
    test_answer(&["accept", "-s", "preferred", "-a", "a"], &["YES\n"])
}

#[test]
fn test_accept_skeptical() -> Result<(), Box<dyn std::error::Error>> {
    test_answer(
        &["accept", "-s", "preferred", "-a", "a", "--skeptical"],
        &["NO\n"],
    )?;
    test_answer(
        &["accept", "-s", "preferred", "-a", "c", "--skeptical"],
        &["YES\n"],
    )
}

#[test]
fn test_accept_with_certificate() -> Result<(), Box<dyn std::error::Error>> {
    test_answer(
        &["accept", "-s", "complete", "-a", "b", "--with-certificate"],
        &["YES\nw b c\n"],
    )
}

#[test]
fn test_accept_unknown_assumption() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(INSTANCE, &["accept", "-s", "preferred", "-a", "not_a"])
}

#[test]
fn test_explain_derivation() -> Result<(), Box<dyn std::error::Error>> {
    test_answer(
        &["explain", "-g", "not_b", "-d", "a", "-d", "c"],
        &["not_b ← a\n  a\n"],
    )?;
    test_answer(&["explain", "-g", "c", "-d", "a"], &["c ← a\n  a\n"])
}

#[test]
fn test_explain_not_derivable() -> Result<(), Box<dyn std::error::Error>> {
    test_answer(&["explain", "-g", "not_a", "-d", "a"], &["NO\n"])
}

#[test]
fn test_explain_all_and_dag() -> Result<(), Box<dyn std::error::Error>> {
    test_answer(&["explain", "-g", "c", "-d", "a", "--all"], &["c ← a\n  a\n"])?;
    test_answer(
        &["explain", "-g", "c", "-d", "a", "--dag"],
        &["nodes: a c\na -> c\n"],
    )
}

#[test]
fn test_explain_unknown_goal() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(INSTANCE, &["explain", "-g", "z", "-d", "a"])
}

#[test]
fn test_explain_dialectical() -> Result<(), Box<dyn std::error::Error>> {
    let (file, assert) = run_on_instance(
        INSTANCE,
        &[
            "explain",
            "-g",
            "a",
            "-d",
            "a",
            "-d",
            "c",
            "--dialectical",
            "-s",
            "preferred",
        ],
    )?;
    assert.success().stdout(
        predicate::str::starts_with("PRO: {a, c} ⇒ a\n")
            .and(predicate::str::contains("OPP: {b"))
            .and(predicate::str::contains("FAIL").not()),
    );
    file.close()?;
    Ok(())
}

#[test]
fn test_explain_dialectical_requires_semantics() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(INSTANCE, &["explain", "-g", "a", "-d", "a", "--dialectical"])
}

#[test]
fn test_check_ok() -> Result<(), Box<dyn std::error::Error>> {
    let (file, assert) = run_on_instance(INSTANCE, &["check"])?;
    assert.success().stdout(predicate::str::is_empty());
    file.close()?;
    Ok(())
}

#[test]
fn test_check_missing_contrary() -> Result<(), Box<dyn std::error::Error>> {
    test_failure("p baba\na a\n", &["check"])
}

#[test]
fn test_check_rule_tag_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(
        "p baba\na a\na b\nc a not_a\nc b not_b\ns not_a b\n",
        &["check"],
    )
}

#[test]
fn test_check_missing_file() {
    let mut cmd = Command::cargo_bin("crubaba").unwrap();
    cmd.arg("check")
        .arg("-f")
        .arg("/this/file/does/not/exist.baba")
        .arg("--logging-level")
        .arg("off");
    cmd.assert().failure().code(1);
}

#[test]
fn test_authors() {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let authors = option_env!("CARGO_PKG_AUTHORS")
        .map(|v| v.replace(':', ", "))
        .unwrap_or_else(|| "unknown authors".to_string());
    let expected = format!("{} {}\n{}\n", app_name, app_version, authors);
    let mut cmd = Command::cargo_bin("crubaba").unwrap();
    cmd.arg("authors").arg("--logging-level").arg("off");
    cmd.assert()
        .success()
        .stdout(predicate::eq(expected.as_str()));
}

#[test]
fn test_semantics() {
    let mut cmd = Command::cargo_bin("crubaba").unwrap();
    cmd.arg("semantics").arg("--logging-level").arg("off");
    cmd.assert().success().stdout(predicate::eq(
        "admissible\ncomplete\npreferred\nset-stable\nwell-founded\nideal\n",
    ));
}

#[test]
fn test_no_subcommand() {
    let mut cmd = Command::cargo_bin("crubaba").unwrap();
    cmd.assert().failure().code(1);
}
