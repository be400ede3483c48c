use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::prelude::*;

fn run(instance: &str, file_name: &str, args: &[&str]) -> Result<assert_cmd::assert::Assert, Box<dyn std::error::Error>> {
    let file = NamedTempFile::new(file_name)?;
    file.write_str(instance)?;
    let mut cmd = Command::cargo_bin("crustaspic")?;
    cmd.args(args)
        .arg("-f")
        .arg(file.path())
        .arg("--logging-level")
        .arg("off");
    let assert = cmd.assert();
    file.close()?;
    Ok(assert)
}

#[test]
fn test_well_formed() -> Result<(), Box<dyn std::error::Error>> {
    run("axiom(p).\ndefeasible(d1,[p],q).\n", "theory.aspic", &["check"])?
        .success()
        .stdout(predicate::str::starts_with("well-formed\n"));
    Ok(())
}

#[test]
fn test_inconsistent_axioms() -> Result<(), Box<dyn std::error::Error>> {
    run("axiom(p).\naxiom(q).\ncontradictory(p,q).\n", "theory.aspic", &["check"])?
        .success()
        .stdout(predicate::str::starts_with("not well-formed\n"));
    Ok(())
}

#[test]
fn test_json_report() -> Result<(), Box<dyn std::error::Error>> {
    let assert = run(
        "axiom(p).\naxiom(q).\ncontradictory(p,q).\n",
        "theory.aspic",
        &["check", "-o", "json"],
    )?
    .success();
    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(serde_json::Value::Bool(false), report["wellFormed"]);
    assert_eq!(serde_json::Value::Bool(false), report["axiomConsistency"]);
    Ok(())
}

#[test]
fn test_json_theory() -> Result<(), Box<dyn std::error::Error>> {
    let theory = r#"{"knowledgeBase": {"axioms": ["p"]}}"#;
    run(theory, "theory.json", &["check", "-r", "json"])?
        .success()
        .stdout(predicate::str::starts_with("well-formed\n"));
    Ok(())
}

#[test]
fn test_duplicate_rule() -> Result<(), Box<dyn std::error::Error>> {
    run(
        "axiom(p).\ndefeasible(d1,[p],q).\ndefeasible(d1,[p],r).\n",
        "theory.aspic",
        &["check"],
    )?
    .failure();
    Ok(())
}

#[test]
fn test_transpose() -> Result<(), Box<dyn std::error::Error>> {
    run("axiom(p).\nstrict(s1,[p],q).\n", "theory.aspic", &["transpose"])?
        .success()
        .stdout(predicate::str::contains("strict(s1,[p],q).\n").and(predicate::str::contains(",[¬q],¬p).\n")));
    Ok(())
}

#[test]
fn test_transpose_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let first = run("axiom(p).\nstrict(s1,[p],q).\n", "theory.aspic", &["transpose"])?.success();
    let transposed = String::from_utf8(first.get_output().stdout.clone())?;
    run(&transposed, "transposed.aspic", &["transpose"])?
        .success()
        .stdout(predicate::eq(transposed.as_str()));
    Ok(())
}
