use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::prelude::*;
use serde_json::{json, Value};

const CYCLIC_GRAPH: &str = r#"{
    "claims": [{"id": "c1", "text": "A"}, {"id": "c2", "text": "B"}, {"id": "c3", "text": "C"}],
    "preferences": [
        {"id": "pa1", "preferred": {"kind": "claim", "id": "c1"}, "dispreferred": {"kind": "claim", "id": "c2"}},
        {"id": "pa2", "preferred": {"kind": "claim", "id": "c2"}, "dispreferred": {"kind": "claim", "id": "c3"}},
        {"id": "pa3", "preferred": {"kind": "claim", "id": "c3"}, "dispreferred": {"kind": "claim", "id": "c1"}}
    ]
}"#;

const ARGUMENT_GRAPH: &str = r#"{
    "claims": [{"id": "c1", "text": "p", "axiom": true}, {"id": "c2", "text": "q"}],
    "arguments": [{"id": "a1", "premises": ["c1"], "conclusion": "c2"}],
    "preferences": [
        {"id": "pa1", "preferred": {"kind": "claim", "id": "c1"}, "dispreferred": {"kind": "claim", "id": "missing"}}
    ]
}"#;

fn run_with_graph(graph: &str, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("graph.json")?;
    file.write_str(graph)?;
    let mut cmd = Command::cargo_bin("crustaspic")?;
    cmd.arg("preferences")
        .args(args)
        .arg("-f")
        .arg(file.path())
        .arg("--logging-level")
        .arg("off");
    let assert = cmd.assert().success();
    let value = serde_json::from_slice(&assert.get_output().stdout)?;
    file.close()?;
    Ok(value)
}

#[test]
fn test_cycles() -> Result<(), Box<dyn std::error::Error>> {
    let cycles = run_with_graph(CYCLIC_GRAPH, &["--action", "cycles"])?;
    assert_eq!(json!([["A", "B", "C"]]), cycles["premiseCycles"]);
    assert_eq!(json!([]), cycles["ruleCycles"]);
    Ok(())
}

#[test]
fn test_stats() -> Result<(), Box<dyn std::error::Error>> {
    let stats = run_with_graph(CYCLIC_GRAPH, &["--action", "stats"])?;
    assert_eq!(3, stats["totalPreferences"]);
    assert_eq!(3, stats["premisePreferences"]);
    assert_eq!(0, stats["rulePreferences"]);
    Ok(())
}

#[test]
fn test_populate_drops_missing_elements() -> Result<(), Box<dyn std::error::Error>> {
    let populated = run_with_graph(ARGUMENT_GRAPH, &[])?;
    assert_eq!(json!([]), populated["premisePreferences"]);
    assert_eq!(1, populated["warnings"].as_array().map(|w| w.len()).unwrap_or_default());
    Ok(())
}

#[test]
fn test_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let report = run_with_graph(CYCLIC_GRAPH, &["--action", "round-trip"])?;
    assert_eq!(Value::Bool(true), report["success"]);
    Ok(())
}

#[test]
fn test_sync() -> Result<(), Box<dyn std::error::Error>> {
    let theory = NamedTempFile::new("theory.aspic")?;
    theory.write_str("axiom(p).\npremise(q).\nprefer_premise(q,p).\n")?;
    let graph = run_with_graph(
        ARGUMENT_GRAPH,
        &["--action", "sync", "--theory", theory.path().to_str().unwrap_or_default()],
    )?;
    assert_eq!(2, graph["preferences"].as_array().map(|p| p.len()).unwrap_or_default());
    theory.close()?;
    Ok(())
}

#[test]
fn test_sync_requires_theory() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("graph.json")?;
    file.write_str(CYCLIC_GRAPH)?;
    let mut cmd = Command::cargo_bin("crustaspic")?;
    cmd.args(["preferences", "--action", "sync", "-f"])
        .arg(file.path())
        .assert()
        .failure();
    file.close()?;
    Ok(())
}

#[test]
fn test_evaluate_graph() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("graph.json")?;
    file.write_str(ARGUMENT_GRAPH)?;
    let mut cmd = Command::cargo_bin("crustaspic")?;
    cmd.args(["evaluate", "-r", "graph", "--logging-level", "off", "-f"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(" in p\n").and(predicate::str::contains(" in q\n")));
    file.close()?;
    Ok(())
}
