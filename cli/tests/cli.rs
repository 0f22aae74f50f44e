use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../core/tests/fixtures")
        .join(name)
}

fn geogen() -> Command {
    Command::cargo_bin("geogen").unwrap()
}

#[test]
fn test_constructions_listing() {
    geogen()
        .arg("constructions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Midpoint"))
        .stdout(predicate::str::contains("CenterOfCircle"));
}

#[test]
fn test_run_prints_summary() {
    geogen()
        .arg("run")
        .arg(fixture("triangle_midpoints.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("problem:    triangle_midpoints"))
        .stdout(predicate::str::contains("iteration 1: 1 configurations"))
        .stdout(predicate::str::contains("emitted:    1"));
}

#[test]
fn test_run_with_overrides_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");

    geogen()
        .arg("run")
        .arg(fixture("free_points.json"))
        .args(["--iterations", "1", "--seed", "3", "--pictures", "4", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote"));

    let json = std::fs::read_to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["configurations"].as_array().unwrap().len(), 3);
}

#[test]
fn test_degenerate_problem_fails() {
    geogen()
        .arg("run")
        .arg(fixture("degenerate_initial.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to set up problem degenerate_initial"));
}

#[test]
fn test_missing_problem_file() {
    geogen()
        .args(["run", "/nonexistent/problem.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load problem"));
}
