// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Command-line behaviour

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn flowsmith(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("flowsmith").unwrap();
    cmd.arg("-C")
        .arg(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("FLOWSMITH_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn generate_stdout_prints_workflow() {
    let dir = TempDir::new().unwrap();

    let output = flowsmith(&dir)
        .args(["generate", "--stdout", "--branch", "main"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["name"].as_str(), Some(".Net"));
    assert_eq!(doc["on"]["push"]["branches"][0].as_str(), Some("main"));
    assert_eq!(
        doc["jobs"]["Build"]["steps"].as_sequence().map(|s| s.len()),
        Some(5)
    );

    assert!(!dir.path().join(".github").exists());
}

#[test]
fn generate_writes_configured_output() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("flowsmith.toml"),
        r#"
output = "ci/release.yml"

[pipeline]
name = "Release"
project_path = "App/App.csproj"
tag_job = true
"#,
    )
    .unwrap();

    flowsmith(&dir)
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("ci/release.yml"));

    let content = std::fs::read_to_string(dir.path().join("ci/release.yml")).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();
    assert_eq!(doc["name"].as_str(), Some("Release"));
    assert!(doc["jobs"]["AddTag"].is_mapping());
}

#[test]
fn generate_output_flag_overrides_config() {
    let dir = TempDir::new().unwrap();

    flowsmith(&dir)
        .args(["generate", "--output", "out/ci.yml"])
        .assert()
        .success();

    assert!(dir.path().join("out/ci.yml").is_file());
}

#[test]
fn tag_job_without_project_fails() {
    let dir = TempDir::new().unwrap();

    flowsmith(&dir)
        .args(["generate", "--tag-job"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project_path"));

    assert!(!dir.path().join(".github").exists());
}

#[test]
fn check_reports_valid_pipeline() {
    let dir = TempDir::new().unwrap();

    flowsmith(&dir)
        .args(["check", "--tag-job", "--project", "App/App.csproj"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pipeline is valid"));
}

#[test]
fn graph_formats() {
    let dir = TempDir::new().unwrap();
    let args = ["--tag-job", "--project", "App/App.csproj"];

    flowsmith(&dir)
        .arg("graph")
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("2. AddTag (ubuntu-latest) [needs: Build]"));

    flowsmith(&dir)
        .args(["graph", "--format", "mermaid"])
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("Build --> AddTag"));

    flowsmith(&dir)
        .args(["graph", "--format", "dot"])
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Build\" -> \"AddTag\";"));
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();

    flowsmith(&dir).arg("init").assert().success();
    let config = std::fs::read_to_string(dir.path().join("flowsmith.toml")).unwrap();
    assert!(config.contains("[pipeline]"));

    flowsmith(&dir).arg("init").assert().failure();
    flowsmith(&dir).args(["init", "--force"]).assert().success();
}
