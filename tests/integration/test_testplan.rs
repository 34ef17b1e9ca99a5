//! Integration tests for `cargo selective test-plan`

use crate::helpers::{TestWorkspace, git, run_selective};
use anyhow::Result;

const PLAN: &str = r#"{
  "version": 1,
  "testTargets": [
    { "name": "engine", "enabled": false },
    { "name": "app", "enabled": true },
    { "name": "docs", "enabled": true }
  ]
}"#;

#[test]
fn test_testplan_enables_affected_and_disables_rest() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.add_crate("app", &["engine"])?;
  ws.add_test_plan("Selective.testplan.json", PLAN)?;
  ws.commit("Add crates and test plan")?;

  git(&ws.path, &["branch", "baseline"])?;

  ws.modify_file("engine", "src/lib.rs", "pub fn hello() {}\n")?;
  ws.commit("Modify engine")?;

  let output = run_selective(
    &ws.path,
    &["test-plan", "--base-branch", "baseline", "--test-plan", "Selective.testplan.json"],
  )?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Updated"), "got: {}", stdout);

  let written: serde_json::Value = serde_json::from_str(&ws.read_file("Selective.testplan.json")?)?;
  let targets = written["testTargets"].as_array().unwrap();
  assert_eq!(targets[0]["enabled"], serde_json::json!(true), "engine should be enabled");
  assert_eq!(targets[1]["enabled"], serde_json::json!(true), "app depends on engine");
  assert_eq!(targets[2]["enabled"], serde_json::json!(false), "docs is unaffected");

  // Unrelated document content survives the rewrite
  assert_eq!(written["version"], serde_json::json!(1));

  Ok(())
}

#[test]
fn test_testplan_dry_run_leaves_plan_untouched() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.add_test_plan("Selective.testplan.json", PLAN)?;
  ws.commit("Add engine and test plan")?;

  git(&ws.path, &["branch", "baseline"])?;

  ws.modify_file("engine", "src/lib.rs", "pub fn hello() {}\n")?;
  ws.commit("Modify engine")?;

  let before = ws.read_file("Selective.testplan.json")?;
  let output = run_selective(
    &ws.path,
    &[
      "test-plan",
      "--base-branch",
      "baseline",
      "--test-plan",
      "Selective.testplan.json",
      "--dry-run",
    ],
  )?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Would update"), "got: {}", stdout);
  assert_eq!(ws.read_file("Selective.testplan.json")?, before);

  Ok(())
}

#[test]
fn test_testplan_falls_back_to_workspace_candidate() -> Result<()> {
  // No --test-plan flag and no config: the *.testplan.json at the root wins
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.add_test_plan("Selective.testplan.json", PLAN)?;
  ws.commit("Add engine and test plan")?;

  git(&ws.path, &["branch", "baseline"])?;

  ws.modify_file("engine", "src/lib.rs", "pub fn hello() {}\n")?;
  ws.commit("Modify engine")?;

  let output = run_selective(&ws.path, &["test-plan", "--base-branch", "baseline"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Selective.testplan.json"), "got: {}", stdout);

  let written: serde_json::Value = serde_json::from_str(&ws.read_file("Selective.testplan.json")?)?;
  assert_eq!(written["testTargets"][0]["enabled"], serde_json::json!(true));

  Ok(())
}

#[test]
fn test_testplan_without_any_plan_fails_with_hint() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.commit("Add engine")?;

  git(&ws.path, &["branch", "baseline"])?;

  let result = run_selective(&ws.path, &["test-plan", "--base-branch", "baseline"]);
  let err = format!("{:#}", result.unwrap_err());
  assert!(err.contains("--test-plan"), "got: {}", err);

  Ok(())
}
