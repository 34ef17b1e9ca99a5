//! Integration tests for `cargo selective affected`

use crate::helpers::{TestWorkspace, git, run_selective};
use anyhow::Result;

/// Target names from cargo metadata may keep hyphens or normalize them.
fn mentions(stdout: &str, name: &str) -> bool {
  stdout.contains(name) || stdout.contains(&name.replace('-', "_"))
}

#[test]
fn test_affected_basic() -> Result<()> {
  // lib-b depends on lib-a; a change in lib-a affects both
  let ws = TestWorkspace::new()?;
  ws.add_crate("lib-a", &[])?;
  ws.add_crate("lib-b", &["lib-a"])?;
  ws.commit("Add lib-a and lib-b")?;

  git(&ws.path, &["branch", "baseline"])?;

  ws.modify_file("lib-a", "src/lib.rs", "pub fn hello() -> &'static str { \"Modified\" }\n")?;
  ws.commit("Modify lib-a")?;

  let output = run_selective(&ws.path, &["affected", "--base-branch", "baseline"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(mentions(&stdout, "lib-a"), "lib-a should be affected, got: {}", stdout);
  assert!(mentions(&stdout, "lib-b"), "lib-b should be in dependents, got: {}", stdout);

  Ok(())
}

#[test]
fn test_affected_no_changes() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.commit("Add engine")?;

  git(&ws.path, &["branch", "baseline"])?;

  let output = run_selective(&ws.path, &["affected", "--base-branch", "baseline"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("No affected targets"), "Expected empty result, got: {}", stdout);

  Ok(())
}

#[test]
fn test_affected_json_output() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.commit("Add engine")?;

  git(&ws.path, &["branch", "baseline"])?;

  ws.modify_file("engine", "src/lib.rs", "pub fn hello() {}\n")?;
  ws.commit("Modify engine")?;

  let output = run_selective(&ws.path, &["affected", "--base-branch", "baseline", "--format", "json"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  let records: serde_json::Value = serde_json::from_str(&stdout)?;
  let records = records.as_array().expect("JSON output should be an array");
  assert!(!records.is_empty());

  let entry = &records[0];
  assert_eq!(entry["name"], "engine");
  assert_eq!(entry["type"], "package");
  assert!(entry["path"].as_str().unwrap().contains("engine"));

  Ok(())
}

#[test]
fn test_affected_names_only_output() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.add_crate("app", &["engine"])?;
  ws.commit("Add crates")?;

  git(&ws.path, &["branch", "baseline"])?;

  ws.modify_file("engine", "src/lib.rs", "pub fn hello() {}\n")?;
  ws.commit("Modify engine")?;

  let output = run_selective(&ws.path, &["affected", "--base-branch", "baseline", "--format", "names-only"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  let names: Vec<&str> = stdout.lines().collect();
  assert!(names.contains(&"engine"), "got: {}", stdout);
  assert!(names.contains(&"app"), "got: {}", stdout);

  Ok(())
}

#[test]
fn test_affected_by_folder_ownership() -> Result<()> {
  // README.md is not enumerated by any target; the package folder owns it
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.commit("Add engine")?;

  git(&ws.path, &["branch", "baseline"])?;

  ws.modify_file("engine", "README.md", "# Modified\n")?;
  ws.commit("Modify engine README")?;

  let output = run_selective(&ws.path, &["affected", "--base-branch", "baseline", "--format", "names-only"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.lines().any(|l| l == "engine"), "got: {}", stdout);

  Ok(())
}

#[test]
fn test_affected_local_changes_without_base_branch() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.commit("Add engine")?;

  // Uncommitted modification
  ws.modify_file("engine", "src/lib.rs", "pub fn hello() {}\n")?;

  let output = run_selective(&ws.path, &["affected", "--format", "names-only"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.lines().any(|l| l == "engine"), "got: {}", stdout);

  Ok(())
}

#[test]
fn test_affected_project_manifest_target() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.add_project_manifest(
    "tools/acceptance",
    r#"[[targets]]
name = "acceptance"
folders = ["scenarios"]
depends-on = ["engine"]
"#,
  )?;
  ws.commit("Add engine and acceptance suite")?;

  git(&ws.path, &["branch", "baseline"])?;

  // A change in engine also affects the acceptance target through depends-on
  ws.modify_file("engine", "src/lib.rs", "pub fn hello() {}\n")?;
  ws.commit("Modify engine")?;

  let output = run_selective(&ws.path, &["affected", "--base-branch", "baseline", "--format", "names-only"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.lines().any(|l| l == "engine"), "got: {}", stdout);
  assert!(stdout.lines().any(|l| l == "acceptance"), "got: {}", stdout);

  Ok(())
}

#[test]
fn test_affected_verbose_dumps_workspace_index() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.commit("Add engine")?;

  git(&ws.path, &["branch", "baseline"])?;

  let output = run_selective(&ws.path, &["--verbose", "affected", "--base-branch", "baseline"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Targets:"), "got: {}", stdout);
  assert!(stdout.contains("Folders for targets:"), "got: {}", stdout);

  Ok(())
}
