//! Integration tests for `cargo selective graph`

use crate::helpers::{TestWorkspace, git, run_selective};
use anyhow::Result;

#[test]
fn test_graph_outputs_dot() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.add_crate("app", &["engine"])?;
  ws.commit("Add crates")?;

  let output = run_selective(&ws.path, &["graph"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.starts_with("digraph"), "got: {}", stdout);
  assert!(stdout.contains("label=\"engine\""), "got: {}", stdout);
  assert!(stdout.contains("label=\"app\""), "got: {}", stdout);
  assert!(stdout.contains("->"), "got: {}", stdout);

  Ok(())
}

#[test]
fn test_graph_highlights_affected_targets() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("engine", &[])?;
  ws.add_crate("app", &["engine"])?;
  ws.commit("Add crates")?;

  git(&ws.path, &["branch", "baseline"])?;

  ws.modify_file("engine", "src/lib.rs", "pub fn hello() {}\n")?;
  ws.commit("Modify engine")?;

  let output = run_selective(
    &ws.path,
    &["graph", "--base-branch", "baseline", "--highlight-affected"],
  )?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("fillcolor=lightblue"), "got: {}", stdout);

  Ok(())
}
