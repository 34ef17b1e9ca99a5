//! Test plan persistence
//!
//! A test plan is a JSON document with a `testTargets` array whose entries
//! carry a `name` and an `enabled` flag. The writer flips `enabled` so that
//! exactly the entries naming an affected target run, and leaves every
//! other part of the document untouched (plans carry runner configuration
//! this tool knows nothing about).

use crate::core::error::{PlanError, ResultExt, SelectiveError, SelectiveResult};
use crate::graph::target::TargetIdentity;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Summary of a plan rewrite.
#[derive(Debug, Clone, Default)]
pub struct TestPlanUpdate {
  pub enabled: Vec<String>,
  pub disabled: Vec<String>,
}

/// Rewrite the plan at `path` so the entries matching `affected` (by name)
/// are enabled and all others disabled.
pub fn update_test_plan(path: &Path, affected: &HashSet<TargetIdentity>) -> SelectiveResult<TestPlanUpdate> {
  let names: HashSet<String> = affected.iter().map(|t| t.name().to_string()).collect();

  let mut plan = read_test_plan(path)?;
  let update = apply_affected(&mut plan, &names, path)?;

  let content = serde_json::to_string_pretty(&plan).context("Failed to serialize test plan")?;
  fs::write(path, content).with_context(|| format!("Failed to write test plan to {}", path.display()))?;

  Ok(update)
}

pub fn read_test_plan(path: &Path) -> SelectiveResult<Value> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read test plan from {}", path.display()))?;
  serde_json::from_str(&content).map_err(|e| {
    SelectiveError::Plan(PlanError::Malformed {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })
  })
}

/// Set `enabled` on every `testTargets` entry per membership of its `name`
/// in `names`. Pure; the document is edited in place so unrelated content
/// survives verbatim.
pub fn apply_affected(plan: &mut Value, names: &HashSet<String>, path: &Path) -> SelectiveResult<TestPlanUpdate> {
  let malformed = |reason: &str| {
    SelectiveError::Plan(PlanError::Malformed {
      path: path.to_path_buf(),
      reason: reason.to_string(),
    })
  };

  let targets = plan
    .get_mut("testTargets")
    .ok_or_else(|| malformed("missing testTargets array"))?
    .as_array_mut()
    .ok_or_else(|| malformed("testTargets is not an array"))?;

  let mut update = TestPlanUpdate::default();

  for entry in targets.iter_mut() {
    let object = entry.as_object_mut().ok_or_else(|| malformed("test target entry is not an object"))?;
    let name = object
      .get("name")
      .and_then(Value::as_str)
      .ok_or_else(|| malformed("test target entry has no name"))?
      .to_string();

    let enabled = names.contains(&name);
    object.insert("enabled".to_string(), Value::Bool(enabled));

    if enabled {
      update.enabled.push(name);
    } else {
      update.disabled.push(name);
    }
  }

  update.enabled.sort();
  update.disabled.sort();
  Ok(update)
}

/// Resolve which plan to rewrite: explicit flag, then config, then the
/// workspace candidate.
pub fn resolve_plan_path(
  flag: Option<PathBuf>,
  configured: Option<PathBuf>,
  candidate: Option<PathBuf>,
) -> SelectiveResult<PathBuf> {
  flag
    .or(configured)
    .or(candidate)
    .ok_or(SelectiveError::Plan(PlanError::NotFound))
}
