//! Test-plan command
//!
//! Computes the affected set, resolves which plan file to rewrite, and
//! flips the `enabled` flags so that exactly the affected entries run.

use crate::commands::{changed_files, display_relative, dump_workspace};
use crate::core::context::WorkspaceContext;
use crate::core::error::SelectiveResult;
use crate::testplan::{self, TestPlanUpdate};
use std::path::PathBuf;

pub fn run_test_plan(
  ctx: &WorkspaceContext,
  base_branch: Option<&str>,
  test_plan: Option<PathBuf>,
  dry_run: bool,
  verbose: bool,
) -> SelectiveResult<()> {
  let changed = changed_files(ctx, base_branch)?;
  let analysis = ctx.workspace.analyze(&changed);

  if verbose {
    dump_workspace(ctx);
  }

  let plan_path = testplan::resolve_plan_path(
    test_plan,
    ctx.configured_test_plan(),
    ctx.workspace.candidate_test_plan.clone(),
  )?;

  let update = if dry_run {
    let names = analysis.affected.iter().map(|t| t.name().to_string()).collect();
    let mut plan = testplan::read_test_plan(&plan_path)?;
    testplan::apply_affected(&mut plan, &names, &plan_path)?
  } else {
    testplan::update_test_plan(&plan_path, &analysis.affected)?
  };

  let action = if dry_run { "Would update" } else { "Updated" };
  println!("{} {}", action, display_relative(&plan_path, ctx.workspace_root()));
  display_update(&update);

  Ok(())
}

fn display_update(update: &TestPlanUpdate) {
  println!("  Enabled ({}):", update.enabled.len());
  for name in &update.enabled {
    println!("    {}", name);
  }
  println!("  Disabled ({}):", update.disabled.len());
  for name in &update.disabled {
    println!("    {}", name);
  }
}
