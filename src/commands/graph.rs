//! Graph command
//!
//! Prints the workspace dependency graph in DOT format, optionally
//! highlighting the targets affected by the current changeset.

use crate::commands::changed_files;
use crate::core::context::WorkspaceContext;
use crate::core::error::SelectiveResult;
use crate::graph::visualize;
use std::collections::HashSet;

pub fn run_graph(ctx: &WorkspaceContext, base_branch: Option<&str>, highlight_affected: bool) -> SelectiveResult<()> {
  let highlight = if highlight_affected {
    let changed = changed_files(ctx, base_branch)?;
    ctx.workspace.analyze(&changed).affected
  } else {
    HashSet::new()
  };

  print!("{}", visualize::to_dot(&ctx.workspace.graph, &highlight));

  Ok(())
}
