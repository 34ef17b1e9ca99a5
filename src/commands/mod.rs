//! CLI commands for cargo-selective
//!
//! - **affected**: show which targets are affected by changes
//! - **testplan**: rewrite a test plan so only affected entries run
//! - **graph**: render the dependency graph in DOT format
//!
//! All commands accept `&WorkspaceContext` to avoid redundant workspace
//! loads, and all of them share the same changeset provider: diff against
//! a base branch when one is given, local uncommitted changes otherwise.

pub mod affected;
pub mod graph;
pub mod testplan;

pub use affected::run_affected;
pub use graph::run_graph;
pub use testplan::run_test_plan;

use crate::core::context::WorkspaceContext;
use crate::core::error::SelectiveResult;
use crate::core::vcs::SystemGit;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Changed files for the requested comparison, as absolute paths.
pub(crate) fn changed_files(ctx: &WorkspaceContext, base_branch: Option<&str>) -> SelectiveResult<HashSet<PathBuf>> {
  let git = SystemGit::open(ctx.workspace_root())?;

  match base_branch {
    Some(base) => git.changeset(base),
    None => git.local_changeset(),
  }
}

/// Verbose diagnostic dump of the workspace index.
pub(crate) fn dump_workspace(ctx: &WorkspaceContext) {
  let mut targets: Vec<_> = ctx.workspace.graph.all_targets().into_iter().collect();
  targets.sort();

  println!("Targets:");
  for target in &targets {
    println!("  {}", target);
  }

  println!("Files for targets:");
  let mut owners: Vec<_> = ctx.workspace.ownership.files.iter().collect();
  owners.sort_by_key(|(target, _)| (*target).clone());
  for (target, files) in owners {
    let mut files: Vec<_> = files.iter().collect();
    files.sort();
    println!("  {}:", target);
    for file in files {
      println!("    {}", display_relative(file, ctx.workspace_root()));
    }
  }

  println!("Folders for targets:");
  let mut folders: Vec<_> = ctx.workspace.ownership.folders.iter().collect();
  folders.sort();
  for (folder, target) in folders {
    println!("  {}: {}", display_relative(folder, ctx.workspace_root()), target);
  }
}

/// Render a path relative to the workspace root when possible.
pub(crate) fn display_relative(path: &Path, root: &Path) -> String {
  path.strip_prefix(root).unwrap_or(path).display().to_string()
}
