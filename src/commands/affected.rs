//! Affected-targets command
//!
//! Computes the changeset, maps it onto owning targets, and prints the
//! transitive closure of dependents in the requested format.

use crate::commands::{changed_files, display_relative, dump_workspace};
use crate::core::context::WorkspaceContext;
use crate::core::error::{SelectiveError, SelectiveResult};
use crate::graph::AffectedAnalysis;
use crate::graph::target::TargetIdentity;
use serde::Serialize;
use std::collections::HashSet;

/// Output format for affected-target listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  Text,
  Json,
  NamesOnly,
}

impl OutputFormat {
  pub fn from_str(s: &str) -> SelectiveResult<Self> {
    match s {
      "text" => Ok(Self::Text),
      "json" => Ok(Self::Json),
      "names-only" => Ok(Self::NamesOnly),
      other => Err(SelectiveError::with_help(
        format!("Unknown output format: {}", other),
        "Valid formats: text, json, names-only",
      )),
    }
  }
}

/// JSON record for one affected target.
#[derive(Serialize)]
struct TargetRecord {
  name: String,
  #[serde(rename = "type")]
  kind: String,
  path: String,
}

pub fn run_affected(
  ctx: &WorkspaceContext,
  base_branch: Option<&str>,
  format: &str,
  verbose: bool,
) -> SelectiveResult<()> {
  let format = OutputFormat::from_str(format)?;

  let changed = changed_files(ctx, base_branch)?;
  let analysis = ctx.workspace.analyze(&changed);

  if verbose {
    dump_workspace(ctx);
    println!("Changed files:");
    let mut files: Vec<_> = changed.iter().collect();
    files.sort();
    for file in files {
      println!("  {}", display_relative(file, ctx.workspace_root()));
    }
  }

  match format {
    OutputFormat::Text => display_text(ctx, &analysis),
    OutputFormat::Json => display_json(&analysis)?,
    OutputFormat::NamesOnly => display_names_only(&analysis),
  }

  Ok(())
}

fn sorted(targets: &HashSet<TargetIdentity>) -> Vec<&TargetIdentity> {
  let mut list: Vec<_> = targets.iter().collect();
  list.sort();
  list
}

fn display_text(ctx: &WorkspaceContext, analysis: &AffectedAnalysis) {
  if analysis.is_empty() {
    println!("No affected targets.");
    return;
  }

  println!("Changed files: {}", analysis.changed_files.len());
  println!();

  println!("📦 Directly affected ({}):", analysis.direct.len());
  for target in sorted(&analysis.direct) {
    println!("  {} ({})", target.name(), target.kind());
  }
  println!();

  println!("🎯 Affected including dependents ({}):", analysis.affected.len());
  for target in sorted(&analysis.affected) {
    println!(
      "  {} ({} at {})",
      target.name(),
      target.kind(),
      display_relative(target.path(), ctx.workspace_root())
    );
  }
}

fn display_json(analysis: &AffectedAnalysis) -> SelectiveResult<()> {
  let records: Vec<TargetRecord> = sorted(&analysis.affected)
    .into_iter()
    .map(|target| TargetRecord {
      name: target.name().to_string(),
      kind: target.kind().to_string(),
      path: target.path().display().to_string(),
    })
    .collect();

  match serde_json::to_string_pretty(&records) {
    Ok(json) => {
      println!("{}", json);
      Ok(())
    }
    Err(e) => Err(SelectiveError::message(format!("Failed to serialize affected targets: {}", e))),
  }
}

fn display_names_only(analysis: &AffectedAnalysis) {
  for target in sorted(&analysis.affected) {
    println!("{}", target.name());
  }
}
