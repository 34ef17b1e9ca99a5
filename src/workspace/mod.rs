//! Workspace index: targets, ownership, and the merged dependency graph
//!
//! Every data source (cargo packages, standalone project manifests, config
//! extras) produces a partial [`WorkspaceInfo`]. Partials are merged into a
//! single index for the whole workspace; merge is commutative and
//! associative, so independent sources are parsed and reduced in parallel.

pub mod cargo_packages;
pub mod project_manifest;

use crate::core::config::ExtraConfig;
use crate::core::error::SelectiveResult;
use crate::graph::affected::{self, AffectedAnalysis, FileOwnership};
use crate::graph::dependency_graph::{AdjacencyMap, DependencyGraph};
use crate::graph::target::TargetIdentity;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the engine needs to know about a workspace.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceInfo {
  /// Merged dependency graph over all targets
  pub graph: DependencyGraph,

  /// File and folder ownership for seed resolution
  pub ownership: FileOwnership,

  /// Test plan found in the workspace, used when none is given explicitly
  pub candidate_test_plan: Option<PathBuf>,
}

impl WorkspaceInfo {
  pub fn empty() -> Self {
    Self::default()
  }

  /// Combine two partial indexes. Graph merge is the key-wise set union;
  /// ownership merges key-wise as well.
  pub fn merge(self, other: WorkspaceInfo) -> WorkspaceInfo {
    WorkspaceInfo {
      graph: self.graph.merge(&other.graph),
      ownership: self.ownership.merge(other.ownership),
      candidate_test_plan: self.candidate_test_plan.or(other.candidate_test_plan),
    }
  }

  /// Run the affected-target engine against this index.
  pub fn analyze(&self, changed_files: &HashSet<PathBuf>) -> AffectedAnalysis {
    affected::analyze(changed_files, &self.graph, &self.ownership)
  }
}

/// Parse the workspace at `root`, merging every data source into one index.
pub fn parse_workspace(root: &Path, extra: Option<&ExtraConfig>, exclude: &[String]) -> SelectiveResult<WorkspaceInfo> {
  let packages = cargo_packages::discover(root, exclude)?;
  let manifests = project_manifest::discover(root, exclude)?;

  // Lib target per package name, for inter-package dependency edges
  let lib_index: HashMap<String, TargetIdentity> = packages
    .iter()
    .filter_map(|pkg| {
      pkg
        .primary_target()
        .map(|t| (pkg.name.clone(), TargetIdentity::package(pkg.root.clone(), t.name.clone())))
    })
    .collect();

  // Global name index for by-name references from project manifests and
  // config extras
  let mut name_index: HashMap<String, TargetIdentity> = HashMap::new();
  for pkg in &packages {
    for t in &pkg.targets {
      name_index.insert(t.name.clone(), TargetIdentity::package(pkg.root.clone(), t.name.clone()));
    }
  }
  for m in &manifests {
    for t in &m.doc.targets {
      name_index.insert(t.name.clone(), TargetIdentity::project(m.path.clone(), t.name.clone()));
    }
  }

  let from_packages = packages
    .par_iter()
    .map(|pkg| cargo_packages::package_info(pkg, &lib_index))
    .reduce(WorkspaceInfo::empty, WorkspaceInfo::merge);

  let from_manifests = manifests
    .par_iter()
    .map(|m| project_manifest::manifest_info(m, &name_index))
    .reduce(WorkspaceInfo::empty, WorkspaceInfo::merge);

  let from_extra = extra.map(|e| extra_info(e, root, &name_index)).unwrap_or_default();

  let mut info = from_packages.merge(from_manifests).merge(from_extra);
  info.candidate_test_plan = find_candidate_test_plan(root);
  Ok(info)
}

/// Partial index from the `[extra]` config section: hand-maintained edges
/// and ownership for targets the scanners cannot see. Entries naming
/// unknown targets are skipped.
fn extra_info(extra: &ExtraConfig, root: &Path, name_index: &HashMap<String, TargetIdentity>) -> WorkspaceInfo {
  let mut map = AdjacencyMap::new();
  let mut ownership = FileOwnership::default();

  for (name, deps) in &extra.dependencies {
    let Some(target) = name_index.get(name) else { continue };
    let resolved: HashSet<TargetIdentity> = deps.iter().filter_map(|d| name_index.get(d).cloned()).collect();
    map.entry(target.clone()).or_default().extend(resolved);
  }

  for (name, files) in &extra.target_files {
    let Some(target) = name_index.get(name) else { continue };
    ownership
      .files
      .entry(target.clone())
      .or_default()
      .extend(files.iter().map(|f| root.join(f)));
  }

  for (name, folders) in &extra.target_folders {
    let Some(target) = name_index.get(name) else { continue };
    for folder in folders {
      ownership.folders.insert(root.join(folder), target.clone());
    }
  }

  WorkspaceInfo {
    graph: DependencyGraph::new(map),
    ownership,
    candidate_test_plan: None,
  }
}

/// First `*.testplan.json` at the workspace root, in name order.
fn find_candidate_test_plan(root: &Path) -> Option<PathBuf> {
  let entries = fs::read_dir(root).ok()?;

  let mut plans: Vec<PathBuf> = entries
    .flatten()
    .map(|entry| entry.path())
    .filter(|path| {
      path.is_file()
        && path
          .file_name()
          .map(|name| name.to_string_lossy().ends_with(".testplan.json"))
          .unwrap_or(false)
    })
    .collect();

  plans.sort();
  plans.into_iter().next()
}

/// Shared exclude check: a path is excluded when its root-relative form
/// starts with any configured prefix.
pub(crate) fn is_excluded(root: &Path, path: &Path, exclude: &[String]) -> bool {
  let Ok(relative) = path.strip_prefix(root) else {
    return false;
  };
  exclude.iter().any(|prefix| relative.starts_with(Path::new(prefix)))
}
