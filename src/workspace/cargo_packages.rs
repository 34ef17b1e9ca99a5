//! Cargo package data source
//!
//! A thin cargo_metadata shim converts packages into plain [`PackageSpec`]
//! values; everything downstream of that is pure and unit-testable without
//! invoking cargo.
//!
//! Target modeling:
//! - every cargo target (lib/bin/test/bench/example) is a `Package` identity
//! - non-lib targets depend on their package's lib target
//! - all targets depend on the lib targets of the package's workspace
//!   dependencies; dev-dependencies apply to test/bench/example targets only
//! - each target owns its `src_path`; the package folder and manifest belong
//!   to the lib (or first) target

use super::{WorkspaceInfo, is_excluded};
use crate::core::error::{ResultExt, SelectiveResult};
use crate::graph::affected::FileOwnership;
use crate::graph::dependency_graph::{AdjacencyMap, DependencyGraph};
use crate::graph::target::TargetIdentity;
use cargo_metadata::{DependencyKind, MetadataCommand};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A workspace package reduced to what the index needs.
#[derive(Debug, Clone)]
pub struct PackageSpec {
  pub name: String,
  pub root: PathBuf,
  pub manifest_path: PathBuf,
  pub targets: Vec<TargetSpec>,
  /// Workspace packages this package depends on (normal + build)
  pub deps: Vec<String>,
  /// Workspace packages this package dev-depends on
  pub dev_deps: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TargetSpec {
  pub name: String,
  pub kind: TargetKind,
  pub src_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
  Lib,
  Bin,
  Test,
  Bench,
  Example,
}

impl PackageSpec {
  /// The lib target when there is one, otherwise the first target. Carries
  /// the package-level ownership (folder, manifest).
  pub fn primary_target(&self) -> Option<&TargetSpec> {
    self
      .targets
      .iter()
      .find(|t| t.kind == TargetKind::Lib)
      .or_else(|| self.targets.first())
  }
}

/// Load workspace packages via cargo_metadata. A root without a Cargo.toml
/// is a project-manifest-only workspace, not an error.
pub fn discover(root: &Path, exclude: &[String]) -> SelectiveResult<Vec<PackageSpec>> {
  let manifest = root.join("Cargo.toml");
  if !manifest.exists() {
    return Ok(Vec::new());
  }

  let metadata = MetadataCommand::new()
    .manifest_path(&manifest)
    .no_deps()
    .exec()
    .with_context(|| format!("Failed to load cargo metadata from {}", root.display()))?;

  let member_names: HashSet<String> = metadata.packages.iter().map(|pkg| pkg.name.as_ref().to_string()).collect();

  let specs = metadata
    .packages
    .iter()
    .map(|pkg| to_spec(pkg, &member_names))
    .filter(|spec| !is_excluded(root, &spec.root, exclude))
    .collect();

  Ok(specs)
}

fn to_spec(pkg: &cargo_metadata::Package, members: &HashSet<String>) -> PackageSpec {
  let manifest_path = pkg.manifest_path.clone().into_std_path_buf();
  let root = manifest_path
    .parent()
    .map(|p| p.to_path_buf())
    .unwrap_or_else(|| manifest_path.clone());

  let targets = pkg
    .targets
    .iter()
    .filter_map(|t| {
      map_kind(&t.kind).map(|kind| TargetSpec {
        name: t.name.clone(),
        kind,
        src_path: t.src_path.clone().into_std_path_buf(),
      })
    })
    .collect();

  let mut deps = Vec::new();
  let mut dev_deps = Vec::new();
  for dep in &pkg.dependencies {
    if !members.contains(&dep.name) {
      continue;
    }
    match dep.kind {
      DependencyKind::Normal | DependencyKind::Build => deps.push(dep.name.clone()),
      DependencyKind::Development => dev_deps.push(dep.name.clone()),
      _ => {}
    }
  }

  PackageSpec {
    name: pkg.name.as_ref().to_string(),
    root,
    manifest_path,
    targets,
    deps,
    dev_deps,
  }
}

fn map_kind(kinds: &[cargo_metadata::TargetKind]) -> Option<TargetKind> {
  use cargo_metadata::TargetKind as K;

  kinds.iter().find_map(|kind| match kind {
    K::Lib | K::RLib | K::DyLib | K::CDyLib | K::StaticLib | K::ProcMacro => Some(TargetKind::Lib),
    K::Bin => Some(TargetKind::Bin),
    K::Test => Some(TargetKind::Test),
    K::Bench => Some(TargetKind::Bench),
    K::Example => Some(TargetKind::Example),
    _ => None,
  })
}

/// Partial index for one package. `lib_index` maps workspace package names
/// to their lib target identities; unknown names are skipped, since targets
/// defined outside the scanned roots are expected.
pub fn package_info(spec: &PackageSpec, lib_index: &HashMap<String, TargetIdentity>) -> WorkspaceInfo {
  let identity = |t: &TargetSpec| TargetIdentity::package(spec.root.clone(), t.name.clone());
  let primary = spec.primary_target().map(&identity);

  let mut map = AdjacencyMap::new();
  let mut ownership = FileOwnership::default();

  for target in &spec.targets {
    let id = identity(target);

    let mut deps: HashSet<TargetIdentity> = HashSet::new();
    if let Some(primary) = &primary
      && *primary != id
    {
      deps.insert(primary.clone());
    }
    for dep in &spec.deps {
      if let Some(lib) = lib_index.get(dep) {
        deps.insert(lib.clone());
      }
    }
    if matches!(target.kind, TargetKind::Test | TargetKind::Bench | TargetKind::Example) {
      for dep in &spec.dev_deps {
        if let Some(lib) = lib_index.get(dep) {
          deps.insert(lib.clone());
        }
      }
    }

    map.insert(id.clone(), deps);
    ownership.files.entry(id).or_default().insert(target.src_path.clone());
  }

  if let Some(primary) = primary {
    ownership.folders.insert(spec.root.clone(), primary.clone());
    ownership
      .files
      .entry(primary)
      .or_default()
      .insert(spec.manifest_path.clone());
  }

  WorkspaceInfo {
    graph: DependencyGraph::new(map),
    ownership,
    candidate_test_plan: None,
  }
}
