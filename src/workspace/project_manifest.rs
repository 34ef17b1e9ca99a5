//! Standalone project manifests
//!
//! `Project.toml` files describe targets cargo does not know about: doc
//! generators, asset pipelines, acceptance suites. Each manifest declares
//! targets with owned files/folders and by-name dependencies:
//!
//! ```toml
//! [[targets]]
//! name = "acceptance"
//! files = ["run.sh"]
//! folders = ["scenarios"]
//! depends-on = ["core", "cli"]
//! ```
//!
//! Paths are relative to the manifest's directory. Dependency names are
//! resolved against the global target name index after all sources have
//! been scanned; unresolved names are ignored, since partial dependency
//! data is expected.

use super::{WorkspaceInfo, is_excluded};
use crate::core::error::{ResultExt, SelectiveResult};
use crate::graph::affected::FileOwnership;
use crate::graph::dependency_graph::{AdjacencyMap, DependencyGraph};
use crate::graph::target::TargetIdentity;
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const PROJECT_MANIFEST_NAME: &str = "Project.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectManifestDoc {
  #[serde(default)]
  pub targets: Vec<ProjectTargetDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectTargetDoc {
  pub name: String,
  #[serde(default)]
  pub files: Vec<PathBuf>,
  #[serde(default)]
  pub folders: Vec<PathBuf>,
  #[serde(default, rename = "depends-on")]
  pub depends_on: Vec<String>,
}

/// A parsed project manifest with its location.
#[derive(Debug, Clone)]
pub struct ProjectManifest {
  /// The manifest file itself
  pub path: PathBuf,
  /// Directory owned paths are relative to
  pub dir: PathBuf,
  pub doc: ProjectManifestDoc,
}

/// Find and parse every `Project.toml` under `root`. Manifests are
/// independent, so parsing is parallel.
pub fn discover(root: &Path, exclude: &[String]) -> SelectiveResult<Vec<ProjectManifest>> {
  let mut paths = Vec::new();
  collect_manifests(root, root, exclude, &mut paths)?;
  paths.sort();

  paths.par_iter().map(|path| load(path)).collect()
}

fn collect_manifests(root: &Path, dir: &Path, exclude: &[String], out: &mut Vec<PathBuf>) -> SelectiveResult<()> {
  let entries = fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;

  for entry in entries {
    let entry = entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
    let path = entry.path();
    let name = entry.file_name().to_string_lossy().to_string();

    if path.is_dir() {
      // Hidden directories and build output never hold project manifests
      if name.starts_with('.') || name == "target" || is_excluded(root, &path, exclude) {
        continue;
      }
      collect_manifests(root, &path, exclude, out)?;
    } else if name == PROJECT_MANIFEST_NAME {
      out.push(path);
    }
  }

  Ok(())
}

pub fn load(path: &Path) -> SelectiveResult<ProjectManifest> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let doc: ProjectManifestDoc =
    toml_edit::de::from_str(&content).with_context(|| format!("Failed to parse project manifest {}", path.display()))?;

  let dir = path.parent().map(|p| p.to_path_buf()).unwrap_or_default();

  Ok(ProjectManifest {
    path: path.to_path_buf(),
    dir,
    doc,
  })
}

/// Partial index for one project manifest. Every declared target becomes a
/// `Project` identity; the manifest file itself belongs to each of them, so
/// editing the manifest re-tests its targets.
pub fn manifest_info(manifest: &ProjectManifest, name_index: &HashMap<String, TargetIdentity>) -> WorkspaceInfo {
  let mut map = AdjacencyMap::new();
  let mut ownership = FileOwnership::default();

  for target in &manifest.doc.targets {
    let id = TargetIdentity::project(manifest.path.clone(), target.name.clone());

    let deps: HashSet<TargetIdentity> = target
      .depends_on
      .iter()
      .filter_map(|name| name_index.get(name).cloned())
      .collect();
    map.insert(id.clone(), deps);

    let files = ownership.files.entry(id.clone()).or_default();
    files.insert(manifest.path.clone());
    for file in &target.files {
      files.insert(manifest.dir.join(file));
    }
    for folder in &target.folders {
      ownership.folders.insert(manifest.dir.join(folder), id.clone());
    }
  }

  WorkspaceInfo {
    graph: DependencyGraph::new(map),
    ownership,
    candidate_test_plan: None,
  }
}
