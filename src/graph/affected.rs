//! Affected-target engine
//!
//! Given a set of changed files, determine:
//! - Which targets directly own those files (exact file match first, then
//!   longest-prefix folder match)
//! - Which targets transitively depend on the directly-touched targets
//!
//! Changed files that no target owns are silently ignored; documentation
//! and CI files routinely change without belonging to any target.

use super::dependency_graph::DependencyGraph;
use super::target::TargetIdentity;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// File and folder ownership produced by the workspace index.
#[derive(Debug, Clone, Default)]
pub struct FileOwnership {
  /// target → files it enumerates
  pub files: HashMap<TargetIdentity, HashSet<PathBuf>>,

  /// folder → owning target, for files under a target's directory that are
  /// not individually enumerated
  pub folders: HashMap<PathBuf, TargetIdentity>,
}

impl FileOwnership {
  /// Union of two ownership mappings. File sets are merged key-wise; on a
  /// folder claimed by both sources the right-hand side wins.
  pub fn merge(mut self, other: FileOwnership) -> FileOwnership {
    for (target, files) in other.files {
      self.files.entry(target).or_default().extend(files);
    }
    self.folders.extend(other.folders);
    self
  }
}

/// Result of an affected-target computation.
#[derive(Debug, Clone)]
pub struct AffectedAnalysis {
  /// Files that changed
  pub changed_files: Vec<PathBuf>,

  /// Targets directly owning changed files (the seed set)
  pub direct: HashSet<TargetIdentity>,

  /// Reverse-dependency closure of the seed set, seeds included
  pub affected: HashSet<TargetIdentity>,
}

impl AffectedAnalysis {
  pub fn is_empty(&self) -> bool {
    self.affected.is_empty()
  }
}

/// Map changed files to seed targets and close over reverse dependencies.
pub fn analyze(changed_files: &HashSet<PathBuf>, graph: &DependencyGraph, ownership: &FileOwnership) -> AffectedAnalysis {
  let mut changed: Vec<PathBuf> = changed_files.iter().cloned().collect();
  changed.sort();

  // Exact-match index: file → owning target
  let file_index: HashMap<&Path, &TargetIdentity> = ownership
    .files
    .iter()
    .flat_map(|(target, files)| files.iter().map(move |f| (f.as_path(), target)))
    .collect();

  let mut direct: HashSet<TargetIdentity> = HashSet::new();
  for file in changed_files {
    if let Some(target) = file_index.get(file.as_path()) {
      direct.insert((*target).clone());
    } else if let Some(target) = folder_owner(&ownership.folders, file) {
      direct.insert(target.clone());
    }
    // No owner: the file lies outside any tracked target
  }

  let affected = closure(&direct, graph);

  AffectedAnalysis {
    changed_files: changed,
    direct,
    affected,
  }
}

/// Convenience wrapper returning just the affected set.
pub fn affected_targets(
  changed_files: &HashSet<PathBuf>,
  graph: &DependencyGraph,
  ownership: &FileOwnership,
) -> HashSet<TargetIdentity> {
  analyze(changed_files, graph, ownership).affected
}

/// Longest-prefix folder match. Two distinct folders of equal depth cannot
/// both prefix the same file, so the winner is unique.
fn folder_owner<'a>(folders: &'a HashMap<PathBuf, TargetIdentity>, file: &Path) -> Option<&'a TargetIdentity> {
  folders
    .iter()
    .filter(|(folder, _)| file.starts_with(folder))
    .max_by_key(|(folder, _)| folder.components().count())
    .map(|(_, target)| target)
}

/// Fixed point of `affected_direct` starting from `seeds`, BFS over the
/// reverse graph. Visited-set membership is checked before expansion, so a
/// self-dependency in the source data cannot loop.
pub fn closure(seeds: &HashSet<TargetIdentity>, graph: &DependencyGraph) -> HashSet<TargetIdentity> {
  let mut result = seeds.clone();
  let mut frontier: VecDeque<TargetIdentity> = seeds.iter().cloned().collect();

  while let Some(target) = frontier.pop_front() {
    for dependent in graph.affected_direct(&target) {
      if result.insert(dependent.clone()) {
        frontier.push_back(dependent);
      }
    }
  }

  result
}
