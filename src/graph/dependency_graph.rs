//! Target-level dependency graph with a precomputed reverse index
//!
//! The graph holds two mappings: `depends_on` (primary) and `affects`
//! (derived). `affects` is always the structural inverse of `depends_on`;
//! it is recomputed whenever a graph is constructed or merged, never
//! mutated independently. Each graph instance is immutable after
//! construction, so partial graphs from independent data sources can be
//! built in parallel and combined in any order.

use super::target::TargetIdentity;
use std::collections::{HashMap, HashSet};

pub type AdjacencyMap = HashMap<TargetIdentity, HashSet<TargetIdentity>>;

/// Directed dependency graph over [`TargetIdentity`].
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
  /// target → targets it directly depends on
  depends_on: AdjacencyMap,

  /// target → targets that directly depend on it (inverse of `depends_on`)
  affects: AdjacencyMap,
}

impl PartialEq for DependencyGraph {
  fn eq(&self, other: &Self) -> bool {
    // `affects` is derived, so key→set content of `depends_on` is the
    // whole identity of a graph. Absent keys and empty sets compare equal.
    normalized(&self.depends_on) == normalized(&other.depends_on)
  }
}

impl Eq for DependencyGraph {}

fn normalized(map: &AdjacencyMap) -> HashMap<&TargetIdentity, &HashSet<TargetIdentity>> {
  map.iter().filter(|(_, deps)| !deps.is_empty()).collect()
}

fn invert(map: &AdjacencyMap) -> AdjacencyMap {
  let mut inverted: AdjacencyMap = HashMap::new();
  for (target, deps) in map {
    for dep in deps {
      inverted.entry(dep.clone()).or_default().insert(target.clone());
    }
  }
  inverted
}

impl DependencyGraph {
  /// Build a graph from a dependency map, inverting it up front so that
  /// reverse queries are plain lookups afterwards.
  pub fn new(depends_on: AdjacencyMap) -> Self {
    let affects = invert(&depends_on);
    Self { depends_on, affects }
  }

  pub fn empty() -> Self {
    Self::default()
  }

  /// Direct dependencies of `target`. Unknown targets have none; partial
  /// dependency data is expected, so this never fails.
  pub fn dependencies(&self, target: &TargetIdentity) -> HashSet<TargetIdentity> {
    self.depends_on.get(target).cloned().unwrap_or_default()
  }

  /// Targets that directly depend on `target`. Never fails.
  pub fn affected_direct(&self, target: &TargetIdentity) -> HashSet<TargetIdentity> {
    self.affects.get(target).cloned().unwrap_or_default()
  }

  /// Combine two graphs into a new one. For every target present in either
  /// input the merged dependency set is the union of both inputs' sets,
  /// absent entries treated as empty. Commutative and associative, so
  /// partial graphs can be reduced in any order. Neither input is mutated.
  pub fn merge(&self, other: &DependencyGraph) -> DependencyGraph {
    let mut merged = self.depends_on.clone();

    for (target, deps) in &other.depends_on {
      merged.entry(target.clone()).or_default().extend(deps.iter().cloned());
    }

    DependencyGraph::new(merged)
  }

  /// Complete vertex set: every key of `depends_on` plus every target that
  /// only appears inside an adjacency set.
  pub fn all_targets(&self) -> HashSet<TargetIdentity> {
    let mut targets: HashSet<TargetIdentity> = self.depends_on.keys().cloned().collect();
    for deps in self.depends_on.values() {
      targets.extend(deps.iter().cloned());
    }
    targets
  }
}
