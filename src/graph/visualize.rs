//! DOT rendering of the merged dependency graph
//!
//! ```bash
//! cargo selective graph > graph.dot
//! dot -Tpng graph.dot -o graph.png
//! ```

use super::dependency_graph::DependencyGraph;
use super::target::TargetIdentity;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Export the graph to DOT format (Graphviz), highlighting targets in
/// `highlight` (typically the affected set).
pub fn to_dot(graph: &DependencyGraph, highlight: &HashSet<TargetIdentity>) -> String {
  let mut dot_graph: DiGraph<TargetIdentity, ()> = DiGraph::new();
  let mut indices: HashMap<TargetIdentity, NodeIndex> = HashMap::new();

  // Sorted insertion keeps the output deterministic
  let mut targets: Vec<TargetIdentity> = graph.all_targets().into_iter().collect();
  targets.sort();

  for target in &targets {
    let idx = dot_graph.add_node(target.clone());
    indices.insert(target.clone(), idx);
  }

  for target in &targets {
    let mut deps: Vec<TargetIdentity> = graph.dependencies(target).into_iter().collect();
    deps.sort();
    for dep in deps {
      dot_graph.add_edge(indices[target], indices[&dep], ());
    }
  }

  let edge_attrs = |_: &DiGraph<TargetIdentity, ()>, _: petgraph::graph::EdgeReference<'_, ()>| String::new();
  let node_attrs = |_: &DiGraph<TargetIdentity, ()>, (_idx, target): (NodeIndex, &TargetIdentity)| {
    if highlight.contains(target) {
      format!("label=\"{}\" shape=box style=filled fillcolor=lightblue", target.name())
    } else {
      format!("label=\"{}\" shape=box", target.name())
    }
  };

  let dot = Dot::with_attr_getters(
    &dot_graph,
    &[Config::EdgeNoLabel, Config::NodeNoLabel],
    &edge_attrs,
    &node_attrs,
  );

  format!("{:?}", dot)
}
