//! Target-dependency graph and affected-target computation
//!
//! The only part of the tool with a non-trivial algorithm; everything else
//! is I/O glue around these types. Graphs are built once per data source,
//! merged, then queried read-only.

pub mod affected;
pub mod dependency_graph;
pub mod target;
pub mod visualize;

pub use affected::AffectedAnalysis;
