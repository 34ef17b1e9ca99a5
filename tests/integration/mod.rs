//! Integration tests for cargo-selective
//!
//! Each test builds a throwaway git workspace with real crates, runs the
//! compiled binary against it, and asserts on the output.

mod helpers;

mod test_affected;
mod test_graph;
mod test_testplan;
