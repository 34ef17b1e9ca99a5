//! Core plumbing for cargo-selective
//!
//! - **config**: selective.toml parsing and search
//! - **context**: unified workspace context shared across commands
//! - **error**: error types with contextual help messages
//! - **vcs**: git operations abstraction (SystemGit changeset provider)

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
