//! Target identity shared by every workspace data source

use std::fmt;
use std::path::{Path, PathBuf};

/// Identity of a named, independently buildable/testable unit.
///
/// Two targets are the same only when both the location and the name match:
/// a target called `core` in one package is not the target called `core` in
/// another. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetIdentity {
  /// Target defined inside a Cargo package rooted at `path`.
  Package { path: PathBuf, name: String },

  /// Target declared in a standalone project manifest at `project_path`.
  Project { project_path: PathBuf, name: String },
}

impl TargetIdentity {
  pub fn package(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
    Self::Package {
      path: path.into(),
      name: name.into(),
    }
  }

  pub fn project(project_path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
    Self::Project {
      project_path: project_path.into(),
      name: name.into(),
    }
  }

  /// Target name without location.
  pub fn name(&self) -> &str {
    match self {
      Self::Package { name, .. } | Self::Project { name, .. } => name,
    }
  }

  /// Location of the defining package or project manifest.
  pub fn path(&self) -> &Path {
    match self {
      Self::Package { path, .. } => path,
      Self::Project { project_path, .. } => project_path,
    }
  }

  /// Variant tag for serialized output.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Package { .. } => "package",
      Self::Project { .. } => "project",
    }
  }
}

impl fmt::Display for TargetIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Package { path, name } => write!(f, "package target {} at {}", name, path.display()),
      Self::Project { project_path, name } => write!(f, "project target {} at {}", name, project_path.display()),
    }
  }
}
