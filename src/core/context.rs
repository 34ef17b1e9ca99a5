//! Unified workspace context - build once, pass everywhere
//!
//! The context resolves the workspace root (flag, then config, then the
//! invocation directory), loads the optional config, and parses the full
//! workspace index a single time in main. Commands receive it by reference
//! and stay free of ambient state: no command reads the current directory
//! or re-parses the workspace on its own.

use crate::core::config::SelectiveConfig;
use crate::core::error::{ConfigError, SelectiveError, SelectiveResult};
use crate::workspace::{self, WorkspaceInfo};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared workspace-level data for all commands.
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
  /// Workspace root directory (absolute path)
  pub root: PathBuf,

  /// Configuration (selective.toml), when one exists
  pub config: Option<Arc<SelectiveConfig>>,

  /// Parsed workspace index (graph + ownership + candidate test plan)
  pub workspace: Arc<WorkspaceInfo>,
}

impl WorkspaceContext {
  /// Build the context from the invocation directory and an optional
  /// `--base-path` override.
  pub fn build(invocation_dir: &Path, base_path: Option<PathBuf>) -> SelectiveResult<Self> {
    // A missing config means defaults; a malformed one is an error, since
    // silently dropping exclude/extra/test_plan would skew the results
    let config = match SelectiveConfig::load(invocation_dir) {
      Ok(config) => Some(Arc::new(config)),
      Err(SelectiveError::Config(ConfigError::NotFound { .. })) => None,
      Err(e) => return Err(e),
    };

    let root = base_path
      .or_else(|| config.as_ref().and_then(|c| c.base_path.clone()))
      .map(|p| absolute(invocation_dir, p))
      .unwrap_or_else(|| invocation_dir.to_path_buf());

    let exclude = config.as_ref().map(|c| c.exclude.clone()).unwrap_or_default();
    let extra = config.as_ref().and_then(|c| c.extra.clone());

    let workspace = Arc::new(workspace::parse_workspace(&root, extra.as_ref(), &exclude)?);

    Ok(Self { root, config, workspace })
  }

  pub fn workspace_root(&self) -> &Path {
    &self.root
  }

  /// Test plan configured in selective.toml, resolved against the root.
  pub fn configured_test_plan(&self) -> Option<PathBuf> {
    self
      .config
      .as_ref()
      .and_then(|c| c.test_plan.clone())
      .map(|p| absolute(&self.root, p))
  }
}

fn absolute(base: &Path, path: PathBuf) -> PathBuf {
  if path.is_absolute() { path } else { base.join(path) }
}
