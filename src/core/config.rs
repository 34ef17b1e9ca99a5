//! Configuration for cargo-selective
//! Searched in order: selective.toml, .selective.toml, .config/selective.toml

use crate::core::error::{ConfigError, ResultExt, SelectiveError, SelectiveResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Workspace-level configuration. Every field is optional; the tool runs
/// with sensible defaults when no config file exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectiveConfig {
  /// Workspace root override (relative paths resolve against the
  /// invocation directory)
  #[serde(default)]
  pub base_path: Option<PathBuf>,

  /// Test plan document to rewrite, relative to the workspace root
  #[serde(default)]
  pub test_plan: Option<PathBuf>,

  /// Path prefixes (relative to the root) excluded from workspace scanning
  #[serde(default)]
  pub exclude: Vec<String>,

  /// Hand-maintained additions for targets the scanners cannot see
  #[serde(default)]
  pub extra: Option<ExtraConfig>,
}

/// Extra dependency edges and ownership, keyed by target name.
///
/// Names are resolved against the targets discovered by the workspace
/// scanners; entries naming unknown targets are ignored, since partial
/// dependency data is expected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraConfig {
  /// target name → names of targets it additionally depends on
  #[serde(default)]
  pub dependencies: HashMap<String, Vec<String>>,

  /// target name → extra files it owns, relative to the workspace root
  #[serde(default, rename = "target-files")]
  pub target_files: HashMap<String, Vec<PathBuf>>,

  /// target name → extra folders it owns, relative to the workspace root
  #[serde(default, rename = "target-folders")]
  pub target_folders: HashMap<String, Vec<PathBuf>>,
}

impl SelectiveConfig {
  /// Find config file in search order: selective.toml, .selective.toml,
  /// .config/selective.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("selective.toml"),
      path.join(".selective.toml"),
      path.join(".config").join("selective.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from selective.toml (searches multiple locations)
  pub fn load(path: &Path) -> SelectiveResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      SelectiveError::Config(ConfigError::NotFound {
        workspace_root: path.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: SelectiveConfig = toml_edit::de::from_str(&content).map_err(|e| {
      SelectiveError::Config(ConfigError::Invalid {
        path: config_path.clone(),
        reason: e.to_string(),
      })
    })?;

    Ok(config)
  }
}
