//! Error types with contextual help messages
//!
//! Hand-rolled enum rather than a blanket error crate: every failure the
//! tool can hit is known, and most deserve a specific hint about how to
//! recover. The graph core itself never produces errors; unknown targets
//! degrade to empty query results.

use std::fmt;
use std::path::PathBuf;

pub type SelectiveResult<T> = Result<T, SelectiveError>;

/// Top-level error type for all cargo-selective operations.
#[derive(Debug)]
pub enum SelectiveError {
  Git(GitError),
  Config(ConfigError),
  Plan(PlanError),
  Message { message: String, help: Option<String> },
}

/// Errors from the system-git changeset provider.
#[derive(Debug)]
pub enum GitError {
  RepoNotFound {
    path: PathBuf,
  },
  CommandFailed {
    command: String,
    stderr: String,
  },
  /// A base branch was given but the current branch cannot be determined
  /// (detached HEAD or an empty repository).
  MissingBranchContext,
}

/// Errors from configuration loading.
#[derive(Debug)]
pub enum ConfigError {
  NotFound { workspace_root: PathBuf },
  Invalid { path: PathBuf, reason: String },
}

/// Errors from the test-plan writer.
#[derive(Debug)]
pub enum PlanError {
  NotFound,
  Malformed { path: PathBuf, reason: String },
}

impl SelectiveError {
  pub fn message(message: impl Into<String>) -> Self {
    Self::Message {
      message: message.into(),
      help: None,
    }
  }

  pub fn with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
    Self::Message {
      message: message.into(),
      help: Some(help.into()),
    }
  }

  /// Recovery hint shown below the error message, when one exists.
  pub fn help(&self) -> Option<String> {
    match self {
      Self::Message { help, .. } => help.clone(),
      Self::Git(GitError::MissingBranchContext) => {
        Some("Check out a branch, or omit --base-branch to analyze local changes".to_string())
      }
      Self::Config(ConfigError::NotFound { .. }) => {
        Some("Create a selective.toml at the workspace root (all fields are optional)".to_string())
      }
      Self::Plan(PlanError::NotFound) => {
        Some("Pass --test-plan, set test_plan in selective.toml, or add a *.testplan.json at the root".to_string())
      }
      _ => None,
    }
  }

  pub fn exit_code(&self) -> ExitCode {
    match self {
      Self::Git(_) => ExitCode::Git,
      Self::Config(_) => ExitCode::Config,
      Self::Plan(_) | Self::Message { .. } => ExitCode::Failure,
    }
  }
}

/// Process exit codes, grouped by error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  Failure = 1,
  Config = 2,
  Git = 3,
}

impl ExitCode {
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

impl fmt::Display for SelectiveError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Git(e) => write!(f, "{}", e),
      Self::Config(e) => write!(f, "{}", e),
      Self::Plan(e) => write!(f, "{}", e),
      Self::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::RepoNotFound { path } => write!(f, "Not a git repository: {}", path.display()),
      Self::CommandFailed { command, stderr } => write!(f, "Git command failed: {}\n{}", command, stderr.trim_end()),
      Self::MissingBranchContext => write!(f, "Cannot determine the current branch"),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotFound { workspace_root } => {
        write!(f, "No selective.toml found under {}", workspace_root.display())
      }
      Self::Invalid { path, reason } => write!(f, "Invalid config {}: {}", path.display(), reason),
    }
  }
}

impl fmt::Display for PlanError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotFound => write!(f, "No test plan given and none found in the workspace"),
      Self::Malformed { path, reason } => write!(f, "Malformed test plan {}: {}", path.display(), reason),
    }
  }
}

impl std::error::Error for SelectiveError {}

impl From<GitError> for SelectiveError {
  fn from(e: GitError) -> Self {
    Self::Git(e)
  }
}

impl From<ConfigError> for SelectiveError {
  fn from(e: ConfigError) -> Self {
    Self::Config(e)
  }
}

impl From<PlanError> for SelectiveError {
  fn from(e: PlanError) -> Self {
    Self::Plan(e)
  }
}

/// Print an error (and its recovery hint) to stderr.
pub fn print_error(err: &SelectiveError) {
  eprintln!("Error: {}", err);
  if let Some(help) = err.help() {
    eprintln!("Help: {}", help);
  }
}

/// Attach context to foreign errors, mirroring the anyhow-style API
/// without pulling anyhow into the non-test tree.
pub trait ResultExt<T> {
  fn context(self, msg: &str) -> SelectiveResult<T>;
  fn with_context<F>(self, f: F) -> SelectiveResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E: fmt::Display> ResultExt<T> for Result<T, E> {
  fn context(self, msg: &str) -> SelectiveResult<T> {
    self.map_err(|e| SelectiveError::message(format!("{}: {}", msg, e)))
  }

  fn with_context<F>(self, f: F) -> SelectiveResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| SelectiveError::message(format!("{}: {}", f(), e)))
  }
}
