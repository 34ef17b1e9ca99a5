//! System git backend - zero dependencies
//!
//! Uses git plumbing commands with a safe, isolated subprocess environment.
//! The only consumer is the changeset provider: map a base branch (or the
//! local working tree) to the set of changed file paths.

use crate::core::error::{GitError, ResultExt, SelectiveError, SelectiveResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,

  /// Working tree root
  work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> SelectiveResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(SelectiveError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(SelectiveError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Get current branch name. Empty output means detached HEAD.
  pub fn current_branch(&self) -> SelectiveResult<String> {
    let output = self
      .git_cmd()
      .args(["branch", "--show-current"])
      .output()
      .context("Failed to get current branch")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(SelectiveError::Git(GitError::CommandFailed {
        command: "git branch --show-current".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Files changed between `base_branch` and the current branch, as
  /// absolute paths.
  ///
  /// Fails with [`GitError::MissingBranchContext`] when the current branch
  /// cannot be determined (detached HEAD), since the diff endpoints would
  /// be meaningless.
  pub fn changeset(&self, base_branch: &str) -> SelectiveResult<HashSet<PathBuf>> {
    let current_branch = self.current_branch()?;
    if current_branch.is_empty() {
      return Err(SelectiveError::Git(GitError::MissingBranchContext));
    }

    let range = format!("{}..{}", base_branch, current_branch);
    let output = self
      .git_cmd()
      .args(["diff", &range, "--name-only"])
      .output()
      .context("Failed to diff against base branch")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(SelectiveError::Git(GitError::CommandFailed {
        command: format!("git diff {} --name-only", range),
        stderr: stderr.to_string(),
      }));
    }

    Ok(self.absolute_paths(parse_name_only(&output.stdout)))
  }

  /// Uncommitted changes in the working tree: files modified against HEAD
  /// plus untracked files. Used when no base branch is given.
  pub fn local_changeset(&self) -> SelectiveResult<HashSet<PathBuf>> {
    let diff = self
      .git_cmd()
      .args(["diff", "HEAD", "--name-only"])
      .output()
      .context("Failed to diff working tree")?;

    if !diff.status.success() {
      let stderr = String::from_utf8_lossy(&diff.stderr);
      return Err(SelectiveError::Git(GitError::CommandFailed {
        command: "git diff HEAD --name-only".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    let untracked = self
      .git_cmd()
      .args(["ls-files", "--others", "--exclude-standard"])
      .output()
      .context("Failed to list untracked files")?;

    if !untracked.status.success() {
      let stderr = String::from_utf8_lossy(&untracked.stderr);
      return Err(SelectiveError::Git(GitError::CommandFailed {
        command: "git ls-files --others --exclude-standard".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    let mut files = parse_name_only(&diff.stdout);
    files.extend(parse_name_only(&untracked.stdout));
    Ok(self.absolute_paths(files))
  }

  fn absolute_paths(&self, files: Vec<PathBuf>) -> HashSet<PathBuf> {
    files.into_iter().map(|f| self.work_tree.join(f)).collect()
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

/// Parse `--name-only` style output into repo-relative paths.
fn parse_name_only(stdout: &[u8]) -> Vec<PathBuf> {
  String::from_utf8_lossy(stdout)
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(PathBuf::from)
    .collect()
}
