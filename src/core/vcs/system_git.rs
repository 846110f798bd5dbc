//! System git backend
//!
//! Uses git plumbing commands for all operations:
//! - One subprocess per question (rev-parse, for-each-ref, fetch)
//! - Safe subprocess execution (isolated environment)
//! - The cache clone is created on first use and reused afterwards

use crate::core::error::{GitError, IndexError, IndexResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Remote name used for the cache clone
pub const REMOTE_NAME: &str = "origin";

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,
}

impl SystemGit {
  /// Open an existing git repository
  pub fn open(path: &Path) -> IndexResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") || stderr.contains("cannot change to") {
        return Err(IndexError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(IndexError::message(format!("Failed to open git repository: {}", stderr)));
    }

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Open the cache clone at `path`, cloning `remote` into it first if needed
  ///
  /// An existing directory that is not a git repository is never overwritten.
  pub fn open_or_clone(path: &Path, remote: Option<&str>, main_branch: &str) -> IndexResult<Self> {
    if path.join(".git").exists() {
      tracing::debug!(path = %path.display(), "reusing repository cache");
      return Self::open(path);
    }

    let Some(remote) = remote else {
      return Err(IndexError::Git(GitError::RepoNotFound {
        path: path.to_path_buf(),
      }));
    };

    if path.exists() && path.read_dir()?.next().is_some() {
      return Err(IndexError::with_help(
        format!("Repository cache path {} exists and is not a git clone", path.display()),
        "Remove the directory or point --repo-path somewhere else",
      ));
    }

    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create cache directory {}", parent.display()))?;
    }

    eprintln!("   Cloning {} into {}...", remote, path.display());
    tracing::info!(remote, path = %path.display(), branch = main_branch, "cloning repository cache");

    let output = isolated_git()
      .args(["clone", "--origin", REMOTE_NAME, "--branch", main_branch, "--no-checkout"])
      .arg(remote)
      .arg(path)
      .output()
      .context("Failed to run git clone")?;

    if !output.status.success() {
      return Err(IndexError::Git(GitError::CloneFailed {
        remote: remote.to_string(),
        path: path.to_path_buf(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Self::open(path)
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = isolated_git();
    cmd.arg("-C").arg(&self.repo_path);
    cmd
  }
}

/// Variables git still needs after the environment is cleared (SSH agent and proxies included)
const FORWARDED_ENV: &[&str] = &[
  "PATH",
  "HOME",
  "SSH_AUTH_SOCK",
  "GIT_SSH_COMMAND",
  "HTTPS_PROXY",
  "https_proxy",
  "HTTP_PROXY",
  "http_proxy",
  "NO_PROXY",
  "no_proxy",
];

/// The subset of [`FORWARDED_ENV`] that is set, according to `lookup`
fn forwarded_env(lookup: impl Fn(&str) -> Option<String>) -> Vec<(&'static str, String)> {
  FORWARDED_ENV
    .iter()
    .filter_map(|&key| lookup(key).map(|value| (key, value)))
    .collect()
}

/// `git` with a cleared environment and safe config overrides
fn isolated_git() -> Command {
  let mut cmd = Command::new("git");

  // Isolated environment (don't trust global config)
  cmd.env_clear();
  cmd.envs(forwarded_env(|key| std::env::var(key).ok()));
  cmd.env("GIT_TERMINAL_PROMPT", "0");

  // Force safe behavior (override user config)
  cmd.arg("-c").arg("protocol.version=2");
  cmd.arg("-c").arg("advice.detachedHead=false");
  cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

  cmd
}
