//! Repository operations for SystemGit (fetch, branch sync, ref resolution)

use super::system_git::{REMOTE_NAME, SystemGit};
use super::{Commit, RepositoryAccessor};
use crate::core::error::{GitError, IndexError, IndexResult, ResultExt};
use crate::ui::progress::BranchProgress;
use std::collections::BTreeSet;
use std::process::Output;

impl SystemGit {
  /// Fetch from remote, including tags; stale remote-tracking refs are pruned
  pub fn fetch_from_remote(&self, remote_name: &str) -> IndexResult<()> {
    eprintln!("   Fetching from remote '{}'...", remote_name);

    let output = self
      .git_cmd()
      .args(["fetch", "--prune", "--tags", "--force", remote_name])
      .output()
      .context("Failed to fetch")?;

    ensure_success(&output, "git fetch")?;

    eprintln!("   ✅ Fetched from {}", remote_name);
    Ok(())
  }

  /// Resolve a commit-ish to a full SHA; `None` if it does not name a commit
  pub fn resolve_commit(&self, reference: &str) -> IndexResult<Option<String>> {
    // Never let a manifest value be parsed as an option
    if reference.is_empty() || reference.starts_with('-') {
      return Ok(None);
    }

    let spec = format!("{}^{{commit}}", reference);
    let output = self
      .git_cmd()
      .args(["rev-parse", "--verify", "--quiet", &spec])
      .output()
      .context("Failed to run git rev-parse")?;

    if !output.status.success() {
      tracing::debug!(reference, "ref does not resolve to a commit");
      return Ok(None);
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    tracing::debug!(reference, sha = %sha, "resolved ref");
    Ok(Some(sha))
  }

  /// Short names of the remote-tracking branches containing `sha`
  ///
  /// Local branches in the cache are ignored: only what the remote has counts.
  pub fn branches_containing(&self, sha: &str) -> IndexResult<BTreeSet<String>> {
    let remote_refs = format!("refs/remotes/{}", REMOTE_NAME);
    let output = self
      .git_cmd()
      .args(["for-each-ref", "--format=%(refname)", "--contains", sha, &remote_refs])
      .output()
      .context("Failed to list branches containing commit")?;

    ensure_success(&output, "git for-each-ref --contains")?;

    let branches = String::from_utf8_lossy(&output.stdout)
      .lines()
      .filter_map(normalize_branch_ref)
      .collect();

    Ok(branches)
  }

  /// Whether `sha` is reachable from a remote-tracking branch or a tag
  pub fn is_published(&self, sha: &str) -> IndexResult<bool> {
    let remote_refs = format!("refs/remotes/{}", REMOTE_NAME);
    let output = self
      .git_cmd()
      .args([
        "for-each-ref",
        "--count=1",
        "--format=%(refname)",
        "--contains",
        sha,
        &remote_refs,
        "refs/tags",
      ])
      .output()
      .context("Failed to check whether commit is published")?;

    ensure_success(&output, "git for-each-ref --contains")?;

    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
  }

  /// Whether `refs/remotes/<remote>/<branch>` exists locally
  pub fn has_remote_branch(&self, branch: &str) -> IndexResult<bool> {
    let refname = format!("refs/remotes/{}/{}", REMOTE_NAME, branch);
    let output = self
      .git_cmd()
      .args(["show-ref", "--verify", "--quiet", &refname])
      .output()
      .context("Failed to run git show-ref")?;
    Ok(output.status.success())
  }

  /// Fetch a single branch into its remote-tracking ref
  fn fetch_branch(&self, branch: &str) -> IndexResult<()> {
    let refspec = format!("+refs/heads/{0}:refs/remotes/{1}/{0}", branch, REMOTE_NAME);
    let output = self
      .git_cmd()
      .args(["fetch", REMOTE_NAME, &refspec])
      .output()
      .context("Failed to fetch branch")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("couldn't find remote ref") {
        return Err(IndexError::Git(GitError::BranchNotFound {
          branch: branch.to_string(),
        }));
      }
      return Err(IndexError::Git(GitError::CommandFailed {
        command: format!("git fetch {} {}", REMOTE_NAME, refspec),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }
}

impl RepositoryAccessor for SystemGit {
  fn fetch(&self) -> IndexResult<()> {
    self.fetch_from_remote(REMOTE_NAME)
  }

  fn ensure_branches(&self, names: &[String]) -> IndexResult<()> {
    let mut progress = BranchProgress::for_terminal(names.len(), format!("Syncing {} RC branches", names.len()));

    for name in names {
      if !self.has_remote_branch(name)? {
        tracing::debug!(branch = %name, "remote-tracking branch missing, fetching explicitly");
        self.fetch_branch(name)?;
      }
      if let Some(ref mut p) = progress {
        p.inc();
      }
    }

    Ok(())
  }

  fn show(&self, reference: &str) -> IndexResult<Option<Commit>> {
    let Some(sha) = self.resolve_commit(reference)? else {
      return Ok(None);
    };
    if !self.is_published(&sha)? {
      tracing::debug!(reference, sha = %sha, "commit only exists in the local cache");
      return Ok(None);
    }
    let branches = self.branches_containing(&sha)?;
    Ok(Some(Commit { sha, branches }))
  }
}

fn ensure_success(output: &Output, command: &str) -> IndexResult<()> {
  if output.status.success() {
    return Ok(());
  }
  Err(IndexError::Git(GitError::CommandFailed {
    command: command.to_string(),
    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
  }))
}

/// Map a remote-tracking ref name to the short branch name used in the release index
///
/// `refs/remotes/origin/X` becomes `X`; the symbolic `origin/HEAD` and every
/// other ref are dropped.
fn normalize_branch_ref(refname: &str) -> Option<String> {
  let branch = refname
    .trim()
    .strip_prefix("refs/remotes/")?
    .strip_prefix(REMOTE_NAME)?
    .strip_prefix('/')?;
  if branch.is_empty() || branch == "HEAD" {
    return None;
  }
  Some(branch.to_string())
}
