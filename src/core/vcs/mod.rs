//! Repository access
//!
//! Checks never talk to git directly. They go through [`RepositoryAccessor`],
//! which [`SystemGit`] implements with the system `git` binary and tests replace
//! with an in-memory repository.

pub mod system_git;
mod system_git_ops;

use crate::core::error::IndexResult;
use std::collections::BTreeSet;

pub use system_git::SystemGit;

/// A resolved commit and the branches it is reachable from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
  pub sha: String,
  /// Short branch names (remote-tracking names are reported without the remote)
  pub branches: BTreeSet<String>,
}

impl Commit {
  pub fn is_on_branch(&self, branch: &str) -> bool {
    self.branches.contains(branch)
  }
}

/// Capability the checks need from the repository
pub trait RepositoryAccessor {
  /// Bring the local cache up to date with the remote
  fn fetch(&self) -> IndexResult<()>;

  /// Make sure the named remote branches are visible locally
  ///
  /// Fails if any of them does not exist on the remote.
  fn ensure_branches(&self, names: &[String]) -> IndexResult<()>;

  /// Resolve a commit-ish (sha, tag, branch) to a commit
  ///
  /// `Ok(None)` means the ref does not exist; errors are reserved for git itself failing.
  fn show(&self, reference: &str) -> IndexResult<Option<Commit>>;
}

impl<T: RepositoryAccessor + ?Sized> RepositoryAccessor for &T {
  fn fetch(&self) -> IndexResult<()> {
    (**self).fetch()
  }

  fn ensure_branches(&self, names: &[String]) -> IndexResult<()> {
    (**self).ensure_branches(names)
  }

  fn show(&self, reference: &str) -> IndexResult<Option<Commit>> {
    (**self).show(reference)
  }
}
