//! Check trait abstraction for release index validation
//!
//! Every consistency rule implements the `Check` trait, so the runner can drive
//! the whole battery without knowing what each rule does.
//!
//! Checks come in two stages:
//! - **manifest**: pure checks over the release index (cheap, run first)
//! - **repository**: checks that ask the [`RepositoryAccessor`] about commits,
//!   branches and tags (run after the cache has been fetched)

use crate::core::error::{IndexError, IndexResult};
use crate::core::vcs::RepositoryAccessor;
use crate::index::ReleaseIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for check results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
  /// Informational message (not an issue)
  Info,
  /// Warning (non-blocking, but should be addressed)
  Warning,
  /// Error (blocking, must be fixed)
  Error,
}

/// When a check can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
  /// Only needs the release index
  Manifest,
  /// Needs a fetched repository with the RC branches present
  Repository,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Stage::Manifest => write!(f, "manifest"),
      Stage::Repository => write!(f, "repository"),
    }
  }
}

/// How violations are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportMode {
  /// Stop at the first violation
  #[default]
  FailFast,
  /// Run everything, then fail with every violation found
  Batch,
}

impl ReportMode {
  pub fn is_fail_fast(self) -> bool {
    self == ReportMode::FailFast
  }
}

/// Failure category of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
  /// The manifest contradicts itself
  ManifestInvariant,
  /// A referenced commit or branch does not line up with the repository
  RepositoryResolution,
  /// An existing tag points at another commit
  TagDrift,
}

/// A fatal finding, naming the offending manifest entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
  MissingBaseVersion {
    rc_name: String,
  },
  DuplicateVersionName {
    rc_name: String,
    name: String,
  },
  /// `current` is listed after `previous` but is newer
  RcOutOfOrder {
    previous: String,
    current: String,
  },
  CommitNotFound {
    reference: String,
  },
  NotOnBranch {
    reference: String,
    branch: String,
    found: Vec<String>,
  },
  TagDrift {
    tag: String,
    tag_sha: String,
    commit_sha: String,
  },
}

impl Violation {
  pub fn kind(&self) -> ViolationKind {
    match self {
      Violation::MissingBaseVersion { .. }
      | Violation::DuplicateVersionName { .. }
      | Violation::RcOutOfOrder { .. } => ViolationKind::ManifestInvariant,
      Violation::CommitNotFound { .. } | Violation::NotOnBranch { .. } => ViolationKind::RepositoryResolution,
      Violation::TagDrift { .. } => ViolationKind::TagDrift,
    }
  }

  pub fn help_message(&self) -> Option<String> {
    match self {
      Violation::MissingBaseVersion { rc_name } => Some(format!("Add a version named 'base' to {}", rc_name)),
      Violation::DuplicateVersionName { .. } => Some("Give every version in a release a distinct name".to_string()),
      Violation::RcOutOfOrder { .. } => Some("Releases must be listed newest first".to_string()),
      Violation::CommitNotFound { .. } => {
        Some("Check the commit-ish for typos or push the commit to the remote".to_string())
      }
      Violation::NotOnBranch { branch, .. } => {
        Some(format!("Cherry-pick the commit onto {} or fix the version entry", branch))
      }
      Violation::TagDrift { tag, .. } => Some(format!(
        "Either the manifest or tag {} is wrong; they must name the same commit",
        tag
      )),
    }
  }
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Violation::MissingBaseVersion { rc_name } => {
        write!(f, "Release {} does not have a base version", rc_name)
      }
      Violation::DuplicateVersionName { rc_name, name } => write!(
        f,
        "Version {} in release {} has the same name as another version from the same release",
        name, rc_name
      ),
      Violation::RcOutOfOrder { previous, current } => write!(
        f,
        "Release {} is newer than {} but is listed after it",
        current, previous
      ),
      Violation::CommitNotFound { reference } => write!(f, "Commit {} does not exist", reference),
      Violation::NotOnBranch {
        reference,
        branch,
        found,
      } => {
        let found = if found.is_empty() {
          "(none)".to_string()
        } else {
          found.join(", ")
        };
        write!(
          f,
          "Commit {} is not on branch {}. Commit found on branches: {}",
          reference, branch, found
        )
      }
      Violation::TagDrift {
        tag,
        tag_sha,
        commit_sha,
      } => write!(f, "Tag {} points to {} not {}", tag, tag_sha, commit_sha),
    }
  }
}

/// A non-fatal finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
  TagMissing { tag: String },
}

impl fmt::Display for Advisory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Advisory::TagMissing { tag } => write!(f, "Tag {} does not exist", tag),
    }
  }
}

/// Result of running a check
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
  /// Name of the check that ran
  pub check_name: String,
  /// Message shown when the check passes
  pub message: String,
  /// Fatal findings (at most one in fail-fast mode)
  pub violations: Vec<Violation>,
  /// Non-fatal findings
  pub advisories: Vec<Advisory>,
}

impl CheckResult {
  /// Create a passing check result
  pub fn pass(check_name: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      check_name: check_name.into(),
      message: message.into(),
      violations: Vec::new(),
      advisories: Vec::new(),
    }
  }

  /// Attach violations
  pub fn with_violations(mut self, violations: Vec<Violation>) -> Self {
    self.violations = violations;
    self
  }

  /// Attach advisories
  pub fn with_advisories(mut self, advisories: Vec<Advisory>) -> Self {
    self.advisories = advisories;
    self
  }

  pub fn passed(&self) -> bool {
    self.violations.is_empty()
  }

  pub fn severity(&self) -> Severity {
    if !self.violations.is_empty() {
      Severity::Error
    } else if !self.advisories.is_empty() {
      Severity::Warning
    } else {
      Severity::Info
    }
  }
}

/// Context passed to checks
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
  /// Release index under validation
  pub index: &'a ReleaseIndex,
  /// Repository, present once the cache has been fetched
  pub repo: Option<&'a dyn RepositoryAccessor>,
  /// Whether to stop at the first violation
  pub mode: ReportMode,
}

impl<'a> CheckContext<'a> {
  /// Context for manifest-only checks
  pub fn manifest(index: &'a ReleaseIndex, mode: ReportMode) -> Self {
    Self { index, repo: None, mode }
  }

  /// Context with repository access
  pub fn with_repo(index: &'a ReleaseIndex, repo: &'a dyn RepositoryAccessor, mode: ReportMode) -> Self {
    Self {
      index,
      repo: Some(repo),
      mode,
    }
  }

  /// Repository access or an error naming the check that needed it
  pub fn require_repo(&self, check_name: &str) -> IndexResult<&'a dyn RepositoryAccessor> {
    self.repo.ok_or_else(|| {
      IndexError::message(format!(
        "Check '{}' needs repository access but none was provided",
        check_name
      ))
    })
  }
}

/// Consistency check trait
///
/// Each check scans the whole release index and reports what it finds. In
/// fail-fast mode it returns as soon as it has one violation.
///
/// # Example
///
/// ```rust,ignore
/// struct NonEmptyCheck;
///
/// impl Check for NonEmptyCheck {
///   fn name(&self) -> &'static str {
///     "non-empty"
///   }
///
///   fn description(&self) -> &'static str {
///     "Validates the index lists at least one release"
///   }
///
///   fn run(&self, ctx: &CheckContext<'_>) -> IndexResult<CheckResult> {
///     Ok(CheckResult::pass(self.name(), "Index is not empty"))
///   }
/// }
/// ```
pub trait Check: Send + Sync {
  /// Unique name for this check (kebab-case)
  fn name(&self) -> &'static str;

  /// Human-readable description of what this check validates
  fn description(&self) -> &'static str;

  /// Stage the check belongs to
  /// Default: manifest
  fn stage(&self) -> Stage {
    Stage::Manifest
  }

  /// Run the check and return a result
  ///
  /// `Err` means the check could not run (e.g. git failed), not that it found
  /// a violation.
  fn run(&self, ctx: &CheckContext<'_>) -> IndexResult<CheckResult>;
}
