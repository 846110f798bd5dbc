//! Commit existence check

use super::trait_def::{Check, CheckContext, CheckResult, Stage, Violation};
use crate::core::error::IndexResult;

/// Every version must resolve to a commit in the repository
pub struct CommitExistenceCheck;

impl Check for CommitExistenceCheck {
  fn name(&self) -> &'static str {
    "commit-existence"
  }

  fn description(&self) -> &'static str {
    "Validates that every version resolves to an existing commit"
  }

  fn stage(&self) -> Stage {
    Stage::Repository
  }

  fn run(&self, ctx: &CheckContext<'_>) -> IndexResult<CheckResult> {
    let repo = ctx.require_repo(self.name())?;
    let mut violations = Vec::new();

    for (_, version) in ctx.index.versions() {
      if repo.show(&version.version)?.is_some() {
        continue;
      }
      violations.push(Violation::CommitNotFound {
        reference: version.version.clone(),
      });
      if ctx.mode.is_fail_fast() {
        break;
      }
    }

    Ok(CheckResult::pass(self.name(), "All commits exist").with_violations(violations))
  }
}
