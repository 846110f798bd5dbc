//! Branch membership check
//!
//! A version's commit must be reachable from the branch named after its RC.
//! Versions whose commit does not resolve are left to `commit-existence`.

use super::trait_def::{Check, CheckContext, CheckResult, Stage, Violation};
use crate::core::error::IndexResult;

pub struct BranchMembershipCheck;

impl Check for BranchMembershipCheck {
  fn name(&self) -> &'static str {
    "branch-membership"
  }

  fn description(&self) -> &'static str {
    "Validates that every version's commit is on its RC branch"
  }

  fn stage(&self) -> Stage {
    Stage::Repository
  }

  fn run(&self, ctx: &CheckContext<'_>) -> IndexResult<CheckResult> {
    let repo = ctx.require_repo(self.name())?;
    let mut violations = Vec::new();

    for (release, version) in ctx.index.versions() {
      let Some(commit) = repo.show(&version.version)? else {
        tracing::debug!(reference = %version.version, "skipping unresolved commit");
        continue;
      };
      if commit.is_on_branch(&release.rc_name) {
        continue;
      }
      violations.push(Violation::NotOnBranch {
        reference: version.version.clone(),
        branch: release.rc_name.clone(),
        found: commit.branches.into_iter().collect(),
      });
      if ctx.mode.is_fail_fast() {
        break;
      }
    }

    Ok(CheckResult::pass(self.name(), "All versions are on the correct branches").with_violations(violations))
  }
}
