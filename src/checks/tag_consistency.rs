//! Tag consistency check
//!
//! For each version, the tag `release-<rc timestamp>-<version name>` may or may
//! not have been cut yet. A missing tag is an advisory; a tag that resolves to
//! a different commit than the manifest declares is drift and fails the run.

use super::trait_def::{Advisory, Check, CheckContext, CheckResult, Stage, Violation};
use crate::core::error::IndexResult;

pub struct TagConsistencyCheck;

impl Check for TagConsistencyCheck {
  fn name(&self) -> &'static str {
    "tag-consistency"
  }

  fn description(&self) -> &'static str {
    "Validates that existing release tags point at the declared commits"
  }

  fn stage(&self) -> Stage {
    Stage::Repository
  }

  fn run(&self, ctx: &CheckContext<'_>) -> IndexResult<CheckResult> {
    let repo = ctx.require_repo(self.name())?;
    let mut violations = Vec::new();
    let mut advisories = Vec::new();

    for (release, version) in ctx.index.versions() {
      let tag_name = release.tag_name(version);

      let Some(tag) = repo.show(&tag_name)? else {
        tracing::warn!(tag = %tag_name, "release tag missing");
        advisories.push(Advisory::TagMissing { tag: tag_name });
        continue;
      };
      let Some(commit) = repo.show(&version.version)? else {
        tracing::debug!(reference = %version.version, "skipping unresolved commit");
        continue;
      };

      if tag.sha == commit.sha {
        continue;
      }
      violations.push(Violation::TagDrift {
        tag: tag_name,
        tag_sha: tag.sha,
        commit_sha: commit.sha,
      });
      if ctx.mode.is_fail_fast() {
        break;
      }
    }

    Ok(
      CheckResult::pass(self.name(), "Finished tag consistency check")
        .with_violations(violations)
        .with_advisories(advisories),
    )
  }
}
