//! Version name uniqueness check

use super::trait_def::{Check, CheckContext, CheckResult, Violation};
use crate::core::error::IndexResult;
use std::collections::HashSet;

/// No two versions of the same release may share a name
pub struct UniqueVersionNamesCheck;

impl Check for UniqueVersionNamesCheck {
  fn name(&self) -> &'static str {
    "unique-version-names"
  }

  fn description(&self) -> &'static str {
    "Validates that version names are unique within each release"
  }

  fn run(&self, ctx: &CheckContext<'_>) -> IndexResult<CheckResult> {
    let mut violations = Vec::new();

    'releases: for release in ctx.index.releases() {
      let mut seen = HashSet::new();
      for version in &release.versions {
        if seen.insert(version.name.as_str()) {
          continue;
        }
        violations.push(Violation::DuplicateVersionName {
          rc_name: release.rc_name.clone(),
          name: version.name.clone(),
        });
        if ctx.mode.is_fail_fast() {
          break 'releases;
        }
      }
    }

    Ok(
      CheckResult::pass(
        self.name(),
        "All version names are unique within the respective releases",
      )
      .with_violations(violations),
    )
  }
}
