//! Base version presence check
//!
//! Every release must declare a version named `base`.

use super::trait_def::{Check, CheckContext, CheckResult, Violation};
use crate::core::error::IndexResult;

pub struct BaseVersionCheck;

impl Check for BaseVersionCheck {
  fn name(&self) -> &'static str {
    "base-version"
  }

  fn description(&self) -> &'static str {
    "Validates that every release declares a version named 'base'"
  }

  fn run(&self, ctx: &CheckContext<'_>) -> IndexResult<CheckResult> {
    let mut violations = Vec::new();

    for release in ctx.index.releases() {
      if release.versions.iter().any(|v| v.is_base()) {
        continue;
      }
      violations.push(Violation::MissingBaseVersion {
        rc_name: release.rc_name.clone(),
      });
      if ctx.mode.is_fail_fast() {
        break;
      }
    }

    Ok(CheckResult::pass(self.name(), "All releases have a base version").with_violations(violations))
  }
}
