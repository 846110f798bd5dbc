//! RC ordering check
//!
//! Releases are listed newest first. Timestamps come pre-parsed on each
//! release, so this is a pairwise walk over adjacent entries. Equal timestamps
//! are allowed.

use super::trait_def::{Check, CheckContext, CheckResult, Violation};
use crate::core::error::IndexResult;

pub struct RcOrderCheck;

impl Check for RcOrderCheck {
  fn name(&self) -> &'static str {
    "rc-order"
  }

  fn description(&self) -> &'static str {
    "Validates that releases are ordered newest first by RC timestamp"
  }

  fn run(&self, ctx: &CheckContext<'_>) -> IndexResult<CheckResult> {
    let mut violations = Vec::new();

    for pair in ctx.index.releases().windows(2) {
      let (previous, current) = (&pair[0], &pair[1]);
      if current.timestamp <= previous.timestamp {
        continue;
      }
      violations.push(Violation::RcOutOfOrder {
        previous: previous.rc_name.clone(),
        current: current.rc_name.clone(),
      });
      if ctx.mode.is_fail_fast() {
        break;
      }
    }

    Ok(CheckResult::pass(self.name(), "All RCs are ordered descending by date").with_violations(violations))
  }
}
