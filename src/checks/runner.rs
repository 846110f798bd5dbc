//! Check runner for executing the consistency battery

use super::trait_def::{Check, CheckContext, CheckResult, Stage, Violation};
use crate::core::error::IndexResult;
use std::sync::Arc;

/// Check runner that executes checks in registration order
pub struct CheckRunner {
  checks: Vec<Arc<dyn Check>>,
}

impl CheckRunner {
  /// Create a new check runner
  pub fn new() -> Self {
    Self { checks: Vec::new() }
  }

  /// Add a check to the runner
  pub fn add_check(&mut self, check: Arc<dyn Check>) {
    self.checks.push(check);
  }

  /// Run every check of `stage`
  ///
  /// `on_result` sees each result as soon as its check finishes. In fail-fast
  /// mode the stage stops after the first failing check. An `Err` from a check
  /// (it could not run at all) always aborts.
  pub fn run_stage(
    &self,
    stage: Stage,
    ctx: &CheckContext<'_>,
    mut on_result: impl FnMut(&CheckResult),
  ) -> IndexResult<Vec<CheckResult>> {
    let mut results = Vec::new();

    for check in self.checks.iter().filter(|c| c.stage() == stage) {
      tracing::debug!(check = check.name(), %stage, "running check");
      let result = check.run(ctx)?;
      for violation in &result.violations {
        tracing::debug!(check = check.name(), kind = ?violation.kind(), "{}", violation);
      }
      on_result(&result);

      let failed = !result.passed();
      results.push(result);
      if failed && ctx.mode.is_fail_fast() {
        break;
      }
    }

    Ok(results)
  }

  /// Get all registered checks
  pub fn checks(&self) -> &[Arc<dyn Check>] {
    &self.checks
  }
}

impl Default for CheckRunner {
  fn default() -> Self {
    Self::new()
  }
}

/// Every violation across `results`, in check order
pub fn collect_violations(results: &[CheckResult]) -> Vec<Violation> {
  results.iter().flat_map(|r| r.violations.iter().cloned()).collect()
}

/// Create a runner with all built-in checks
///
/// Manifest checks are registered first: they are cheap and catch authoring
/// mistakes before any repository I/O happens.
pub fn create_default_runner() -> CheckRunner {
  let mut runner = CheckRunner::new();

  runner.add_check(Arc::new(super::base_version::BaseVersionCheck));
  runner.add_check(Arc::new(super::unique_names::UniqueVersionNamesCheck));
  runner.add_check(Arc::new(super::rc_order::RcOrderCheck));
  runner.add_check(Arc::new(super::commit_existence::CommitExistenceCheck));
  runner.add_check(Arc::new(super::branch_membership::BranchMembershipCheck));
  runner.add_check(Arc::new(super::tag_consistency::TagConsistencyCheck));

  runner
}
