//! `release-index-check check` - validate a release index against the repository
//!
//! Order of work:
//! 1. Load the manifest and validate it against the JSON schema
//! 2. Run the manifest checks (no repository access)
//! 3. Open or clone the repository cache, fetch, sync the RC branches
//! 4. Run the repository checks
//!
//! In fail-fast mode the first violation ends the run. In batch mode every
//! check runs and the run fails with the full list.

use crate::checks::{
  CheckContext, CheckResult, ReportMode, Stage, Violation, collect_violations, create_default_runner,
};
use crate::core::context::RunContext;
use crate::core::error::{IndexError, IndexResult, ValidationError};
use crate::core::vcs::{RepositoryAccessor, SystemGit};
use crate::index::ReleaseIndex;
use crate::index::loader::load_document;
use crate::index::schema::{load_schema, validate_document};
use crate::ui::status::StatusPrinter;
use serde::Serialize;

/// Machine-readable report printed with `--json`
#[derive(Debug, Serialize)]
pub struct CheckReport {
  pub passed: bool,
  pub mode: ReportMode,
  pub releases: usize,
  pub versions: usize,
  pub results: Vec<CheckResult>,
}

/// Run the check command
pub fn run_check(ctx: &RunContext, json: bool) -> IndexResult<()> {
  let printer = if json {
    StatusPrinter::quiet()
  } else {
    StatusPrinter::detect()
  };

  printer.info(&format!(
    "🔍 Checking release index at {} against schema at {} and repo at {}",
    ctx.manifest_path.display(),
    ctx.schema_path.display(),
    ctx.repo_path.display()
  ));

  let index = load_index(ctx)?;
  printer.success("Schema validation passed");
  tracing::info!(
    releases = index.releases().len(),
    versions = index.version_count(),
    mode = ?ctx.mode,
    "release index loaded"
  );

  let results = run_checks(&index, ctx.mode, printer, || {
    SystemGit::open_or_clone(&ctx.repo_path, ctx.remote.as_deref(), &ctx.main_branch)
  })?;

  let violations = collect_violations(&results);

  if json {
    let report = CheckReport {
      passed: violations.is_empty(),
      mode: ctx.mode,
      releases: index.releases().len(),
      versions: index.version_count(),
      results,
    };
    let output = serde_json::to_string_pretty(&report)
      .map_err(|e| IndexError::message(format!("Failed to serialize JSON: {}", e)))?;
    println!("{}", output);
  }

  finish(violations, ctx.mode)?;
  printer.success("✅ All checks passed");
  Ok(())
}

/// Run the manifest stage, then connect to the repository and run the repository stage
///
/// `connect` is only called when the repository stage will run: a fail-fast
/// manifest failure ends the run without touching the repository.
fn run_checks<R: RepositoryAccessor>(
  index: &ReleaseIndex,
  mode: ReportMode,
  printer: StatusPrinter,
  connect: impl FnOnce() -> IndexResult<R>,
) -> IndexResult<Vec<CheckResult>> {
  let runner = create_default_runner();
  let mut results = runner.run_stage(Stage::Manifest, &CheckContext::manifest(index, mode), |r| {
    printer.report(r)
  })?;

  let manifest_failed = results.iter().any(|r| !r.passed());
  if manifest_failed && mode.is_fail_fast() {
    tracing::info!("manifest checks failed, skipping repository access");
    return Ok(results);
  }

  tracing::info!("manifest checks done, syncing repository cache");
  let repo = connect()?;
  repo.fetch()?;
  repo.ensure_branches(&index.rc_names())?;

  let repo_results = runner.run_stage(Stage::Repository, &CheckContext::with_repo(index, &repo, mode), |r| {
    printer.report(r)
  })?;
  results.extend(repo_results);

  Ok(results)
}

/// Load the manifest, validate it against the schema and build the typed index
fn load_index(ctx: &RunContext) -> IndexResult<ReleaseIndex> {
  let document = load_document(&ctx.manifest_path)?;
  let schema = load_schema(&ctx.schema_path)?;
  validate_document(&document, &schema)?;
  ReleaseIndex::from_document(&document)
}

/// Turn the collected violations into the run outcome
fn finish(mut violations: Vec<Violation>, mode: ReportMode) -> IndexResult<()> {
  if violations.is_empty() {
    return Ok(());
  }
  let error = match mode {
    ReportMode::FailFast => ValidationError::Violation(violations.swap_remove(0)),
    ReportMode::Batch => ValidationError::Batch(violations),
  };
  Err(IndexError::Validation(error))
}
