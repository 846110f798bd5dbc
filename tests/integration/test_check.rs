//! Tests for the `check` command against a real upstream repository

use crate::helpers::*;
use anyhow::Result;

const NEW_RC: &str = "rc--2024-01-02_00-00";
const OLD_RC: &str = "rc--2024-01-01_00-00";

/// Upstream history:
///
/// ```text
/// master:  init - a (OLD_RC) - b (NEW_RC) - hotfix (NEW_RC only)
/// ```
struct History {
  fixture: ReleaseFixture,
  old_base: String,
  new_base: String,
  hotfix: String,
}

fn history() -> Result<History> {
  let fixture = ReleaseFixture::new()?;

  let old_base = fixture.commit("Feature A")?;
  fixture.branch(OLD_RC, &old_base)?;
  fixture.checkout("master")?;

  let new_base = fixture.commit("Feature B")?;
  fixture.branch(NEW_RC, &new_base)?;
  let hotfix = fixture.commit("Hotfix for the new RC")?;
  fixture.checkout("master")?;

  Ok(History {
    fixture,
    old_base,
    new_base,
    hotfix,
  })
}

fn manifest(releases: &[(&str, &[(&str, &str)])]) -> String {
  let mut out = String::from("releases:\n");
  for (rc_name, versions) in releases {
    out.push_str(&format!("  - rc_name: {}\n    versions:\n", rc_name));
    for (name, version) in *versions {
      out.push_str(&format!("      - name: {}\n        version: \"{}\"\n", name, version));
    }
  }
  out
}

impl History {
  fn valid_manifest(&self) -> String {
    manifest(&[
      (NEW_RC, &[("base", self.new_base.as_str()), ("hotfix", self.hotfix.as_str())]),
      (OLD_RC, &[("base", self.old_base.as_str())]),
    ])
  }
}

#[test]
fn test_check_passes_on_consistent_index() -> Result<()> {
  let h = history()?;
  h.fixture.tag("release-2024-01-02_00-00-base", &h.new_base)?;
  h.fixture.write_manifest(&h.valid_manifest())?;

  let output = h.fixture.run_check(&[])?;
  let out = stdout(&output);

  assert!(output.status.success(), "stdout: {}\nstderr: {}", out, stderr(&output));
  assert!(out.contains("Schema validation passed"));
  assert!(out.contains("All releases have a base version"));
  assert!(out.contains("All version names are unique within the respective releases"));
  assert!(out.contains("All RCs are ordered descending by date"));
  assert!(out.contains("All commits exist"));
  assert!(out.contains("All versions are on the correct branches"));
  assert!(out.contains("Finished tag consistency check"));
  assert!(out.contains("All checks passed"));
  assert!(h.fixture.cache.join(".git").exists(), "cache clone created");

  Ok(())
}

#[test]
fn test_missing_tag_only_warns() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&h.valid_manifest())?;

  let output = h.fixture.run_check(&[])?;
  let out = stdout(&output);

  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(out.contains("Tag release-2024-01-02_00-00-base does not exist"));
  assert!(out.contains("Tag release-2024-01-02_00-00-hotfix does not exist"));
  assert!(out.contains("Tag release-2024-01-01_00-00-base does not exist"));

  Ok(())
}

#[test]
fn test_missing_base_fails_before_repository_access() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&manifest(&[
    (NEW_RC, &[("base", h.new_base.as_str())]),
    (OLD_RC, &[("hotfix", h.old_base.as_str())]),
  ]))?;

  let output = h.fixture.run_check(&[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Release rc--2024-01-01_00-00 does not have a base version"));
  assert!(!h.fixture.cache.exists(), "repository must not be touched");

  Ok(())
}

#[test]
fn test_duplicate_version_names_fail() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&manifest(&[
    (NEW_RC, &[("base", h.new_base.as_str()), ("base", h.hotfix.as_str())]),
    (OLD_RC, &[("base", h.old_base.as_str())]),
  ]))?;

  let output = h.fixture.run_check(&[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains(
    "Version base in release rc--2024-01-02_00-00 has the same name as another version from the same release"
  ));

  Ok(())
}

#[test]
fn test_out_of_order_rcs_fail() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&manifest(&[
    (OLD_RC, &[("base", h.old_base.as_str())]),
    (NEW_RC, &[("base", h.new_base.as_str())]),
  ]))?;

  let output = h.fixture.run_check(&[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(
    stderr(&output).contains("Release rc--2024-01-02_00-00 is newer than rc--2024-01-01_00-00 but is listed after it")
  );

  Ok(())
}

#[test]
fn test_unknown_commit_fails() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&manifest(&[
    (NEW_RC, &[("base", h.new_base.as_str())]),
    (OLD_RC, &[("base", "deadbeefdeadbeef")]),
  ]))?;

  let output = h.fixture.run_check(&[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Commit deadbeefdeadbeef does not exist"));
  assert!(stdout(&output).contains("Commit deadbeefdeadbeef does not exist"));

  Ok(())
}

#[test]
fn test_commit_on_wrong_branch_fails() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&manifest(&[
    (NEW_RC, &[("base", h.new_base.as_str())]),
    (OLD_RC, &[("base", h.hotfix.as_str())]),
  ]))?;

  let output = h.fixture.run_check(&[])?;
  let err = stderr(&output);

  assert_eq!(output.status.code(), Some(1));
  assert!(err.contains(&format!(
    "Commit {} is not on branch rc--2024-01-01_00-00. Commit found on branches: rc--2024-01-02_00-00",
    h.hotfix
  )));

  Ok(())
}

#[test]
fn test_tag_drift_fails() -> Result<()> {
  let h = history()?;
  h.fixture.tag("release-2024-01-01_00-00-base", &h.new_base)?;
  h.fixture.write_manifest(&h.valid_manifest())?;

  let output = h.fixture.run_check(&[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains(&format!(
    "Tag release-2024-01-01_00-00-base points to {} not {}",
    h.new_base, h.old_base
  )));

  Ok(())
}

#[test]
fn test_batch_mode_reports_every_violation() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&manifest(&[
    (NEW_RC, &[("hotfix", h.hotfix.as_str())]),
    (OLD_RC, &[("base", "deadbeefdeadbeef")]),
  ]))?;

  let output = h.fixture.run_check(&["--batch"])?;
  let out = stdout(&output);
  let err = stderr(&output);

  assert_eq!(output.status.code(), Some(1));
  assert!(err.contains("2 violation(s) found"), "stderr: {}", err);
  assert!(out.contains("Release rc--2024-01-02_00-00 does not have a base version"));
  assert!(out.contains("Commit deadbeefdeadbeef does not exist"));
  assert!(!out.contains("All commits exist"));

  Ok(())
}

#[test]
fn test_schema_violation_fails_before_checks() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&manifest(&[("2024-01-01_00-00", &[("base", h.old_base.as_str())])]))?;

  let output = h.fixture.run_check(&[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Schema validation failed"));
  assert!(!stdout(&output).contains("All releases have a base version"));
  assert!(!h.fixture.cache.exists());

  Ok(())
}

#[test]
fn test_missing_rc_branch_fails() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&manifest(&[
    ("rc--2024-01-03_00-00", &[("base", h.new_base.as_str())]),
    (NEW_RC, &[("base", h.new_base.as_str())]),
  ]))?;

  let output = h.fixture.run_check(&[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Branch rc--2024-01-03_00-00 does not exist on the remote"));

  Ok(())
}

#[test]
fn test_json_report() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&h.valid_manifest())?;

  let output = h.fixture.run_check(&["--json"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["passed"], true);
  assert_eq!(report["mode"], "fail-fast");
  assert_eq!(report["releases"], 2);
  assert_eq!(report["versions"], 3);
  assert_eq!(report["results"].as_array().map(|r| r.len()), Some(6));
  assert_eq!(report["results"][5]["advisories"][0]["kind"], "tag_missing");

  Ok(())
}

#[test]
fn test_second_run_reuses_cache_with_same_outcome() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&h.valid_manifest())?;

  let first = h.fixture.run_check(&[])?;
  let second = h.fixture.run_check(&[])?;

  assert!(first.status.success());
  assert_eq!(first.status.code(), second.status.code());
  assert_eq!(stdout(&first), stdout(&second));
  assert!(stderr(&first).contains("Cloning"));
  assert!(!stderr(&second).contains("Cloning"));

  Ok(())
}

#[test]
fn test_new_upstream_branch_is_picked_up_by_existing_cache() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&h.valid_manifest())?;
  assert!(h.fixture.run_check(&[])?.status.success());

  // Cut a newer RC after the cache was cloned
  let newest = h.fixture.commit("Feature C")?;
  h.fixture.branch("rc--2024-01-03_00-00", &newest)?;
  h.fixture.checkout("master")?;
  h.fixture.write_manifest(&manifest(&[
    ("rc--2024-01-03_00-00", &[("base", newest.as_str())]),
    (NEW_RC, &[("base", h.new_base.as_str())]),
    (OLD_RC, &[("base", h.old_base.as_str())]),
  ]))?;

  let output = h.fixture.run_check(&[])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  Ok(())
}

#[test]
fn test_missing_repo_path_is_a_config_error() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&h.valid_manifest())?;

  let output = run_release_index_check(&h.fixture.work, &["check"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Missing required setting: repository path"));

  Ok(())
}

#[test]
fn test_unpushed_commit_in_cache_does_not_exist() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&h.valid_manifest())?;
  assert!(h.fixture.run_check(&[])?.status.success());

  // Commit on a local RC branch inside the cache; the remote never sees it
  let parent = format!("origin/{}", OLD_RC);
  let tree = format!("{}^{{tree}}", parent);
  let output = git(
    &h.fixture.cache,
    &[
      "-c",
      "user.name=Local",
      "-c",
      "user.email=local@example.com",
      "commit-tree",
      &tree,
      "-p",
      &parent,
      "-m",
      "Local only",
    ],
  )?;
  let local = String::from_utf8_lossy(&output.stdout).trim().to_string();
  git(&h.fixture.cache, &["branch", OLD_RC, &local])?;

  h.fixture.write_manifest(&manifest(&[
    (NEW_RC, &[("base", h.new_base.as_str())]),
    (OLD_RC, &[("base", local.as_str())]),
  ]))?;

  let output = h.fixture.run_check(&[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains(&format!("Commit {} does not exist", local)));

  Ok(())
}

#[test]
fn test_local_branch_in_cache_does_not_count_for_membership() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&h.valid_manifest())?;
  assert!(h.fixture.run_check(&[])?.status.success());

  // A stray local branch with the RC's name pointing at a commit the remote RC lacks
  git(&h.fixture.cache, &["branch", OLD_RC, &h.hotfix])?;

  h.fixture.write_manifest(&manifest(&[
    (NEW_RC, &[("base", h.new_base.as_str())]),
    (OLD_RC, &[("base", h.hotfix.as_str())]),
  ]))?;

  let output = h.fixture.run_check(&[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains(&format!(
    "Commit {} is not on branch rc--2024-01-01_00-00. Commit found on branches: rc--2024-01-02_00-00",
    h.hotfix
  )));

  Ok(())
}

#[test]
fn test_unreachable_remote_fails_on_fetch() -> Result<()> {
  let h = history()?;
  h.fixture.write_manifest(&h.valid_manifest())?;
  assert!(h.fixture.run_check(&[])?.status.success());

  std::fs::remove_dir_all(&h.fixture.upstream)?;

  let output = h.fixture.run_check(&[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Git command failed: git fetch"));
  assert!(!stdout(&output).contains("All commits exist"));

  Ok(())
}
