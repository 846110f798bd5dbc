//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// An upstream repository with RC branches, plus a working directory holding the manifest
pub struct ReleaseFixture {
  _root: TempDir,
  /// Non-bare repository the cache is cloned from
  pub upstream: PathBuf,
  /// Directory the binary runs in (manifest + schema)
  pub work: PathBuf,
  /// Cache clone location (created by the binary)
  pub cache: PathBuf,
}

impl ReleaseFixture {
  /// Create an upstream repo on `master` with one commit
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let upstream = root.path().join("upstream");
    let work = root.path().join("work");
    let cache = root.path().join("cache").join("repo");
    std::fs::create_dir_all(&upstream)?;
    std::fs::create_dir_all(&work)?;

    git(&upstream, &["init", "--initial-branch=master"])?;
    git(&upstream, &["config", "user.name", "Test User"])?;
    git(&upstream, &["config", "user.email", "test@example.com"])?;

    std::fs::copy(
      Path::new(env!("CARGO_MANIFEST_DIR")).join("schemas/release-index-schema.json"),
      work.join("release-index-schema.json"),
    )
    .context("Failed to copy schema")?;

    let fixture = Self {
      _root: root,
      upstream,
      work,
      cache,
    };
    fixture.commit("Initial commit")?;
    Ok(fixture)
  }

  /// Commit a change on the current upstream branch and return its SHA
  pub fn commit(&self, message: &str) -> Result<String> {
    let file = self.upstream.join("CHANGES.md");
    let mut content = std::fs::read_to_string(&file).unwrap_or_default();
    content.push_str(message);
    content.push('\n');
    std::fs::write(&file, content)?;

    git(&self.upstream, &["add", "."])?;
    git(&self.upstream, &["commit", "-m", message])?;

    let output = git(&self.upstream, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create `branch` at `start` and check it out
  pub fn branch(&self, branch: &str, start: &str) -> Result<()> {
    git(&self.upstream, &["checkout", "-b", branch, start])?;
    Ok(())
  }

  pub fn checkout(&self, branch: &str) -> Result<()> {
    git(&self.upstream, &["checkout", branch])?;
    Ok(())
  }

  /// Create a lightweight tag
  pub fn tag(&self, tag: &str, sha: &str) -> Result<()> {
    git(&self.upstream, &["tag", tag, sha])?;
    Ok(())
  }

  /// Write release-index.yaml into the working directory
  pub fn write_manifest(&self, content: &str) -> Result<()> {
    std::fs::write(self.work.join("release-index.yaml"), content)?;
    Ok(())
  }

  /// Run `check` against the fixture, cloning upstream into the cache
  pub fn run_check(&self, extra: &[&str]) -> Result<Output> {
    let upstream = self.upstream.to_string_lossy().to_string();
    let cache = self.cache.to_string_lossy().to_string();
    let mut args = vec!["check", "--repo-path", cache.as_str(), "--remote", upstream.as_str()];
    args.extend_from_slice(extra);
    run_release_index_check(&self.work, &args)
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the release-index-check binary; a failing exit status is returned, not raised
pub fn run_release_index_check(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_release-index-check");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RELEASE_INDEX_REPO_PATH")
    .env_remove("RUST_LOG")
    .env("NO_COLOR", "1")
    .output()
    .context("Failed to run release-index-check")
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
