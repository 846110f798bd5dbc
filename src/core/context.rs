//! Run context - resolve settings once, pass everywhere
//!
//! Settings come from four layers, highest priority first:
//!
//! ```text
//! command line flag  >  environment  >  release-index-check.toml  >  default
//! ```
//!
//! The only environment variable is `RELEASE_INDEX_REPO_PATH`, which names the
//! repository cache when `--repo-path` is not given.

use crate::checks::ReportMode;
use crate::core::config::{CheckerConfig, validate_branch_name};
use crate::core::error::{ConfigError, IndexError, IndexResult};
use std::path::{Path, PathBuf};

/// Environment variable naming the repository cache
pub const REPO_PATH_ENV: &str = "RELEASE_INDEX_REPO_PATH";

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
  pub path: Option<PathBuf>,
  pub schema_path: Option<PathBuf>,
  pub repo_path: Option<PathBuf>,
  pub remote: Option<String>,
  pub main_branch: Option<String>,
  pub batch: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunContext {
  /// Release index manifest
  pub manifest_path: PathBuf,
  /// JSON schema for the manifest
  pub schema_path: PathBuf,
  /// Repository cache clone
  pub repo_path: PathBuf,
  /// Remote to clone from when the cache is missing
  pub remote: Option<String>,
  pub main_branch: String,
  pub mode: ReportMode,
}

impl RunContext {
  /// Resolve settings from `root` (config search dir), CLI flags and the process environment
  pub fn build(root: &Path, overrides: CliOverrides) -> IndexResult<Self> {
    let config = CheckerConfig::load_or_default(root)?;
    Self::resolve(root, config, overrides, |key| std::env::var(key).ok())
  }

  /// Resolve settings with an explicit environment lookup
  pub fn resolve(
    root: &Path,
    config: CheckerConfig,
    overrides: CliOverrides,
    env: impl Fn(&str) -> Option<String>,
  ) -> IndexResult<Self> {
    let repo_path = overrides
      .repo_path
      .or_else(|| env(REPO_PATH_ENV).filter(|v| !v.is_empty()).map(PathBuf::from))
      .or(config.repository.path)
      .ok_or_else(|| {
        IndexError::Config(ConfigError::MissingField {
          field: "repository path".to_string(),
          hint: format!(
            "Pass --repo-path, set {} or add [repository] path to release-index-check.toml",
            REPO_PATH_ENV
          ),
        })
      })?;

    let main_branch = match overrides.main_branch {
      Some(branch) => {
        validate_branch_name("--main-branch", &branch)?;
        branch
      }
      None => config.repository.main_branch,
    };

    let mode = if overrides.batch {
      ReportMode::Batch
    } else {
      config.report.mode
    };

    Ok(Self {
      manifest_path: root.join(overrides.path.unwrap_or(config.index.path)),
      schema_path: root.join(overrides.schema_path.unwrap_or(config.index.schema)),
      repo_path: root.join(repo_path),
      remote: overrides.remote.or(config.repository.remote),
      main_branch,
      mode,
    })
  }
}
