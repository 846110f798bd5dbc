use crate::checks::ReportMode;
use crate::core::error::{ConfigError, IndexError, IndexResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for release-index-check
/// Searched in order: release-index-check.toml, .release-index-check.toml, .config/release-index-check.toml
///
/// ```toml
/// [index]
/// path = "release-index.yaml"
/// schema = "release-index-schema.json"
///
/// [repository]
/// path = "/var/cache/release-index/repo"
/// remote = "https://github.com/example/project.git"
/// main_branch = "master"
///
/// [report]
/// mode = "batch"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckerConfig {
  #[serde(default)]
  pub index: IndexConfig,
  #[serde(default)]
  pub repository: RepositoryConfig,
  #[serde(default)]
  pub report: ReportConfig,
}

/// Where the manifest and its schema live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
  /// Release index manifest (default: release-index.yaml)
  #[serde(default = "default_index_path")]
  pub path: PathBuf,

  /// JSON schema for the manifest (default: release-index-schema.json)
  #[serde(default = "default_schema_path")]
  pub schema: PathBuf,
}

fn default_index_path() -> PathBuf {
  PathBuf::from("release-index.yaml")
}

fn default_schema_path() -> PathBuf {
  PathBuf::from("release-index-schema.json")
}

impl Default for IndexConfig {
  fn default() -> Self {
    Self {
      path: default_index_path(),
      schema: default_schema_path(),
    }
  }
}

/// Repository cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
  /// Local cache clone (overridden by RELEASE_INDEX_REPO_PATH and --repo-path)
  #[serde(default)]
  pub path: Option<PathBuf>,

  /// Remote to clone when the cache does not exist yet
  #[serde(default)]
  pub remote: Option<String>,

  /// Branch checked out in the cache (default: master)
  #[serde(default = "default_main_branch")]
  pub main_branch: String,
}

fn default_main_branch() -> String {
  "master".to_string()
}

impl Default for RepositoryConfig {
  fn default() -> Self {
    Self {
      path: None,
      remote: None,
      main_branch: default_main_branch(),
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
  /// fail-fast (default) or batch
  #[serde(default)]
  pub mode: ReportMode,
}

impl RepositoryConfig {
  pub fn validate(&self) -> IndexResult<()> {
    validate_branch_name("repository.main_branch", &self.main_branch)?;

    if let Some(ref remote) = self.remote
      && remote.trim().is_empty()
    {
      return Err(IndexError::Config(ConfigError::InvalidValue {
        field: "repository.remote".to_string(),
        value: remote.clone(),
        reason: "remote URL must not be empty".to_string(),
      }));
    }

    Ok(())
  }
}

/// Reject branch names git would refuse or read as an option
pub fn validate_branch_name(field: &str, name: &str) -> IndexResult<()> {
  let reason = if name.is_empty() {
    Some("branch name must not be empty")
  } else if name.starts_with('-') {
    Some("branch name must not start with '-'")
  } else if name.chars().any(|c| c.is_whitespace()) {
    Some("branch name must not contain whitespace")
  } else {
    None
  };

  match reason {
    Some(reason) => Err(IndexError::Config(ConfigError::InvalidValue {
      field: field.to_string(),
      value: name.to_string(),
      reason: reason.to_string(),
    })),
    None => Ok(()),
  }
}

impl CheckerConfig {
  /// Find config file in search order
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("release-index-check.toml"),
      path.join(".release-index-check.toml"),
      path.join(".config").join("release-index-check.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Parse and validate a config document
  pub fn from_toml(content: &str) -> IndexResult<Self> {
    let config: CheckerConfig = toml_edit::de::from_str(content)?;
    config.repository.validate()?;
    Ok(config)
  }

  /// Load config from `path` if one exists, defaults otherwise
  pub fn load_or_default(path: &Path) -> IndexResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      tracing::debug!(dir = %path.display(), "no config file found, using defaults");
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config =
      Self::from_toml(&content).with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
  }
}
