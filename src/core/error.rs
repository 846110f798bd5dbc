//! Error types for release-index-check with contextual messages and exit codes
//!
//! Every fatal condition of a run ends up as an [`IndexError`]. The category
//! enums mirror the failure taxonomy of a run: configuration problems, git
//! failures, manifest loading problems (schema and shape), and consistency
//! violations found by the checks. Each category can offer a help message.

use crate::checks::Violation;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for release-index-check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Any fatal failure: bad input, repository failure or a violated check
  Failure = 1,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for release-index-check
#[derive(Debug)]
pub enum IndexError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Manifest could not be turned into a release index
  Index(LoadError),

  /// One or more consistency checks failed
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl IndexError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    IndexError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    IndexError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      IndexError::Message { message, context, help } => IndexError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      IndexError::Io(err) => IndexError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    ExitCode::Failure
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      IndexError::Config(e) => e.help_message(),
      IndexError::Git(e) => e.help_message(),
      IndexError::Index(e) => e.help_message(),
      IndexError::Validation(e) => e.help_message(),
      IndexError::Message { help, .. } => help.clone(),
      IndexError::Io(_) => None,
    }
  }
}

impl fmt::Display for IndexError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      IndexError::Config(e) => write!(f, "{}", e),
      IndexError::Git(e) => write!(f, "{}", e),
      IndexError::Index(e) => write!(f, "{}", e),
      IndexError::Validation(e) => write!(f, "{}", e),
      IndexError::Io(e) => write!(f, "I/O error: {}", e),
      IndexError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for IndexError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      IndexError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for IndexError {
  fn from(err: io::Error) -> Self {
    IndexError::Io(err)
  }
}

impl From<String> for IndexError {
  fn from(msg: String) -> Self {
    IndexError::message(msg)
  }
}

impl From<&str> for IndexError {
  fn from(msg: &str) -> Self {
    IndexError::message(msg)
  }
}

impl From<toml_edit::de::Error> for IndexError {
  fn from(err: toml_edit::de::Error) -> Self {
    IndexError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for IndexError {
  fn from(err: serde_json::Error) -> Self {
    IndexError::message(format!("JSON error: {}", err))
  }
}

impl From<serde_yaml::Error> for IndexError {
  fn from(err: serde_yaml::Error) -> Self {
    IndexError::message(format!("YAML error: {}", err))
  }
}

impl From<ConfigError> for IndexError {
  fn from(err: ConfigError) -> Self {
    IndexError::Config(err)
  }
}

impl From<GitError> for IndexError {
  fn from(err: GitError) -> Self {
    IndexError::Git(err)
  }
}

impl From<LoadError> for IndexError {
  fn from(err: LoadError) -> Self {
    IndexError::Index(err)
  }
}

impl From<ValidationError> for IndexError {
  fn from(err: ValidationError) -> Self {
    IndexError::Validation(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Missing required setting
  MissingField { field: String, hint: String },

  /// Setting present but unusable
  InvalidValue { field: String, value: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingField { hint, .. } => Some(hint.clone()),
      ConfigError::InvalidValue { .. } => {
        Some("Check release-index-check.toml and the command line flags.".to_string())
      }
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingField { field, .. } => {
        write!(f, "Missing required setting: {}", field)
      }
      ConfigError::InvalidValue { field, value, reason } => {
        write!(f, "Invalid value '{}' for {}: {}", value, field, reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Clone of the remote into the cache failed
  CloneFailed { remote: String, path: PathBuf, stderr: String },

  /// Branch required for membership checks is absent on the remote
  BranchNotFound { branch: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Point --repo-path at a git clone or set a remote so the cache can be created: {}",
        path.display()
      )),
      GitError::CloneFailed { .. } => Some("Check the remote URL and your network access.".to_string()),
      GitError::BranchNotFound { branch } => Some(format!(
        "Push branch '{}' to the remote or fix the rc_name in the release index.",
        branch
      )),
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("Could not resolve host") || stderr.contains("unable to access") {
          Some("Network access to the remote failed. Retry once connectivity is restored.".to_string())
        } else {
          None
        }
      }
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::CloneFailed { remote, path, stderr } => {
        write!(f, "Failed to clone {} into {}\n{}", remote, path.display(), stderr)
      }
      GitError::BranchNotFound { branch } => {
        write!(f, "Branch {} does not exist on the remote", branch)
      }
    }
  }
}

/// Errors raised while turning the manifest into a release index
#[derive(Debug)]
pub enum LoadError {
  /// Document does not match the release index schema
  SchemaViolation { messages: Vec<String> },

  /// Document is shaped correctly but cannot be typed
  MalformedIndex { reason: String },
}

impl LoadError {
  fn help_message(&self) -> Option<String> {
    match self {
      LoadError::SchemaViolation { .. } => {
        Some("Fix the release index so it matches release-index-schema.json.".to_string())
      }
      LoadError::MalformedIndex { .. } => {
        Some("RC names must look like rc--YYYY-MM-DD_HH-MM.".to_string())
      }
    }
  }
}

impl fmt::Display for LoadError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LoadError::SchemaViolation { messages } => {
        write!(f, "Schema validation failed:")?;
        for message in messages {
          write!(f, "\n  {}", message)?;
        }
        Ok(())
      }
      LoadError::MalformedIndex { reason } => write!(f, "Malformed release index: {}", reason),
    }
  }
}

/// Consistency violations surfaced by the check runner
#[derive(Debug)]
pub enum ValidationError {
  /// Fail-fast: the first violation found
  Violation(Violation),

  /// Batch mode: every violation found in the run
  Batch(Vec<Violation>),
}

impl ValidationError {
  /// Violations carried by this error
  pub fn violations(&self) -> &[Violation] {
    match self {
      ValidationError::Violation(v) => std::slice::from_ref(v),
      ValidationError::Batch(all) => all,
    }
  }

  fn help_message(&self) -> Option<String> {
    match self.violations() {
      [single] => single.help_message(),
      _ => Some("Rerun without --batch to stop at the first failure.".to_string()),
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::Violation(v) => write!(f, "{}", v),
      ValidationError::Batch(all) => {
        write!(f, "{} violation(s) found", all.len())?;
        for v in all {
          write!(f, "\n  - {}", v)?;
        }
        Ok(())
      }
    }
  }
}

/// Result type alias for release-index-check
pub type IndexResult<T> = Result<T, IndexError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> IndexResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> IndexResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<IndexError>,
{
  fn context(self, ctx: impl Into<String>) -> IndexResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> IndexResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr with help text
pub fn print_error(error: &IndexError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
