//! Core building blocks shared by every command
//!
//! - **config**: release-index-check.toml parsing and validation
//! - **context**: settings resolved once per run (CLI > env > config > default)
//! - **error**: error types with contextual help messages
//! - **vcs**: repository access (`RepositoryAccessor`, `SystemGit`)

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
