//! Release index consistency checks
//!
//! Every rule implements the `Check` trait and is registered, in order, by
//! `create_default_runner()`.
//!
//! # Built-in Checks
//!
//! Manifest stage:
//! - **base-version**: every release declares a `base` version
//! - **unique-version-names**: version names are unique within a release
//! - **rc-order**: releases are listed newest first
//!
//! Repository stage:
//! - **commit-existence**: every version resolves to a commit
//! - **branch-membership**: every commit is on its RC branch
//! - **tag-consistency**: existing release tags point at the declared commits
//!
//! # Example
//!
//! ```rust,ignore
//! let runner = create_default_runner();
//! let ctx = CheckContext::manifest(&index, ReportMode::FailFast);
//! let results = runner.run_stage(Stage::Manifest, &ctx, |r| println!("{}", r.check_name))?;
//! ```

mod base_version;
mod branch_membership;
mod commit_existence;
mod rc_order;
mod runner;
mod tag_consistency;
mod trait_def;
mod unique_names;

// Re-export public API
pub use runner::{collect_violations, create_default_runner};
pub use trait_def::{CheckContext, CheckResult, ReportMode, Severity, Stage, Violation};

// Individual checks are not exported - they're registered in create_default_runner()
