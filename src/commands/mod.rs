//! CLI commands for release-index-check
//!
//! - **check**: validate the release index against its schema and the repository
//! - **list**: show the registered checks

pub mod check;
pub mod list;

pub use check::run_check;
pub use list::run_list;
