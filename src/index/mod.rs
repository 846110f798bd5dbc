//! Release index data model
//!
//! The release index is the manifest listing every release candidate (RC), newest
//! first, together with the component versions that make it up.
//!
//! # Invariants
//!
//! The model only guarantees what the loader can prove on its own: document order
//! is preserved and every `rc_name` carries a parseable timestamp. Everything else
//! (base version, unique names, ordering, repository state) is the job of the
//! checks in [`crate::checks`].
//!
//! # Example manifest
//!
//! ```yaml
//! releases:
//!   - rc_name: rc--2024-01-03_00-00
//!     versions:
//!       - name: base
//!         version: 2b2f1a6e2c1e0c2f5d8d7f0a3b4c5d6e7f8a9b0c
//!       - name: hotfix-ledger
//!         version: 9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b
//! ```

pub mod loader;
pub mod schema;

use crate::core::error::{IndexResult, LoadError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Conventional prefix of RC names (and RC branches)
pub const RC_PREFIX: &str = "rc--";

/// Name of the version every release must declare
pub const BASE_VERSION_NAME: &str = "base";

/// Timestamp layout embedded in RC names after the prefix
pub const RC_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

/// Point in time encoded in an RC name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RcTimestamp(NaiveDateTime);

impl RcTimestamp {
  /// Parse the timestamp out of an RC name, stripping the `rc--` prefix if present
  pub fn from_rc_name(rc_name: &str) -> IndexResult<Self> {
    let raw = strip_rc_prefix(rc_name);
    NaiveDateTime::parse_from_str(raw, RC_TIMESTAMP_FORMAT)
      .map(Self)
      .map_err(|e| {
        LoadError::MalformedIndex {
          reason: format!(
            "RC name '{}' does not carry a {} timestamp: {}",
            rc_name, RC_TIMESTAMP_FORMAT, e
          ),
        }
        .into()
      })
  }
}

impl fmt::Display for RcTimestamp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format(RC_TIMESTAMP_FORMAT))
  }
}

/// Strip the conventional `rc--` prefix
pub fn strip_rc_prefix(rc_name: &str) -> &str {
  rc_name.strip_prefix(RC_PREFIX).unwrap_or(rc_name)
}

/// One component version inside a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
  /// Label unique within the release (`base` is reserved)
  pub name: String,
  /// Git commit-ish backing this version
  pub version: String,
}

impl Version {
  pub fn is_base(&self) -> bool {
    self.name == BASE_VERSION_NAME
  }
}

/// A release candidate and its versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
  pub rc_name: String,
  pub timestamp: RcTimestamp,
  pub versions: Vec<Version>,
}

impl Release {
  /// Build a release, parsing the RC timestamp once
  pub fn new(rc_name: impl Into<String>, versions: Vec<Version>) -> IndexResult<Self> {
    let rc_name = rc_name.into();
    let timestamp = RcTimestamp::from_rc_name(&rc_name)?;
    Ok(Self {
      rc_name,
      timestamp,
      versions,
    })
  }

  /// Name of the tag expected for `version` in this release:
  /// `release-<rc_name without rc-->-<version name>`
  pub fn tag_name(&self, version: &Version) -> String {
    format!("release-{}-{}", strip_rc_prefix(&self.rc_name), version.name)
  }
}

/// Ordered, immutable list of releases (document order, expected newest first)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseIndex {
  releases: Vec<Release>,
}

impl ReleaseIndex {
  pub fn new(releases: Vec<Release>) -> Self {
    Self { releases }
  }

  pub fn releases(&self) -> &[Release] {
    &self.releases
  }

  /// Total number of versions across all releases
  pub fn version_count(&self) -> usize {
    self.releases.iter().map(|r| r.versions.len()).sum()
  }

  /// RC branch names in document order, without duplicates
  pub fn rc_names(&self) -> Vec<String> {
    let mut seen = HashSet::new();
    self
      .releases
      .iter()
      .filter(|r| seen.insert(r.rc_name.as_str()))
      .map(|r| r.rc_name.clone())
      .collect()
  }

  /// Iterate `(release, version)` pairs in document order
  pub fn versions(&self) -> impl Iterator<Item = (&Release, &Version)> {
    self
      .releases
      .iter()
      .flat_map(|release| release.versions.iter().map(move |version| (release, version)))
  }
}
