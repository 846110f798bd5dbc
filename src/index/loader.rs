//! Manifest loading
//!
//! Reading is split in two so the schema precondition can run on the raw
//! document before any typing happens:
//!
//! 1. [`load_document`] reads YAML (or JSON) from disk into a `serde_json::Value`
//! 2. [`ReleaseIndex::from_document`] types a schema-valid document

use super::{Release, ReleaseIndex, Version};
use crate::core::error::{IndexResult, LoadError, ResultExt};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawIndex {
  releases: Vec<RawRelease>,
}

#[derive(Debug, Deserialize)]
struct RawRelease {
  rc_name: String,
  versions: Vec<Version>,
}

/// Read a manifest from disk
///
/// Files ending in `.json` are parsed as JSON, everything else as YAML.
pub fn load_document(path: &Path) -> IndexResult<Value> {
  let content =
    fs::read_to_string(path).with_context(|| format!("Failed to read release index from {}", path.display()))?;

  let is_json = path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

  if is_json {
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
  } else {
    parse_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
  }
}

/// Parse YAML text into a JSON value (the schema validator works on JSON)
pub fn parse_yaml(content: &str) -> IndexResult<Value> {
  Ok(serde_yaml::from_str(content)?)
}

impl ReleaseIndex {
  /// Build the typed index from a document that already passed schema validation
  ///
  /// Document order is preserved for releases and versions. Fails with
  /// `MalformedIndex` when required fields are missing or an RC name has no
  /// parseable timestamp.
  pub fn from_document(document: &Value) -> IndexResult<Self> {
    let raw = RawIndex::deserialize(document).map_err(|e| LoadError::MalformedIndex { reason: e.to_string() })?;

    let releases = raw
      .releases
      .into_iter()
      .map(|r| Release::new(r.rc_name, r.versions))
      .collect::<IndexResult<Vec<_>>>()?;

    tracing::debug!(releases = releases.len(), "built release index");
    Ok(ReleaseIndex::new(releases))
  }
}
