//! Schema precondition for the release index
//!
//! The manifest must match a fixed JSON schema before anything else looks at it.
//! All schema errors are collected so the author sees every problem at once.

use crate::core::error::{IndexError, IndexResult, LoadError, ResultExt};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read and parse a JSON schema document
pub fn load_schema(path: &Path) -> IndexResult<Value> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read schema from {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("Failed to parse schema {}", path.display()))
}

/// Validate a manifest document against a schema
///
/// Returns `SchemaViolation` listing every error reported by the validator.
pub fn validate_document(document: &Value, schema: &Value) -> IndexResult<()> {
  let validator = jsonschema::validator_for(schema)
    .map_err(|e| IndexError::with_help(format!("Invalid schema: {}", e), "Fix the schema document itself"))?;

  let messages: Vec<String> = validator.iter_errors(document).map(|e| e.to_string()).collect();

  if messages.is_empty() {
    Ok(())
  } else {
    tracing::debug!(errors = messages.len(), "schema validation failed");
    Err(LoadError::SchemaViolation { messages }.into())
  }
}
