//! `release-index-check list` - show the registered checks

use crate::checks::{Stage, create_default_runner};
use crate::core::error::{IndexError, IndexResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CheckInfo {
  name: &'static str,
  stage: Stage,
  description: &'static str,
}

/// Run the list command
pub fn run_list(json: bool) -> IndexResult<()> {
  let runner = create_default_runner();
  let checks: Vec<CheckInfo> = runner
    .checks()
    .iter()
    .map(|c| CheckInfo {
      name: c.name(),
      stage: c.stage(),
      description: c.description(),
    })
    .collect();

  if json {
    let output = serde_json::to_string_pretty(&checks)
      .map_err(|e| IndexError::message(format!("Failed to serialize JSON: {}", e)))?;
    println!("{}", output);
    return Ok(());
  }

  println!("📋 Registered checks (in run order):");
  for check in &checks {
    println!("   • {} [{}]: {}", check.name, check.stage, check.description);
  }

  Ok(())
}
