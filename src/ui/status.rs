//! Colored status lines for check results
//!
//! Green for success, yellow for warnings, red for errors. Color is only used
//! when stdout is a terminal and `NO_COLOR` is unset.

use crate::checks::{CheckResult, Severity};
use anstyle::{AnsiColor, Style};
use std::io::IsTerminal;

/// Prints one line per finding
#[derive(Debug, Clone, Copy)]
pub struct StatusPrinter {
  color: bool,
  quiet: bool,
}

impl StatusPrinter {
  /// Detect color support from the environment
  pub fn detect() -> Self {
    let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    Self { color, quiet: false }
  }

  /// A printer that prints nothing (JSON output mode)
  pub fn quiet() -> Self {
    Self {
      color: false,
      quiet: true,
    }
  }

  pub fn info(&self, message: &str) {
    self.line(None, message);
  }

  pub fn success(&self, message: &str) {
    self.line(Some(AnsiColor::Green), message);
  }

  pub fn warn(&self, message: &str) {
    self.line(Some(AnsiColor::Yellow), message);
  }

  pub fn error(&self, message: &str) {
    self.line(Some(AnsiColor::Red), message);
  }

  /// Print a check result: warnings first, then errors or the success message
  pub fn report(&self, result: &CheckResult) {
    for advisory in &result.advisories {
      self.warn(&advisory.to_string());
    }
    match result.severity() {
      Severity::Error => {
        for violation in &result.violations {
          self.error(&violation.to_string());
        }
      }
      Severity::Warning | Severity::Info => self.success(&result.message),
    }
  }

  fn line(&self, color: Option<AnsiColor>, message: &str) {
    if self.quiet {
      return;
    }
    println!("{}", self.paint(color, message));
  }

  fn paint(&self, color: Option<AnsiColor>, message: &str) -> String {
    match color {
      Some(color) if self.color => {
        let style = Style::new().fg_color(Some(color.into()));
        format!("{}{}{}", style.render(), message, style.render_reset())
      }
      _ => message.to_string(),
    }
  }
}
