//! Progress indicators for long-running repository operations
//!
//! Uses `linya` for allocation-free progress bars drawn on stderr

use linya::{Bar, Progress};
use std::io::IsTerminal;

/// Progress bar for syncing RC branches into the cache
pub struct BranchProgress {
  progress: Progress,
  bar: Bar,
}

impl BranchProgress {
  /// Create a new progress bar
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Progress bar only when stderr is a terminal (CI logs stay clean)
  pub fn for_terminal(total: usize, label: impl Into<String>) -> Option<Self> {
    (total > 0 && std::io::stderr().is_terminal()).then(|| Self::new(total, label))
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
