//! Console output: status lines and progress bars

pub mod progress;
pub mod status;
