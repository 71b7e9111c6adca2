// src/pipeline/mod.rs

//! Pipeline entry points for the watcher operations.
//!
//! - `run_report`: one full report for a reference date
//! - `run_probe`: one change probe against the history
//! - `run_watch`: both schedules on one runtime, until ctrl-c

pub mod format;
pub mod parse;
pub mod probe;
pub mod report;
pub mod watch;

pub use format::{format_snapshot, render_block};
pub use parse::{ParseOutcome, parse_snapshot};
pub use probe::run_probe;
pub use report::run_report;
pub use watch::run_watch;
