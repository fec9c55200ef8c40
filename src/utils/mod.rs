// Utility functions and helpers
//
// This module provides progress reporting used by long-running rebuilds.

pub mod progress_report;

pub use progress_report::{ProgressState, ProgressReportFn};
