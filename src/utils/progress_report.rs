//! Progress reporting for long-running operations.
//!
//! Rebuilding an index scans the whole source corpus. Callers may pass a
//! reporter to receive periodic updates and optionally cancel the rebuild.
//!
//! # Examples
//!
//! ```
//! use dictrie::utils::progress_report::{ProgressState, ProgressReportFn};
//!
//! fn my_reporter(state: &mut ProgressState) -> bool {
//!     println!("{}: {}/{}", state.state_id, state.current, state.total);
//!     false // Return true to cancel the operation
//! }
//!
//! let mut progress = ProgressState::new("indexing", 100, 10, Some(my_reporter));
//! for i in 0..=100 {
//!     if progress.report(i) {
//!         break;
//!     }
//! }
//! ```

/// Function type for progress reporting callbacks.
///
/// Receives the progress state and returns `true` to cancel the operation.
pub type ProgressReportFn = fn(&mut ProgressState) -> bool;

/// State information for progress reporting.
pub struct ProgressState {
    /// Identifier for this progress state (e.g., "indexing")
    pub state_id: String,
    /// Total amount of work, in the caller's unit (bytes for indexing)
    pub total: u64,
    /// Work done at the last report
    pub current: u64,
    /// Work done when the reporter was last called
    pub last: u64,
    /// Minimum amount of work between two reports
    pub report_interval: u64,
    pub reporter: Option<ProgressReportFn>,
}

impl ProgressState {
    /// Creates a new progress state reporting roughly every
    /// `report_interval_percent` percent of `total`.
    pub fn new(state_id: &str, total: u64, report_interval_percent: u64, reporter: Option<ProgressReportFn>) -> Self {
        Self {
            state_id: state_id.to_string(),
            total,
            current: 0,
            last: 0,
            report_interval: total.saturating_mul(report_interval_percent.min(100)) / 100,
            reporter,
        }
    }

    /// Records progress up to `current` and calls the reporter when the
    /// interval has elapsed or the work is complete.
    ///
    /// Returns `true` if the operation should be cancelled.
    pub fn report(&mut self, current: u64) -> bool {
        let Some(reporter) = self.reporter else {
            return false;
        };
        let finished = current >= self.total;
        if current.saturating_sub(self.last) >= self.report_interval.max(1) || finished {
            self.current = current;
            let cancelled = reporter(self);
            self.last = current;
            return cancelled;
        }
        false
    }
}
