//! Row progress reporting and cooperative cancellation.
//!
//! Matchers call [`RowObserver::should_cancel`] before starting a row and
//! [`RowObserver::on_row`] after finishing it. In parallel mode rows finish
//! out of order and the callbacks run on worker threads, hence the `Sync`
//! bound.

use crate::trace::trace_debug;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Receives per-row progress and may request cancellation.
pub trait RowObserver: Sync {
    /// Called after `row` (0-based) of `rows_total` has been written.
    fn on_row(&self, row: usize, rows_total: usize) {
        let _ = (row, rows_total);
    }

    /// Returning true aborts the computation with
    /// [`StereoError::Cancelled`](crate::StereoError::Cancelled).
    fn should_cancel(&self) -> bool {
        false
    }
}

/// Observer that ignores progress and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl RowObserver for NoProgress {}

/// Cancellation switch that can be flipped from another thread.
#[derive(Debug, Default)]
pub struct CancelFlag {
    cancelled: AtomicBool,
}

impl CancelFlag {
    /// Creates a flag in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; rows already started still complete.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true once [`CancelFlag::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl RowObserver for CancelFlag {
    fn should_cancel(&self) -> bool {
        self.is_cancelled()
    }
}

/// Counts finished rows and emits a `row_done` debug event for each.
#[derive(Debug, Default)]
pub struct TracingProgress {
    completed: AtomicUsize,
}

impl TracingProgress {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows reported so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }
}

impl RowObserver for TracingProgress {
    fn on_row(&self, row: usize, rows_total: usize) {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        trace_debug!("row_done", row = row, completed = completed, rows = rows_total);
    }
}

/// Adapts a closure into a progress-only observer.
pub struct RowCallback<F>(pub F);

impl<F> RowObserver for RowCallback<F>
where
    F: Fn(usize, usize) + Sync,
{
    fn on_row(&self, row: usize, rows_total: usize) {
        (self.0)(row, rows_total)
    }
}

#[cfg(test)]
mod tests {
    use super::{CancelFlag, RowObserver, TracingProgress};

    #[test]
    fn cancel_flag_flips_once() {
        let flag = CancelFlag::new();
        assert!(!flag.should_cancel());
        flag.cancel();
        assert!(flag.should_cancel());
    }

    #[test]
    fn tracing_progress_counts_rows() {
        let progress = TracingProgress::new();
        for row in 0..5 {
            progress.on_row(row, 5);
        }
        assert_eq!(progress.completed(), 5);
    }
}
