//! Shared accumulator of per-file outcomes.
//!
//! Workers report into their own pre-allocated slot. The lock only ever
//! guards the slot write and the counter bump, never any I/O.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use chrono::{DateTime, Utc};
use podcopy_protocol::{BatchUploadResult, FileUploadResult};
use tracing::warn;

/// Error recorded for a file whose worker never reported.
pub const NOT_REPORTED: &str = "upload task did not report";

/// Pre-sized, index-aligned result list plus running counters.
pub struct Aggregator {
    state: Mutex<State>,
}

struct State {
    files: Vec<FileUploadResult>,
    reported: Vec<bool>,
    success_count: usize,
    failure_count: usize,
}

impl Aggregator {
    /// Allocates one slot per `(name, size)` pair, in input order.
    pub fn new<'a>(items: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        let files: Vec<FileUploadResult> = items
            .into_iter()
            .map(|(name, size)| FileUploadResult::failed(name, size, NOT_REPORTED))
            .collect();
        let reported = vec![false; files.len()];
        Self {
            state: Mutex::new(State {
                files,
                reported,
                success_count: 0,
                failure_count: 0,
            }),
        }
    }

    /// Stores the outcome of file `index` and updates the counters.
    ///
    /// Each slot accepts exactly one report; later reports are ignored.
    pub fn record(&self, index: usize, result: FileUploadResult) {
        let mut s = self.lock();
        match s.reported.get(index) {
            Some(false) => {}
            Some(true) => {
                warn!(index, "duplicate report ignored");
                return;
            }
            None => {
                warn!(index, slots = s.files.len(), "report for unknown slot ignored");
                return;
            }
        }
        if result.is_done() {
            s.success_count += 1;
        } else {
            s.failure_count += 1;
        }
        s.reported[index] = true;
        s.files[index] = result;
    }

    /// Freezes the aggregate into the final result.
    ///
    /// Consumes the aggregator, so it can only happen once, after every
    /// worker has been joined. Slots that were never reported keep their
    /// error placeholder and count as failures.
    pub fn finish(self, start_time: DateTime<Utc>, started: Instant) -> BatchUploadResult {
        let s = self.state.into_inner().unwrap_or_else(|e| e.into_inner());
        let unreported = s.reported.iter().filter(|r| !**r).count();
        BatchUploadResult {
            total_files: s.files.len(),
            success_count: s.success_count,
            failure_count: s.failure_count + unreported,
            files: s.files,
            duration: started.elapsed(),
            start_time,
            end_time: Utc::now(),
        }
    }

    /// Moves the recorded state into a new aggregator, leaving this one
    /// with no slots. Used when a shared handle cannot be unwrapped.
    pub(crate) fn take(&self) -> Self {
        let mut s = self.lock();
        let state = State {
            files: std::mem::take(&mut s.files),
            reported: std::mem::take(&mut s.reported),
            success_count: std::mem::take(&mut s.success_count),
            failure_count: std::mem::take(&mut s.failure_count),
        };
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
