//! Progress tracking utilities
//!
//! Reports how far a scan has read through its input as a percentage of the file size,
//! logging each time a milestone is crossed.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

/// Byte-based progress tracker that logs at percentage milestones.
///
/// # Example
/// ```
/// use samtally_lib::progress::ByteProgress;
///
/// let progress = ByteProgress::new("Scanned input.sam", 1_000).with_step(25);
///
/// for _ in 0..10 {
///     progress.log_if_needed(100); // Logs at 25%, 50%, 75%, 100%
/// }
/// progress.log_final();
/// ```
pub struct ByteProgress {
    /// Expected number of bytes; milestones are fractions of this.
    total_bytes: u64,
    /// Percentage between two logged milestones.
    step: u64,
    /// Message prefix for log output.
    message: String,
    /// Bytes consumed so far.
    count: AtomicU64,
}

impl ByteProgress {
    /// Create a tracker for an input of `total_bytes`, logging every 10% by default.
    #[must_use]
    pub fn new(message: impl Into<String>, total_bytes: u64) -> Self {
        Self { total_bytes, step: 10, message: message.into(), count: AtomicU64::new(0) }
    }

    /// Set the percentage step between milestones (clamped to 1..=100).
    #[must_use]
    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step.clamp(1, 100);
        self
    }

    /// Completed percentage for a byte count, capped at 100 (compressed inputs yield
    /// more bytes than their size on disk).
    #[allow(clippy::cast_possible_truncation)]
    fn percent(&self, bytes: u64) -> u64 {
        if self.total_bytes == 0 {
            return 100;
        }
        (u128::from(bytes) * 100 / u128::from(self.total_bytes)).min(100) as u64
    }

    /// Add consumed bytes and log every milestone crossed.
    ///
    /// Returns `true` if the tracker has reached 100%.
    pub fn log_if_needed(&self, additional: u64) -> bool {
        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let new_count = prev + additional;

        let prev_milestones = self.percent(prev) / self.step;
        let new_milestones = self.percent(new_count) / self.step;
        for i in (prev_milestones + 1)..=new_milestones {
            info!("{} {}%", self.message, i * self.step);
        }

        self.percent(new_count) >= 100
    }

    /// Log the final byte count if the last milestone was never reached.
    pub fn log_final(&self) {
        let count = self.count();
        if self.percent(count) < 100 && count > 0 {
            info!("{} {} bytes (complete)", self.message, count);
        }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
