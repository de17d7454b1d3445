//! Enhanced logging utilities for formatted output.
//!
//! This module provides consistent, user-friendly logging utilities for counts,
//! percentages, timings and per-file scan summaries.

use std::time::{Duration, Instant};

use crate::scan::{FileReport, ReadCounts};

/// Formats a count with comma thousands separators.
///
/// # Examples
///
/// ```
/// use samtally_lib::logging::format_count;
///
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(123), "123");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    s.as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().map(|&b| char::from(b)).collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
}

/// Formats a percentage with specified decimal places.
///
/// # Arguments
///
/// * `value` - The fraction (0.0-1.0) to format as percentage
/// * `decimals` - Number of decimal places to include
///
/// # Examples
///
/// ```
/// use samtally_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(0.5, 1), "50.0%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a duration in human-readable form.
///
/// # Examples
///
/// ```
/// use samtally_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a rate (lines per second) with appropriate units.
///
/// # Examples
///
/// ```
/// use samtally_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 lines/s");
/// assert_eq!(format_rate(30, Duration::from_secs(60)), "30.0 lines/min");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} lines/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} lines/s", format_count(rate as u64))
    } else {
        let per_min = count as f64 / (secs / 60.0);
        format!("{per_min:.1} lines/min")
    }
}

/// Logs the read accounting of one scanned file.
#[allow(clippy::cast_precision_loss)]
pub fn log_read_summary(counts: &ReadCounts) {
    log::info!("Read Summary:");
    log::info!("  Header lines: {}", format_count(counts.header_lines));
    log::info!("  Alignment lines: {}", format_count(counts.data_lines));
    log::info!(
        "  Aligned reads: {} ({})",
        format_count(counts.aligned()),
        format_percent(counts.aligned_fraction(), 2)
    );
    log::info!("    Totally mapped: {}", format_count(counts.totally_mapped));
    log::info!("    Badly mapped: {}", format_count(counts.badly_mapped));
    log::info!("  Unmapped reads: {}", format_count(counts.unmapped));
    if counts.not_paired > 0 {
        log::info!("  Reads not paired: {}", format_count(counts.not_paired));
    }
    if counts.orphan_mates > 0 {
        log::info!("  Mates without a partner: {}", format_count(counts.orphan_mates));
    }
    if counts.unplaced_pairs > 0 {
        log::info!("  Pairs with both mates unmapped: {}", format_count(counts.unplaced_pairs));
    }
}

/// Logs the per-reference totals of a completed scan.
pub fn log_reference_summary(report: &FileReport) {
    log::info!("References observed: {}", report.references.len());
    for reference in &report.references {
        log::info!(
            "  {}: {} totally / {} badly mapped, {} pairs, {} substitutions",
            reference.name,
            format_count(reference.totally_mapped),
            format_count(reference.badly_mapped),
            format_count(reference.paired_total),
            format_count(reference.substitutions.len() as u64)
        );
    }
}

/// Operation timing and summary helper.
///
/// # Examples
///
/// ```no_run
/// use samtally_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Scanning input.sam");
///
/// // ... do work ...
///
/// timer.log_completion(10_000); // Log with line count
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with line count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} lines in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
