//! Streaming scan of one SAM file.
//!
//! Lines are processed strictly in order. Header lines are interpreted for the report;
//! alignment lines are validated and, when every mandatory field passes, classified and
//! folded into the per-reference aggregator.
//!
//! The first invalid alignment line consults an [`ErrorGate`] exactly once. The gate may
//! abort the file, or switch the scan to report-only mode: the remaining lines are still
//! validated and their errors logged, but nothing more is aggregated and no statistics
//! are produced for the file.

use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use fgoxide::io::Io;
use log::{debug, warn};

use crate::aggregator::{ReferenceAggregator, ReferenceSummary};
use crate::mismatch::call_substitutions;
use crate::pairs::{PairClassifier, PairEvent, gap_overlap_bucket};
use crate::progress::ByteProgress;
use crate::sam::cigar::{Cigar, MappingStatus};
use crate::sam::flags::FlagBits;
use crate::sam::header::{HeaderRecord, interpret_header};
use crate::sam::record::{AlignmentRecord, split_fields};
use crate::sam::validator::RecordValidator;
use crate::validation::validate_sam_input;

/// Answer to the first invalid line of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Stop reading the file immediately.
    Abort,
    /// Keep validating the rest of the file to report every error, then stop.
    ReportOnly,
}

/// Decides what happens after the first invalid alignment line of a file.
///
/// Called at most once per file with the number of failing fields on that line and its
/// 1-based line number.
pub trait ErrorGate {
    fn on_first_error(&mut self, error_count: usize, line_number: u64) -> GateDecision;
}

impl ErrorGate for GateDecision {
    fn on_first_error(&mut self, _error_count: usize, _line_number: u64) -> GateDecision {
        *self
    }
}

impl<F> ErrorGate for F
where
    F: FnMut(usize, u64) -> GateDecision,
{
    fn on_first_error(&mut self, error_count: usize, line_number: u64) -> GateDecision {
        self(error_count, line_number)
    }
}

/// File-level read accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadCounts {
    /// Lines starting with `@`.
    pub header_lines: u64,
    /// Non-empty alignment lines, valid or not.
    pub data_lines: u64,
    pub unmapped: u64,
    pub badly_mapped: u64,
    pub totally_mapped: u64,
    /// Reads flagged neither first nor last segment.
    pub not_paired: u64,
    /// Mates whose partner never appeared.
    pub orphan_mates: u64,
    /// Completed pairs with both mates unmapped, which belong to no reference.
    pub unplaced_pairs: u64,
}

impl ReadCounts {
    /// Totally plus badly mapped reads.
    #[must_use]
    pub fn aligned(&self) -> u64 {
        self.totally_mapped + self.badly_mapped
    }

    /// Aligned reads as a fraction of alignment lines.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aligned_fraction(&self) -> f64 {
        if self.data_lines == 0 { 0.0 } else { self.aligned() as f64 / self.data_lines as f64 }
    }
}

/// Statistics of a fully analyzed file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub headers: Vec<HeaderRecord>,
    pub counts: ReadCounts,
    /// One summary per reference, in first-seen order.
    pub references: Vec<ReferenceSummary>,
}

/// How a scan ended.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Completed(FileReport),
    /// The gate chose report-only; the whole file was validated, nothing was reported.
    ErrorResearch { lines: u64, invalid_lines: u64, field_errors: u64 },
    /// The gate chose to stop at the first invalid line.
    Aborted { line_number: u64, error_count: usize },
    /// No valid mapped read was found.
    NoAnalyzableReads(ReadCounts),
}

#[derive(Debug, Default)]
struct ErrorTally {
    invalid_lines: u64,
    field_errors: u64,
}

/// Per-file scan state.
#[derive(Debug, Default)]
struct FileScanner {
    validator: RecordValidator,
    aggregator: ReferenceAggregator,
    pairs: PairClassifier,
    counts: ReadCounts,
    headers: Vec<HeaderRecord>,
    errors: ErrorTally,
    report_only: bool,
    line_number: u64,
}

impl FileScanner {
    /// Handles one line. Returns an outcome only when the gate aborts the scan.
    fn process_line<G: ErrorGate + ?Sized>(
        &mut self,
        line: &str,
        gate: &mut G,
    ) -> Result<Option<ScanOutcome>> {
        self.line_number += 1;
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            return Ok(None);
        }

        let fields = split_fields(line);
        if line.starts_with('@') {
            self.counts.header_lines += 1;
            match interpret_header(&fields) {
                Some(header) => self.headers.push(header),
                None => warn!(
                    "Line {}: unrecognised header record '{}' skipped",
                    self.line_number, fields[0]
                ),
            }
            return Ok(None);
        }

        self.counts.data_lines += 1;
        let report = self.validator.validate(&fields);
        if !report.is_valid() {
            report.log_failures(self.line_number, line);
            self.errors.invalid_lines += 1;
            self.errors.field_errors += report.error_count() as u64;
            if !self.report_only {
                match gate.on_first_error(report.error_count(), self.line_number) {
                    GateDecision::Abort => {
                        return Ok(Some(ScanOutcome::Aborted {
                            line_number: self.line_number,
                            error_count: report.error_count(),
                        }));
                    }
                    GateDecision::ReportOnly => self.report_only = true,
                }
            }
            return Ok(None);
        }
        if self.report_only {
            return Ok(None);
        }

        let record = AlignmentRecord::from_fields(&fields)
            .with_context(|| format!("Failed to read alignment on line {}", self.line_number))?;
        self.analyze(&record)
            .with_context(|| format!("Failed to analyze alignment on line {}", self.line_number))?;
        Ok(None)
    }

    /// Folds a valid record into the statistics.
    fn analyze(&mut self, record: &AlignmentRecord<'_>) -> Result<()> {
        let flags = FlagBits::from_value(record.flag);
        let cigar = Cigar::parse(record.cigar)?;
        let status = if flags.is_unmapped() || record.rname == "*" {
            MappingStatus::Unmapped
        } else {
            cigar.classify()
        };

        let reference = match status {
            MappingStatus::Unmapped => {
                self.counts.unmapped += 1;
                None
            }
            MappingStatus::BadlyMapped => {
                self.counts.badly_mapped += 1;
                Some(record.rname)
            }
            MappingStatus::TotallyMapped => {
                self.counts.totally_mapped += 1;
                Some(record.rname)
            }
        };

        if let Some(name) = reference {
            let bucket = self.aggregator.bucket_mut(name);
            bucket.record_read(status, &cigar);

            if let Some(aligned_len) = cigar.perfect_match_len() {
                match call_substitutions(record, aligned_len) {
                    Ok(substitutions) => bucket.add_substitutions(substitutions),
                    Err(e) => warn!("Line {}: {e}; substitutions skipped", self.line_number),
                }
            }

            let primary = !flags.is_secondary() && !flags.is_supplementary();
            if primary && !flags.is_mate_unmapped() && record.mate_on_same_reference() {
                if let Some(b) = gap_overlap_bucket(record.tlen, cigar.read_len()) {
                    bucket.record_gap_overlap(b);
                }
            }
        }

        match self.pairs.observe(record.qname, &flags, status, reference) {
            PairEvent::Completed { status, reference: Some(name) } => {
                self.aggregator.bucket_mut(&name).record_pair(status);
            }
            PairEvent::Completed { status, reference: None } => {
                debug!("Pair {} ({status}) has no mapped mate", record.qname);
                self.counts.unplaced_pairs += 1;
            }
            PairEvent::Ignored | PairEvent::NotPaired | PairEvent::Pending => {}
        }
        Ok(())
    }

    fn finish(mut self) -> ScanOutcome {
        if self.report_only {
            return ScanOutcome::ErrorResearch {
                lines: self.line_number,
                invalid_lines: self.errors.invalid_lines,
                field_errors: self.errors.field_errors,
            };
        }
        self.counts.not_paired = self.pairs.not_paired();
        self.counts.orphan_mates = self.pairs.pending() as u64;
        if self.aggregator.is_empty() {
            return ScanOutcome::NoAnalyzableReads(self.counts);
        }
        ScanOutcome::Completed(FileReport {
            headers: self.headers,
            counts: self.counts,
            references: self.aggregator.finalize(),
        })
    }
}

/// Scans SAM text from a reader.
///
/// # Errors
///
/// Returns an error if the input cannot be read. Bytes that are not valid UTF-8 are
/// replaced with U+FFFD, which no mandatory field grammar accepts.
pub fn scan<R: BufRead, G: ErrorGate + ?Sized>(
    mut reader: R,
    gate: &mut G,
    progress: Option<&ByteProgress>,
) -> Result<ScanOutcome> {
    let mut scanner = FileScanner::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read line {}", scanner.line_number + 1))?;
        if n == 0 {
            break;
        }
        if let Some(progress) = progress {
            progress.log_if_needed(n as u64);
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(outcome) = scanner.process_line(&line, gate)? {
            return Ok(outcome);
        }
    }
    if let Some(progress) = progress {
        progress.log_final();
    }
    Ok(scanner.finish())
}

/// Checks and opens a SAM file, then scans it.
///
/// Plain and gzip-compressed (`.sam.gz`) inputs are both accepted. When `show_progress`
/// is set, progress is logged at every 10% of the file size.
///
/// # Errors
///
/// Returns an error if the file is rejected at intake or cannot be read.
pub fn scan_path<P: AsRef<Path>, G: ErrorGate + ?Sized>(
    path: P,
    gate: &mut G,
    show_progress: bool,
) -> Result<ScanOutcome> {
    let path = path.as_ref();
    let size = validate_sam_input(path, "Input SAM")?;
    let reader = Io::default()
        .new_reader(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let progress =
        show_progress.then(|| ByteProgress::new(format!("Scanned {}:", path.display()), size));
    scan(reader, gate, progress.as_ref())
}
