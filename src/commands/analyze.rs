//! Validate SAM files and report per-reference alignment statistics.
//!
//! Each input is scanned independently. For every reference with mapped reads a text
//! report and a substitution TSV are written, plus a per-file reference summary TSV.

use std::path::PathBuf;

use ahash::AHashSet;
use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{error, info, warn};
use samtally_lib::logging::{OperationTimer, log_read_summary, log_reference_summary};
use samtally_lib::report::write_reports;
use samtally_lib::scan::{ScanOutcome, scan_path};

use crate::commands::command::Command;
use crate::commands::common::{OnError, SamInputOptions, default_prefix};

/// Validate SAM records and compute per-reference statistics.
#[derive(Debug, Parser)]
#[command(
    name = "analyze",
    about = "\x1b[38;5;72m[ANALYSIS]\x1b[0m       \x1b[36mValidate SAM files and report per-reference statistics\x1b[0m",
    long_about = r#"
Validate SAM files and report per-reference alignment statistics.

Every alignment line is checked against the SAM grammar for its eleven mandatory fields.
Valid lines are classified as unmapped, badly mapped or totally mapped (a single M
operation), and the following are computed for each reference sequence:

  - nucleotides per CIGAR operation
  - mate-pair mapping combinations, matching mates by read name
  - gap or overlap between the two reads of each fragment
  - substitutions from the MD tag of totally mapped reads, with base-call accuracy and
    the amino-acid change in three reading frames

At the first invalid line of a file the tool asks whether to stop, or to keep scanning
the file to list every error without producing statistics. --on-error answers the
question in advance for non-interactive use.

Outputs, for each input with prefix P (default: input file name without extension):
  <output-dir>/P_<reference>.txt                  text report
  <output-dir>/P_<reference>.substitutions.tsv    one row per substitution
  <output-dir>/P.references.tsv                   one row per reference

Example usage:
  samtally analyze -i sample.sam
  samtally analyze -i a.sam b.sam.gz -o first second --output-dir reports --on-error abort
"#
)]
pub struct Analyze {
    /// Input SAM options
    #[command(flatten)]
    pub io: SamInputOptions,

    /// Output prefix for each input, in input order
    #[arg(short = 'o', long = "output", num_args = 1..)]
    pub output: Vec<String>,

    /// Directory receiving the reports
    #[arg(long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Action at the first invalid alignment line of a file
    #[arg(long = "on-error", value_enum, default_value_t = OnError::Prompt)]
    pub on_error: OnError,

    /// Do not log progress through each input
    #[arg(long = "no-progress", default_value = "false")]
    pub no_progress: bool,
}

impl Analyze {
    fn prefixes(&self) -> Result<Vec<String>> {
        let prefixes = if self.output.is_empty() {
            self.io.input.iter().map(|p| default_prefix(p)).collect()
        } else if self.output.len() == self.io.input.len() {
            self.output.clone()
        } else {
            bail!(
                "--output was given {} prefix(es) for {} input(s); give one per input or none",
                self.output.len(),
                self.io.input.len()
            );
        };

        let mut seen = AHashSet::new();
        for (prefix, input) in prefixes.iter().zip(&self.io.input) {
            if !seen.insert(prefix.as_str()) {
                bail!(
                    "Output prefix '{prefix}' (for {}) is used by more than one input; give distinct prefixes with --output",
                    input.display()
                );
            }
        }
        Ok(prefixes)
    }
}

impl Command for Analyze {
    fn execute(&self, _command_line: &str) -> Result<()> {
        self.io.validate()?;
        let prefixes = self.prefixes()?;
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.output_dir.display())
        })?;

        info!("Starting Analyze");
        info!("Inputs: {}", self.io.input.len());
        info!("Output directory: {}", self.output_dir.display());
        info!("On error: {:?}", self.on_error);

        let mut reported = 0usize;
        for (input, prefix) in self.io.input.iter().zip(&prefixes) {
            let timer = OperationTimer::new(&format!("Analyzing {}", input.display()));
            let mut gate = self.on_error.gate();
            let outcome = match scan_path(input, gate.as_mut(), !self.no_progress) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("{}: {e:#}; no statistics written", input.display());
                    continue;
                }
            };

            match outcome {
                ScanOutcome::Completed(report) => {
                    log_read_summary(&report.counts);
                    log_reference_summary(&report);
                    let outputs = write_reports(input, &report, &self.output_dir, prefix)?;
                    for reference in &outputs.references {
                        info!("Wrote {}", reference.text.display());
                        info!("Wrote {}", reference.substitutions.display());
                    }
                    info!("Wrote {}", outputs.summary.display());
                    timer.log_completion(report.counts.header_lines + report.counts.data_lines);
                    reported += 1;
                }
                ScanOutcome::ErrorResearch { lines, invalid_lines, field_errors } => {
                    warn!(
                        "{}: {invalid_lines} invalid line(s) with {field_errors} field error(s) in {lines} lines; no statistics written",
                        input.display()
                    );
                    timer.log_completion(lines);
                }
                ScanOutcome::Aborted { line_number, error_count } => {
                    warn!(
                        "{}: aborted at line {line_number} ({error_count} field error(s)); no statistics written",
                        input.display()
                    );
                }
                ScanOutcome::NoAnalyzableReads(counts) => {
                    log_read_summary(&counts);
                    error!("{}: no valid mapped reads to analyze", input.display());
                }
            }
        }

        if reported == 0 {
            bail!("None of the {} input(s) produced statistics", self.io.input.len());
        }
        info!("Reported statistics for {reported} of {} input(s)", self.io.input.len());
        Ok(())
    }
}
