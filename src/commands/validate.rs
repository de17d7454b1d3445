//! Check SAM files against the record grammar without computing statistics.

use anyhow::{Result, bail};
use clap::Parser;
use log::{error, info, warn};
use samtally_lib::logging::{OperationTimer, format_count};
use samtally_lib::scan::{GateDecision, ScanOutcome, scan_path};

use crate::commands::command::Command;
use crate::commands::common::SamInputOptions;

/// Validate every alignment line of one or more SAM files.
#[derive(Debug, Parser)]
#[command(
    name = "validate",
    about = "\x1b[38;5;72m[ANALYSIS]\x1b[0m       \x1b[36mCheck SAM records against the format grammar\x1b[0m",
    long_about = r#"
Check every alignment line of one or more SAM files against the SAM grammar.

Each failing mandatory field is logged with its line number, value and the full record.
The whole file is always scanned; no reports are written. The command fails if any input
contains an invalid line.

Example usage:
  samtally validate -i sample.sam
  samtally validate -i a.sam b.sam.gz
"#
)]
pub struct Validate {
    /// Input SAM options
    #[command(flatten)]
    pub io: SamInputOptions,
}

impl Command for Validate {
    fn execute(&self, _command_line: &str) -> Result<()> {
        self.io.validate()?;

        let mut invalid_inputs = 0usize;
        for input in &self.io.input {
            let timer = OperationTimer::new(&format!("Validating {}", input.display()));
            let mut gate = GateDecision::ReportOnly;
            let outcome = match scan_path(input, &mut gate, false) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("{}: {e:#}", input.display());
                    invalid_inputs += 1;
                    continue;
                }
            };
            match outcome {
                ScanOutcome::ErrorResearch { lines, invalid_lines, field_errors } => {
                    warn!(
                        "{}: {} invalid line(s), {} field error(s)",
                        input.display(),
                        format_count(invalid_lines),
                        format_count(field_errors)
                    );
                    timer.log_completion(lines);
                    invalid_inputs += 1;
                }
                ScanOutcome::Completed(report) => {
                    let lines = report.counts.header_lines + report.counts.data_lines;
                    info!(
                        "{}: all {} alignment line(s) are valid",
                        input.display(),
                        format_count(report.counts.data_lines)
                    );
                    timer.log_completion(lines);
                }
                ScanOutcome::NoAnalyzableReads(counts) => {
                    info!(
                        "{}: all {} alignment line(s) are valid (none mapped)",
                        input.display(),
                        format_count(counts.data_lines)
                    );
                    timer.log_completion(counts.header_lines + counts.data_lines);
                }
                ScanOutcome::Aborted { line_number, .. } => {
                    warn!("{}: stopped at line {line_number}", input.display());
                    invalid_inputs += 1;
                }
            }
        }

        if invalid_inputs > 0 {
            bail!("{invalid_inputs} of {} input(s) contain invalid records", self.io.input.len());
        }
        Ok(())
    }
}
