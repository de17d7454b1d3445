//! Common CLI options shared across commands.
//!
//! This module provides shared argument structures that can be composed into
//! command structs using `#[command(flatten)]`, and the interactive error gate.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use samtally_lib::scan::{ErrorGate, GateDecision};
use samtally_lib::validation::{SAM_EXTENSIONS, validate_sam_inputs};

/// One or more SAM inputs.
#[derive(Debug, Clone, Args)]
pub struct SamInputOptions {
    /// Input SAM file(s) (`.sam` or `.sam.gz`)
    #[arg(short = 'i', long = "input", required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,
}

impl SamInputOptions {
    /// Checks every input exists, is a non-empty file and has a SAM extension.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first rejected input.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_sam_inputs(&self.input)?;
        Ok(())
    }
}

/// Default output prefix for an input: its file name without the SAM extension.
pub fn default_prefix(input: &Path) -> String {
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let lower = name.to_ascii_lowercase();
    SAM_EXTENSIONS
        .iter()
        .filter(|ext| lower.ends_with(*ext))
        .max_by_key(|ext| ext.len())
        .map_or(name.clone(), |ext| name[..name.len() - ext.len()].to_string())
}

/// What to do at the first invalid alignment line of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OnError {
    /// Ask on the terminal
    #[default]
    Prompt,
    /// Stop reading the file
    Abort,
    /// Validate the rest of the file and report every error, without statistics
    Report,
}

impl OnError {
    /// The gate to consult for one file.
    pub fn gate(self) -> Box<dyn ErrorGate> {
        match self {
            OnError::Prompt => {
                Box::new(TerminalPrompt::new(std::io::stdin().lock(), std::io::stderr()))
            }
            OnError::Abort => Box::new(GateDecision::Abort),
            OnError::Report => Box::new(GateDecision::ReportOnly),
        }
    }
}

/// Asks the operator whether to keep validating after the first invalid line.
///
/// Anything other than `y`/`yes`, including end of input, aborts.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ErrorGate for TerminalPrompt<R, W> {
    fn on_first_error(&mut self, error_count: usize, line_number: u64) -> GateDecision {
        let asked = write!(
            self.output,
            "{error_count} error(s) found on line {line_number}. \
             Keep scanning the rest of the file for errors (no statistics will be produced)? [y/N] "
        )
        .and_then(|()| self.output.flush());
        if asked.is_err() {
            return GateDecision::Abort;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") => {
                GateDecision::ReportOnly
            }
            _ => GateDecision::Abort,
        }
    }
}
