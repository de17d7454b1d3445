//! Explain FLAG values, CIGAR strings and MD tags in plain words.

use std::fmt::Write;

use anyhow::Result;
use clap::Parser;
use samtally_lib::sam::cigar::{CIGAR_KINDS, kind_description, kind_to_char};
use samtally_lib::sam::flags::FLAG_DESCRIPTIONS;
use samtally_lib::sam::md::MdToken;
use samtally_lib::sam::{Cigar, FlagBits, MdTag};

use crate::commands::command::Command;

/// Decode SAM annotations.
#[derive(Debug, Parser)]
#[command(
    name = "explain",
    about = "\x1b[38;5;173m[UTILITIES]\x1b[0m      \x1b[36mExplain FLAG values, CIGAR strings and MD tags\x1b[0m",
    long_about = r#"
Explain FLAG values, CIGAR strings and MD tags.

With no option, prints the table of FLAG bits and the table of CIGAR operations.

Example usage:
  samtally explain
  samtally explain --flag 99
  samtally explain --cigar 10S140M --md 4A3^AC12
"#
)]
pub struct Explain {
    /// FLAG value to decode
    #[arg(long = "flag")]
    pub flag: Option<u16>,

    /// CIGAR string to decode
    #[arg(long = "cigar")]
    pub cigar: Option<String>,

    /// MD tag value (without the `MD:Z:` prefix) to decode
    #[arg(long = "md")]
    pub md: Option<String>,
}

impl Command for Explain {
    fn execute(&self, _command_line: &str) -> Result<()> {
        let mut out = String::new();
        if self.flag.is_none() && self.cigar.is_none() && self.md.is_none() {
            out.push_str(&flag_table()?);
            out.push('\n');
            out.push_str(&cigar_table()?);
        }
        if let Some(flag) = self.flag {
            out.push_str(&explain_flag(flag)?);
        }
        if let Some(cigar) = &self.cigar {
            out.push_str(&explain_cigar(cigar)?);
        }
        if let Some(md) = &self.md {
            out.push_str(&explain_md(md)?);
        }
        print!("{out}");
        Ok(())
    }
}

fn flag_table() -> Result<String> {
    let mut out = String::from("FLAG bits:\n");
    for (i, (bit, description)) in FLAG_DESCRIPTIONS.iter().enumerate() {
        writeln!(out, "  {:>2}  {bit:>5}  0x{bit:03x}  {description}", i + 1)?;
    }
    Ok(out)
}

fn cigar_table() -> Result<String> {
    let mut out = String::from("CIGAR operations:\n");
    for kind in CIGAR_KINDS {
        writeln!(out, "  {}  {}", kind_to_char(kind), kind_description(kind))?;
    }
    Ok(out)
}

fn explain_flag(value: u16) -> Result<String> {
    let flags = FlagBits::from_value(value);
    let bits: String = flags.bits().iter().map(|b| char::from(b'0' + b)).collect();
    let mut out = format!("FLAG {value} = {bits}\n");
    let set = flags.set_descriptions();
    if set.is_empty() {
        out.push_str("  no bits set\n");
    }
    for (bit, description) in set {
        writeln!(out, "  {bit:>5}  {description}")?;
    }
    Ok(out)
}

fn explain_cigar(cigar: &str) -> Result<String> {
    let parsed = Cigar::parse(cigar)?;
    let mut out = format!("CIGAR {parsed}\n");
    for op in parsed.ops() {
        writeln!(out, "  {:>6}{}  {}", op.len, kind_to_char(op.kind), kind_description(op.kind))?;
    }
    writeln!(out, "  read bases consumed: {}", parsed.read_len())?;
    writeln!(out, "  when mapped: {}", parsed.classify())?;
    Ok(out)
}

fn explain_md(md: &str) -> Result<String> {
    let parsed = MdTag::parse(md)?;
    let mut out = format!("MD {md}\n");
    for token in parsed.tokens() {
        match token {
            MdToken::Match(n) => writeln!(out, "  {n} matching base(s)")?,
            MdToken::Mismatch(b) => writeln!(out, "  mismatch, reference base {}", char::from(*b))?,
            MdToken::Deletion(bases) => {
                writeln!(out, "  deletion of reference bases {}", String::from_utf8_lossy(bases))?;
            }
        }
    }
    for m in parsed.mismatches() {
        writeln!(out, "  read offset {}: reference base {}", m.offset, char::from(m.reference_base))?;
    }
    Ok(out)
}
