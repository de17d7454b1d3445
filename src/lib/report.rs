//! Report rendering for completed scans.
//!
//! For every reference a human-readable text report and a TSV of the called
//! substitutions are written, plus one TSV summarising all references of the file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ahash::AHashSet;
use anyhow::{Context, Result};

use crate::aggregator::ReferenceSummary;
use crate::logging::format_percent;
use crate::metrics::{ReferenceMetric, SubstitutionMetric, write_metrics_auto};
use crate::pairs::gap_overlap_interval;
use crate::sam::cigar::kind_description;
use crate::scan::FileReport;

/// Replaces characters outside `[A-Za-z0-9._-]` with `_` so a reference name can be
/// used in a file name.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}

/// File-name stems for a file's references, in the same order.
///
/// Names that sanitise to the same stem get a `_2`, `_3`, ... suffix in order of
/// appearance, so no report overwrites another.
#[must_use]
pub fn reference_file_stems<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut used = AHashSet::new();
    let mut stems = Vec::new();
    for name in names {
        let base = sanitize_name(name);
        let mut stem = base.clone();
        let mut n = 2;
        while !used.insert(stem.clone()) {
            stem = format!("{base}_{n}");
            n += 1;
        }
        stems.push(stem);
    }
    stems
}

/// Files produced for one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceOutputs {
    pub text: PathBuf,
    pub substitutions: PathBuf,
}

/// Files produced for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutputs {
    pub summary: PathBuf,
    pub references: Vec<ReferenceOutputs>,
}

/// Text report path, `<dir>/<prefix>_<reference>.txt`.
#[must_use]
pub fn text_report_path(output_dir: &Path, prefix: &str, reference: &str) -> PathBuf {
    output_dir.join(format!("{prefix}_{}.txt", sanitize_name(reference)))
}

/// Substitution detail path, `<dir>/<prefix>_<reference>.substitutions.tsv`.
#[must_use]
pub fn substitutions_path(output_dir: &Path, prefix: &str, reference: &str) -> PathBuf {
    output_dir.join(format!("{prefix}_{}.substitutions.tsv", sanitize_name(reference)))
}

/// Reference summary path, `<dir>/<prefix>.references.tsv`.
#[must_use]
pub fn summary_path(output_dir: &Path, prefix: &str) -> PathBuf {
    output_dir.join(format!("{prefix}.references.tsv"))
}

/// Writes every report for a completed scan.
///
/// # Errors
///
/// Returns an error if any output file cannot be created or written.
pub fn write_reports(
    input: &Path,
    report: &FileReport,
    output_dir: &Path,
    prefix: &str,
) -> Result<ReportOutputs> {
    let stems = reference_file_stems(report.references.iter().map(|r| r.name.as_str()));
    let mut references = Vec::with_capacity(report.references.len());
    for (reference, stem) in report.references.iter().zip(&stems) {
        let text = text_report_path(output_dir, prefix, stem);
        let file = File::create(&text)
            .with_context(|| format!("Failed to create {}", text.display()))?;
        let mut writer = BufWriter::new(file);
        write_reference_report(&mut writer, input, report, reference)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to write {}", text.display()))?;

        let substitutions = substitutions_path(output_dir, prefix, stem);
        let rows: Vec<SubstitutionMetric> =
            reference.substitutions.iter().map(SubstitutionMetric::from).collect();
        write_metrics_auto(&substitutions, &rows)?;

        references.push(ReferenceOutputs { text, substitutions });
    }

    let summary = summary_path(output_dir, prefix);
    let rows: Vec<ReferenceMetric> =
        report.references.iter().map(ReferenceMetric::from_summary).collect();
    write_metrics_auto(&summary, &rows)?;

    Ok(ReportOutputs { summary, references })
}

/// Renders the text report of one reference.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_reference_report<W: Write>(
    out: &mut W,
    input: &Path,
    report: &FileReport,
    reference: &ReferenceSummary,
) -> std::io::Result<()> {
    writeln!(out, "Input file: {}", input.display())?;
    writeln!(out, "Reference: {}", reference.name)?;

    write_headers(out, report)?;
    write_read_info(out, report, reference)?;
    write_pairs(out, report, reference)?;
    if reference.paired_total > 0 {
        write_gap_overlap(out, reference)?;
    }
    write_cigar(out, reference)?;
    write_substitutions(out, reference)
}

fn write_headers<W: Write>(out: &mut W, report: &FileReport) -> std::io::Result<()> {
    writeln!(out, "\n-> Header:")?;
    if report.headers.is_empty() {
        return writeln!(out, "No header lines were found.");
    }
    for header in &report.headers {
        writeln!(out, "{}", header.title())?;
        for field in &header.fields {
            writeln!(out, "\t{}: {}", field.description, field.value)?;
        }
    }
    Ok(())
}

fn write_read_info<W: Write>(
    out: &mut W,
    report: &FileReport,
    reference: &ReferenceSummary,
) -> std::io::Result<()> {
    let counts = &report.counts;
    writeln!(out, "\ntotal read count: {}", counts.data_lines)?;
    writeln!(
        out,
        "\t-> aligned read count: {} ({} of total read)",
        counts.aligned(),
        format_percent(counts.aligned_fraction(), 2)
    )?;
    writeln!(out, "\t\t-> totally mapped read count: {}", counts.totally_mapped)?;
    writeln!(out, "\t\t-> badly mapped read count: {}", counts.badly_mapped)?;
    writeln!(out, "\t-> unmapped read count: {}", counts.unmapped)?;
    writeln!(
        out,
        "reads mapped on {}: {} totally mapped, {} badly mapped",
        reference.name, reference.totally_mapped, reference.badly_mapped
    )
}

#[allow(clippy::cast_precision_loss)]
fn write_pairs<W: Write>(
    out: &mut W,
    report: &FileReport,
    reference: &ReferenceSummary,
) -> std::io::Result<()> {
    writeln!(out, "\n-> Analysis of paired-reads:")?;
    if reference.paired_total == 0 {
        writeln!(out, "No read pairs were found.")?;
    }
    for (status, count) in reference.pairs.iter().filter(|(_, n)| *n > 0) {
        let percent = count as f64 * 100.0 / reference.paired_total as f64;
        writeln!(
            out,
            "{status}: {percent:.4}% ({count} out of {} pairs)",
            reference.paired_total
        )?;
    }
    if report.counts.not_paired > 0 {
        writeln!(out, "-> {} reads are not paired.", report.counts.not_paired)?;
    }
    if report.counts.orphan_mates > 0 {
        writeln!(out, "-> {} mates have no partner in the file.", report.counts.orphan_mates)?;
    }
    Ok(())
}

fn write_gap_overlap<W: Write>(out: &mut W, reference: &ReferenceSummary) -> std::io::Result<()> {
    writeln!(out, "\n-> Gap and overlap between paired reads:")?;
    if let Some(&n) = reference.gap_overlap.get(&0) {
        writeln!(out, "{n} read pair(s) are well aligned on both ends of the fragment.")?;
    }
    for (&bucket, &n) in reference.gap_overlap.range(1..) {
        writeln!(
            out,
            "{n} read pair(s) present a gap of {} nucleotides between the forward and the reverse read.",
            gap_overlap_interval(bucket)
        )?;
    }
    for (&bucket, &n) in reference.gap_overlap.range(..0).rev() {
        writeln!(
            out,
            "{n} read pair(s) present an overlap of {} nucleotides between the forward and the reverse read.",
            gap_overlap_interval(bucket)
        )?;
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn write_cigar<W: Write>(out: &mut W, reference: &ReferenceSummary) -> std::io::Result<()> {
    writeln!(out, "\n-> Global CIGAR mutations observed on aligned sequences:")?;
    for (kind, count) in reference.cigar.iter() {
        let percent = count as f64 * 100.0 / reference.cigar_total as f64;
        writeln!(
            out,
            "{}: {percent:.4}% ({count} out of {} nucleotides)",
            kind_description(kind),
            reference.cigar_total
        )?;
    }
    Ok(())
}

fn write_substitutions<W: Write>(out: &mut W, reference: &ReferenceSummary) -> std::io::Result<()> {
    if reference.substitution_counts.is_empty() {
        return writeln!(out, "\n-> No substitutions were found.");
    }
    writeln!(out, "\n-> Summary of nucleotide substitutions:")?;
    writeln!(out, "Substitution\tCount")?;
    for entry in &reference.substitution_counts {
        writeln!(out, "{}\t{}", entry.change, entry.count)?;
    }
    Ok(())
}
