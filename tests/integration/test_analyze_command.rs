//! End-to-end CLI tests for the analyze command.

use std::fs;

use tempfile::TempDir;

use crate::helpers::{arg, run_samtally, write_invalid_sam, write_sam, write_valid_sam};

#[test]
fn test_analyze_writes_one_report_per_reference() {
    let dir = TempDir::new().unwrap();
    let input = write_valid_sam(dir.path(), "sample.sam");
    let out = dir.path().join("out");

    let output = run_samtally(
        &["analyze", "-i", arg(&input), "--output-dir", arg(&out), "--no-progress"],
        "",
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let chr1 = fs::read_to_string(out.join("sample_chr1.txt")).unwrap();
    assert!(chr1.contains("Reference: chr1"));
    assert!(chr1.contains("@SQ - Reference sequence dictionary"));
    assert!(chr1.contains("total read count: 4"));
    assert!(chr1.contains("\t-> unmapped read count: 1"));
    assert!(chr1.contains("badly mapped + totally mapped: 100.0000% (1 out of 1 pairs)"));
    assert!(chr1.contains("Gap and overlap between paired reads"));
    assert!(chr1.contains("T -> A\t1"));

    let chr2 = fs::read_to_string(out.join("sample_chr2.txt")).unwrap();
    assert!(chr2.contains("No read pairs were found."));
    assert!(chr2.contains("-> No substitutions were found."));

    let details = fs::read_to_string(out.join("sample_chr1.substitutions.tsv")).unwrap();
    assert_eq!(details.lines().count(), 2);
    assert!(details.lines().nth(1).unwrap().starts_with("p1\t104\tT -> A\t90.00\t"));

    let summary = fs::read_to_string(out.join("sample.references.tsv")).unwrap();
    let rows: Vec<&str> = summary.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("chr1\t"));
    assert!(rows[1].starts_with("chr2\t"));
}

#[test]
fn test_analyze_uses_explicit_prefixes() {
    let dir = TempDir::new().unwrap();
    let first = write_valid_sam(dir.path(), "a.sam");
    let second = write_valid_sam(dir.path(), "b.sam");

    let output = run_samtally(
        &[
            "analyze",
            "-i",
            arg(&first),
            arg(&second),
            "-o",
            "run1",
            "run2",
            "--output-dir",
            arg(dir.path()),
            "--no-progress",
        ],
        "",
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("run1.references.tsv").exists());
    assert!(dir.path().join("run2_chr2.txt").exists());
    assert!(!dir.path().join("a.references.tsv").exists());
}

#[test]
fn test_analyze_abort_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_invalid_sam(dir.path(), "broken.sam");
    let out = dir.path().join("out");

    let output = run_samtally(
        &["analyze", "-i", arg(&input), "--output-dir", arg(&out), "--on-error", "abort"],
        "",
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR on line 6"));
    assert!(!stderr.contains("ERROR on line 8"));
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_analyze_prompt_yes_lists_every_error() {
    let dir = TempDir::new().unwrap();
    let input = write_invalid_sam(dir.path(), "broken.sam");
    let out = dir.path().join("out");

    let output = run_samtally(&["analyze", "-i", arg(&input), "--output-dir", arg(&out)], "y\n");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Keep scanning the rest of the file"));
    assert!(stderr.contains("ERROR on line 6"));
    assert!(stderr.contains("ERROR on line 8"));
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_analyze_continues_past_a_broken_input() {
    let dir = TempDir::new().unwrap();
    let broken = write_invalid_sam(dir.path(), "broken.sam");
    let good = write_valid_sam(dir.path(), "good.sam");

    let output = run_samtally(
        &[
            "analyze",
            "-i",
            arg(&broken),
            arg(&good),
            "--output-dir",
            arg(dir.path()),
            "--on-error",
            "report",
            "--no-progress",
        ],
        "",
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("good.references.tsv").exists());
    assert!(!dir.path().join("broken.references.tsv").exists());
}

#[test]
fn test_analyze_only_unmapped_reads_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_sam(dir.path(), "unmapped.sam", "u1\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\tIIII\n");

    let output = run_samtally(&["analyze", "-i", arg(&input), "--output-dir", arg(dir.path())], "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no valid mapped reads"));
}

#[test]
fn test_analyze_rejects_non_sam_input() {
    let dir = TempDir::new().unwrap();
    let input = write_sam(dir.path(), "reads.txt", "r1\t0\tchr1\t1\t60\t4M\t*\t0\t0\tACGT\tIIII\n");

    let output = run_samtally(&["analyze", "-i", arg(&input)], "");
    assert!(!output.status.success());
}

#[test]
fn test_analyze_continues_past_an_unreadable_input() {
    let dir = TempDir::new().unwrap();
    // Plain text under a gzip extension fails to decompress.
    let corrupt = write_sam(dir.path(), "corrupt.sam.gz", "not gzip data\n");
    let good = write_valid_sam(dir.path(), "good.sam");

    let output = run_samtally(
        &["analyze", "-i", arg(&corrupt), arg(&good), "--output-dir", arg(dir.path()), "--no-progress"],
        "",
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stderr).contains("corrupt.sam.gz"));
    assert!(dir.path().join("good.references.tsv").exists());
    assert!(!dir.path().join("corrupt.references.tsv").exists());
}
