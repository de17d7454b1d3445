//! End-to-end CLI tests for the validate command.

use tempfile::TempDir;

use crate::helpers::{arg, run_samtally, write_invalid_sam, write_valid_sam};

#[test]
fn test_validate_accepts_valid_file() {
    let dir = TempDir::new().unwrap();
    let input = write_valid_sam(dir.path(), "sample.sam");

    let output = run_samtally(&["validate", "-i", arg(&input)], "");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stderr).contains("all 4 alignment line(s) are valid"));
}

#[test]
fn test_validate_reports_every_invalid_line() {
    let dir = TempDir::new().unwrap();
    let input = write_invalid_sam(dir.path(), "broken.sam");

    let output = run_samtally(&["validate", "-i", arg(&input)], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR on line 6"));
    assert!(stderr.contains("ERROR on line 8"));
    assert!(stderr.contains("2 invalid line(s)"));
}

#[test]
fn test_validate_checks_all_inputs() {
    let dir = TempDir::new().unwrap();
    let good = write_valid_sam(dir.path(), "good.sam");
    let broken = write_invalid_sam(dir.path(), "broken.sam");

    let output = run_samtally(&["validate", "-i", arg(&broken), arg(&good)], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 of 2 input(s) contain invalid records"));
    assert!(stderr.contains("all 4 alignment line(s) are valid"));
}
