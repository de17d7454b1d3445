//! End-to-end CLI tests for the explain command.

use crate::helpers::run_samtally;

#[test]
fn test_explain_without_options_prints_tables() {
    let output = run_samtally(&["explain"], "");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("FLAG bits:"));
    assert!(stdout.contains("supplementary alignment"));
    assert!(stdout.contains("CIGAR operations:"));
    assert!(stdout.contains("X  Sequence Mismatch"));
}

#[test]
fn test_explain_decodes_each_option() {
    let output = run_samtally(&["explain", "--flag", "4", "--cigar", "5M2I3M", "--md", "2^T6"], "");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FLAG 4 = 000000000100"));
    assert!(stdout.contains("segment unmapped"));
    assert!(stdout.contains("read bases consumed: 10"));
    assert!(stdout.contains("deletion of reference bases T"));
    assert!(!stdout.contains("FLAG bits:"));
}

#[test]
fn test_explain_rejects_bad_cigar() {
    let output = run_samtally(&["explain", "--cigar", "M5"], "");
    assert!(!output.status.success());
}
