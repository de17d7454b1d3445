//! Small SAM inputs and a runner for the `samtally` binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Header shared by the test inputs.
pub const HEADER: &str = "@HD\tVN:1.6\tSO:unsorted\n\
    @SQ\tSN:chr1\tLN:1000\n\
    @SQ\tSN:chr2\tLN:1000\n\
    @PG\tID:bwa\tPN:bwa\n";

/// A pair on chr1 (one totally, one badly mapped mate), a single read on chr2 and an
/// unmapped read.
pub const ALIGNMENTS: &str = "p1\t99\tchr1\t100\t60\t8M\t=\t150\t58\tACGTTCGT\tIIII+III\tMD:Z:4A3\n\
    p1\t147\tchr1\t150\t60\t3S5M\t=\t100\t-58\tACGTTCGT\tIIIIIIII\n\
    s1\t0\tchr2\t10\t60\t8M\t*\t0\t0\tACGTACGT\tIIIIIIII\tMD:Z:8\n\
    u1\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\tIIII\n";

/// A line with a negative POS.
pub const BAD_POS_LINE: &str = "bad\t0\tchr1\t-5\t60\t8M\t*\t0\t0\t*\t*\n";

/// A line with only six fields.
pub const SHORT_LINE: &str = "short\t0\tchr1\t100\t60\t8M\n";

/// Writes `content` to `dir/name` and returns the path.
pub fn write_sam(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write SAM file");
    path
}

/// A valid SAM file with header and alignments.
pub fn write_valid_sam(dir: &Path, name: &str) -> PathBuf {
    write_sam(dir, name, &format!("{HEADER}{ALIGNMENTS}"))
}

/// A SAM file whose second and fourth alignment lines are invalid.
pub fn write_invalid_sam(dir: &Path, name: &str) -> PathBuf {
    write_sam(
        dir,
        name,
        &format!(
            "{HEADER}s1\t0\tchr2\t10\t60\t8M\t*\t0\t0\tACGTACGT\tIIIIIIII\n\
             {BAD_POS_LINE}\
             s2\t0\tchr2\t20\t60\t8M\t*\t0\t0\tACGTACGT\tIIIIIIII\n\
             {SHORT_LINE}"
        ),
    )
}

/// Runs `samtally` with `args`, feeding `stdin` to the process.
pub fn run_samtally(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_samtally"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run samtally");
    // The process may exit without reading its input.
    let _ = child.stdin.take().expect("stdin is piped").write_all(stdin.as_bytes());
    child.wait_with_output().expect("Failed to wait for samtally")
}

/// Path as a `&str` for command arguments.
pub fn arg(path: &Path) -> &str {
    path.to_str().expect("test paths are UTF-8")
}
