//! Input file validation utilities
//!
//! This module checks input paths before any record is read, with consistent error messages.
//! All validation functions use the structured error types from [`crate::errors`].

use crate::errors::{Result, SamTallyError};
use std::path::Path;

/// File name suffixes accepted as SAM input.
pub const SAM_EXTENSIONS: &[&str] = &[".sam", ".sam.gz"];

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Input SAM")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use samtally_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/file.sam", "Input SAM");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(invalid(path_ref, description, "File does not exist"));
    }
    Ok(())
}

/// Validate that a path is an existing, non-empty SAM file.
///
/// The path must name a regular file whose name ends in one of [`SAM_EXTENSIONS`]
/// and whose size is greater than zero.
///
/// # Returns
/// The size of the file in bytes, used for progress reporting.
///
/// # Errors
/// Returns an error if the path is missing, is not a regular file, has the wrong
/// extension, or is empty.
pub fn validate_sam_input<P: AsRef<Path>>(path: P, description: &str) -> Result<u64> {
    let path_ref = path.as_ref();
    validate_file_exists(path_ref, description)?;

    let metadata = std::fs::metadata(path_ref)
        .map_err(|e| invalid(path_ref, description, &format!("Cannot read metadata: {e}")))?;
    if !metadata.is_file() {
        return Err(invalid(path_ref, description, "The input is not a file"));
    }

    let name = path_ref.file_name().map(|n| n.to_string_lossy().to_lowercase()).unwrap_or_default();
    if !SAM_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        return Err(invalid(
            path_ref,
            description,
            "Only the SAM file format (.sam or .sam.gz) is accepted as input",
        ));
    }

    if metadata.len() == 0 {
        return Err(invalid(path_ref, description, "The file is empty"));
    }

    Ok(metadata.len())
}

/// Validate every input path, returning the byte size of each in order.
///
/// # Errors
/// Returns an error for the first file that fails [`validate_sam_input`].
pub fn validate_sam_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<u64>> {
    paths.iter().map(|p| validate_sam_input(p, "Input SAM")).collect()
}

fn invalid(path: &Path, description: &str, reason: &str) -> SamTallyError {
    SamTallyError::InvalidFileFormat {
        file_type: description.to_string(),
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile, TempDir};

    fn sam_file_with(contents: &str, suffix: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_validate_file_exists_valid() {
        let temp_file = NamedTempFile::new().unwrap();
        validate_file_exists(temp_file.path(), "Test file").unwrap();
    }

    #[test]
    fn test_validate_file_exists_invalid() {
        let result = validate_file_exists("/nonexistent/file.sam", "Input SAM");
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Input SAM"));
        assert!(err_msg.contains("does not exist"));
    }

    #[rstest]
    #[case(".sam")]
    #[case(".SAM")]
    #[case(".sam.gz")]
    fn test_validate_sam_input_accepts_extension(#[case] suffix: &str) {
        let file = sam_file_with("@HD\tVN:1.6\n", suffix);
        let size = validate_sam_input(file.path(), "Input SAM").unwrap();
        assert_eq!(size, 11);
    }

    #[rstest]
    #[case(".bam", "Only the SAM file format")]
    #[case(".txt", "Only the SAM file format")]
    fn test_validate_sam_input_rejects_extension(#[case] suffix: &str, #[case] expected: &str) {
        let file = sam_file_with("@HD\tVN:1.6\n", suffix);
        let err = validate_sam_input(file.path(), "Input SAM").unwrap_err();
        assert!(err.to_string().contains(expected), "unexpected error: {err}");
    }

    #[test]
    fn test_validate_sam_input_rejects_empty() {
        let file = sam_file_with("", ".sam");
        let err = validate_sam_input(file.path(), "Input SAM").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_validate_sam_input_rejects_directory() {
        let dir = Builder::new().suffix(".sam").tempdir().unwrap();
        let err = validate_sam_input(dir.path(), "Input SAM").unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }

    #[test]
    fn test_validate_sam_inputs_first_failure() {
        let good = sam_file_with("r1\t4\t*\t0\t0\t*\t*\t0\t0\t*\t*\n", ".sam");
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.sam");

        let sizes = validate_sam_inputs(&[good.path()]).unwrap();
        assert_eq!(sizes.len(), 1);

        let err = validate_sam_inputs(&[good.path(), missing.as_path()]).unwrap_err();
        assert!(err.to_string().contains("missing.sam"));
    }
}
