//! Custom error types for samtally operations.

use thiserror::Error;

/// Result type alias for samtally operations
pub type Result<T> = std::result::Result<T, SamTallyError>;

/// Error type for samtally operations
#[derive(Error, Debug)]
pub enum SamTallyError {
    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "SAM")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A mandatory alignment field is absent from a record
    #[error("Missing mandatory field {field} (record has {found} fields)")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
        /// Number of fields actually present
        found: usize,
    },

    /// A mandatory field could not be interpreted
    #[error("Invalid {field} value '{value}': {reason}")]
    InvalidField {
        /// Name of the field
        field: &'static str,
        /// The offending value
        value: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// Malformed CIGAR string
    #[error("Invalid CIGAR '{cigar}': {reason}")]
    InvalidCigar {
        /// The CIGAR string
        cigar: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// Malformed MD tag value
    #[error("Invalid MD tag '{md}': {reason}")]
    InvalidMd {
        /// The MD value (without the `MD:Z:` prefix)
        md: String,
        /// Explanation of why it's invalid
        reason: String,
    },
}
