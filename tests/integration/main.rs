//! Integration tests for samtally.
//!
//! These tests run the `samtally` binary end to end on small SAM files.

mod helpers;
mod test_analyze_command;
mod test_explain_command;
mod test_validate_command;
