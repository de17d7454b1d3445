//! CLI command implementations for samtally.
//!
//! # Command Categories
//!
//! ## Analysis
//! - [`analyze`] - Validate SAM files and write per-reference statistics
//! - [`validate`] - Check SAM records against the format grammar only
//!
//! ## Utilities
//! - [`explain`] - Decode FLAG values, CIGAR strings and MD tags

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

pub mod analyze;
pub mod command;
pub mod common;
pub mod explain;
pub mod validate;
