//! Helper utilities for integration tests.

pub mod sam_files;

pub use sam_files::*;
