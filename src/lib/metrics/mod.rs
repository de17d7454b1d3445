//! Metrics reporting for samtally scans.
//!
//! This module provides the tabular outputs written beside each text report:
//! - [`reference`] - per-reference summary rows and per-substitution detail rows
//! - [`writer`] - Metrics file I/O utilities
//!
//! # Traits
//!
//! - [`Metric`] - Core trait for serializable metrics

pub mod reference;
pub mod writer;

use serde::{Deserialize, Serialize};

pub use reference::{ReferenceMetric, SubstitutionMetric};
pub use writer::{write_metrics, write_metrics_auto};

/// A metric type that can be serialized to TSV files.
///
/// All metric types in samtally implement this trait, providing a consistent
/// interface for serialization and identification.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type.
    ///
    /// Used in error messages and logging when writing metrics files.
    fn metric_name() -> &'static str;
}
