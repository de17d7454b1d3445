//! Tabular metrics for reference summaries and called substitutions.

use serde::{Deserialize, Serialize};

use super::Metric;
use crate::aggregator::ReferenceSummary;
use crate::mismatch::Substitution;

/// One row of the per-file `<prefix>.references.tsv` summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMetric {
    /// Reference sequence name (RNAME)
    pub reference: String,

    /// Reads whose CIGAR is a single `M` run
    pub totally_mapped: u64,

    /// Mapped reads with any other CIGAR
    pub badly_mapped: u64,

    /// Nucleotides summed over every CIGAR operation
    pub cigar_total: u64,

    /// Read pairs credited to this reference
    pub paired_total: u64,

    /// Pairs with a measured gap or overlap
    pub gap_overlap_pairs: u64,

    /// Substitutions called from MD tags
    pub substitutions: u64,

    /// Distinct substitution strings (e.g. `T -> A`)
    pub distinct_substitutions: u64,
}

impl ReferenceMetric {
    #[must_use]
    pub fn from_summary(summary: &ReferenceSummary) -> Self {
        Self {
            reference: summary.name.clone(),
            totally_mapped: summary.totally_mapped,
            badly_mapped: summary.badly_mapped,
            cigar_total: summary.cigar_total,
            paired_total: summary.paired_total,
            gap_overlap_pairs: summary.gap_overlap.values().sum(),
            substitutions: summary.substitutions.len() as u64,
            distinct_substitutions: summary.substitution_counts.len() as u64,
        }
    }
}

impl Metric for ReferenceMetric {
    fn metric_name() -> &'static str {
        "reference summary"
    }
}

/// One row of a `<prefix>_<reference>.substitutions.tsv` detail file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionMetric {
    /// Name of the read carrying the substitution
    pub read_name: String,

    /// Genomic position of the mismatching base
    pub position: i64,

    /// `<read base> -> <reference base>`
    pub mutation: String,

    /// Base-call accuracy in percent with two decimals, empty when unavailable
    pub accuracy: String,

    /// Impact in the codon ending at the base
    pub frame1: String,

    /// Impact in the codon centred on the base
    pub frame2: String,

    /// Impact in the codon starting at the base
    pub frame3: String,
}

impl From<&Substitution> for SubstitutionMetric {
    fn from(sub: &Substitution) -> Self {
        let [frame1, frame2, frame3] = sub.frames.map(|f| f.to_string());
        Self {
            read_name: sub.read_name.clone(),
            position: sub.position,
            mutation: sub.change(),
            accuracy: sub.accuracy.map(|a| format!("{a:.2}")).unwrap_or_default(),
            frame1,
            frame2,
            frame3,
        }
    }
}

impl Metric for SubstitutionMetric {
    fn metric_name() -> &'static str {
        "substitution"
    }
}
