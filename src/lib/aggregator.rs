//! Per-reference statistics for one input file.
//!
//! Every mapped, valid read contributes to the bucket of its own RNAME. Buckets are
//! created on first sighting and kept in first-seen order, so reports list references
//! in the order the file introduces them.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::mismatch::Substitution;
use crate::pairs::{PairStatus, PairStatusCounts};
use crate::sam::cigar::{Cigar, CigarHistogram, MappingStatus};

/// Running tallies for one reference sequence.
#[derive(Debug, Clone)]
pub struct ReferenceBucket {
    name: String,
    cigar: CigarHistogram,
    pairs: PairStatusCounts,
    gap_overlap: BTreeMap<i64, u64>,
    substitutions: Vec<Substitution>,
    totally_mapped: u64,
    badly_mapped: u64,
}

impl ReferenceBucket {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cigar: CigarHistogram::new(),
            pairs: PairStatusCounts::default(),
            gap_overlap: BTreeMap::new(),
            substitutions: Vec::new(),
            totally_mapped: 0,
            badly_mapped: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Counts a mapped read and adds its CIGAR operation lengths to the histogram.
    pub fn record_read(&mut self, status: MappingStatus, cigar: &Cigar) {
        match status {
            MappingStatus::TotallyMapped => self.totally_mapped += 1,
            MappingStatus::BadlyMapped => self.badly_mapped += 1,
            MappingStatus::Unmapped => {}
        }
        self.cigar.add(cigar);
    }

    pub fn record_pair(&mut self, status: PairStatus) {
        self.pairs.increment(status);
    }

    pub fn record_gap_overlap(&mut self, bucket: i64) {
        *self.gap_overlap.entry(bucket).or_insert(0) += 1;
    }

    pub fn add_substitutions(&mut self, substitutions: impl IntoIterator<Item = Substitution>) {
        self.substitutions.extend(substitutions);
    }

    #[must_use]
    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    /// Freezes the tallies into a summary with derived totals.
    #[must_use]
    pub fn finalize(self) -> ReferenceSummary {
        let substitution_counts = count_changes(&self.substitutions);
        ReferenceSummary {
            cigar_total: self.cigar.total(),
            paired_total: self.pairs.total(),
            name: self.name,
            cigar: self.cigar,
            pairs: self.pairs,
            gap_overlap: self.gap_overlap,
            substitution_counts,
            substitutions: self.substitutions,
            totally_mapped: self.totally_mapped,
            badly_mapped: self.badly_mapped,
        }
    }
}

/// Occurrences of one substitution string such as `T -> A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionCount {
    pub change: String,
    pub count: u64,
}

/// Tallies substitution strings, most frequent first; ties keep first-seen order.
fn count_changes(substitutions: &[Substitution]) -> Vec<SubstitutionCount> {
    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut counts: Vec<SubstitutionCount> = Vec::new();
    for sub in substitutions {
        let change = sub.change();
        match index.get(&change) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(change.clone(), counts.len());
                counts.push(SubstitutionCount { change, count: 1 });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Final, read-only statistics for one reference.
#[derive(Debug, Clone)]
pub struct ReferenceSummary {
    pub name: String,
    pub cigar: CigarHistogram,
    /// Sum of the CIGAR histogram.
    pub cigar_total: u64,
    pub pairs: PairStatusCounts,
    /// Sum of the pair-status histogram.
    pub paired_total: u64,
    /// Gap (positive) and overlap (negative) buckets with their pair counts.
    pub gap_overlap: BTreeMap<i64, u64>,
    pub substitution_counts: Vec<SubstitutionCount>,
    pub substitutions: Vec<Substitution>,
    pub totally_mapped: u64,
    pub badly_mapped: u64,
}

/// Reference name to bucket mapping for one input file.
#[derive(Debug, Default)]
pub struct ReferenceAggregator {
    buckets: Vec<ReferenceBucket>,
    index: AHashMap<String, usize>,
}

impl ReferenceAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket for `name`, created on first use.
    pub fn bucket_mut(&mut self, name: &str) -> &mut ReferenceBucket {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                let i = self.buckets.len();
                self.buckets.push(ReferenceBucket::new(name));
                self.index.insert(name.to_string(), i);
                i
            }
        };
        &mut self.buckets[i]
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ReferenceBucket> {
        self.index.get(name).map(|&i| &self.buckets[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Summaries in first-seen order.
    #[must_use]
    pub fn finalize(self) -> Vec<ReferenceSummary> {
        self.buckets.into_iter().map(ReferenceBucket::finalize).collect()
    }
}
