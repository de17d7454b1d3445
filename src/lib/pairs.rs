//! Read-pair classification.
//!
//! Mates are matched by QNAME: the first mate seen is parked in a pending map and the
//! pair is classified when its partner arrives, after which the entry is evicted. Mates
//! therefore do not need to be adjacent in the input.
//!
//! Fragment gap/overlap bucketing compares TLEN with twice the read length.

use std::fmt;

use ahash::AHashMap;

use crate::sam::cigar::MappingStatus;
use crate::sam::flags::FlagBits;

/// The six unordered combinations of mate mapping statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairStatus {
    UnmappedUnmapped,
    UnmappedTotallyMapped,
    UnmappedBadlyMapped,
    BadlyMappedTotallyMapped,
    BadlyMappedBadlyMapped,
    TotallyMappedTotallyMapped,
}

impl PairStatus {
    /// All combinations in report order.
    pub const ALL: [PairStatus; 6] = [
        PairStatus::UnmappedUnmapped,
        PairStatus::UnmappedTotallyMapped,
        PairStatus::UnmappedBadlyMapped,
        PairStatus::BadlyMappedTotallyMapped,
        PairStatus::BadlyMappedBadlyMapped,
        PairStatus::TotallyMappedTotallyMapped,
    ];

    /// Combines two mate statuses. The result does not depend on argument order.
    #[must_use]
    pub fn from_mates(a: MappingStatus, b: MappingStatus) -> Self {
        use MappingStatus::{BadlyMapped, TotallyMapped, Unmapped};
        match (a, b) {
            (Unmapped, Unmapped) => PairStatus::UnmappedUnmapped,
            (Unmapped, TotallyMapped) | (TotallyMapped, Unmapped) => {
                PairStatus::UnmappedTotallyMapped
            }
            (Unmapped, BadlyMapped) | (BadlyMapped, Unmapped) => PairStatus::UnmappedBadlyMapped,
            (BadlyMapped, TotallyMapped) | (TotallyMapped, BadlyMapped) => {
                PairStatus::BadlyMappedTotallyMapped
            }
            (BadlyMapped, BadlyMapped) => PairStatus::BadlyMappedBadlyMapped,
            (TotallyMapped, TotallyMapped) => PairStatus::TotallyMappedTotallyMapped,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PairStatus::UnmappedUnmapped => "unmapped + unmapped",
            PairStatus::UnmappedTotallyMapped => "unmapped + totally mapped",
            PairStatus::UnmappedBadlyMapped => "unmapped + badly mapped",
            PairStatus::BadlyMappedTotallyMapped => "badly mapped + totally mapped",
            PairStatus::BadlyMappedBadlyMapped => "badly mapped + badly mapped",
            PairStatus::TotallyMappedTotallyMapped => "totally mapped + totally mapped",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pair counts per [`PairStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairStatusCounts {
    counts: [u64; 6],
}

impl PairStatusCounts {
    pub fn increment(&mut self, status: PairStatus) {
        self.counts[status.slot()] += 1;
    }

    #[must_use]
    pub fn count(&self, status: PairStatus) -> u64 {
        self.counts[status.slot()]
    }

    /// Number of classified pairs.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Every combination with its count, in report order.
    pub fn iter(&self) -> impl Iterator<Item = (PairStatus, u64)> + '_ {
        PairStatus::ALL.iter().map(|&s| (s, self.count(s)))
    }
}

/// What the classifier did with one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairEvent {
    /// Secondary or supplementary alignment, not part of pair matching.
    Ignored,
    /// Neither first nor last segment.
    NotPaired,
    /// First mate seen for this QNAME; waiting for its partner.
    Pending,
    /// Both mates seen. `reference` is where the pair is credited: the current read's
    /// reference when mapped, otherwise the pending mate's, `None` when both are unmapped.
    Completed { status: PairStatus, reference: Option<String> },
}

#[derive(Debug)]
struct PendingMate {
    status: MappingStatus,
    reference: Option<String>,
}

/// Matches mates by QNAME and classifies each completed pair.
#[derive(Debug, Default)]
pub struct PairClassifier {
    pending: AHashMap<String, PendingMate>,
    not_paired: u64,
}

impl PairClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one valid read.
    ///
    /// `reference` is the read's RNAME when the read is mapped, `None` otherwise.
    pub fn observe(
        &mut self,
        qname: &str,
        flags: &FlagBits,
        status: MappingStatus,
        reference: Option<&str>,
    ) -> PairEvent {
        if flags.is_secondary() || flags.is_supplementary() {
            return PairEvent::Ignored;
        }
        if !flags.is_first_segment() && !flags.is_last_segment() {
            self.not_paired += 1;
            return PairEvent::NotPaired;
        }

        match self.pending.remove(qname) {
            Some(mate) => PairEvent::Completed {
                status: PairStatus::from_mates(mate.status, status),
                reference: reference.map(str::to_string).or(mate.reference),
            },
            None => {
                self.pending.insert(
                    qname.to_string(),
                    PendingMate { status, reference: reference.map(str::to_string) },
                );
                PairEvent::Pending
            }
        }
    }

    /// Reads flagged neither first nor last segment so far.
    #[must_use]
    pub fn not_paired(&self) -> u64 {
        self.not_paired
    }

    /// Mates still waiting for a partner.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Width of a gap/overlap interval.
pub const GAP_BUCKET_WIDTH: i64 = 10;

/// Buckets the distance between the two reads of a fragment.
///
/// With `d = TLEN - 2 * read_len`: `0` when the reads abut, `1`/`-1` for a gap/overlap
/// shorter than ten bases, otherwise the largest multiple of ten below `|d|` (never more
/// than the largest multiple of ten below the read length), positive for a gap and
/// negative for an overlap.
///
/// Returns `None` when TLEN is not positive or the read length is zero; only the
/// leftmost mate of a pair carries a positive TLEN.
#[must_use]
pub fn gap_overlap_bucket(tlen: i64, read_len: u64) -> Option<i64> {
    if tlen <= 0 || read_len == 0 {
        return None;
    }
    let read_len = i64::try_from(read_len).unwrap_or(i64::MAX);
    let d = tlen.saturating_sub(read_len.saturating_mul(2));
    if d == 0 {
        return Some(0);
    }
    let magnitude = d.abs();
    if magnitude < GAP_BUCKET_WIDTH {
        return Some(d.signum());
    }

    let mut bucket = GAP_BUCKET_WIDTH.max(GAP_BUCKET_WIDTH * ((magnitude - 1) / GAP_BUCKET_WIDTH));
    let cap = GAP_BUCKET_WIDTH * ((read_len - 1) / GAP_BUCKET_WIDTH);
    if cap >= GAP_BUCKET_WIDTH {
        bucket = bucket.min(cap);
    }
    Some(bucket * d.signum())
}

/// Interval of `|d|` values held by a gap/overlap bucket.
///
/// Bucket `1` holds `]0,10[`, bucket `10` holds `[10,20]` and every higher bucket `k`
/// holds `]k,k+10]`.
#[must_use]
pub fn gap_overlap_interval(bucket: i64) -> String {
    let magnitude = bucket.abs();
    match magnitude {
        0 => "0".to_string(),
        1 => format!("]0,{GAP_BUCKET_WIDTH}["),
        GAP_BUCKET_WIDTH => format!("[{GAP_BUCKET_WIDTH},{}]", 2 * GAP_BUCKET_WIDTH),
        _ => format!("]{magnitude},{}]", magnitude + GAP_BUCKET_WIDTH),
    }
}
